use std::sync::Arc;

use serde_json::Value;

use crate::store::{BatchOp, DocumentStore};
use crate::utils::now_iso;

use super::CollectionError;

/// Enforces the at-most-one-featured invariant for a collection.
///
/// Promotion and the matching demotions go through one atomic batch, so
/// a reader never observes two featured items at rest.
pub struct FeaturedSelector {
    store: Arc<dyn DocumentStore>,
    collection: &'static str,
}

impl FeaturedSelector {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, collection: &'static str) -> Self {
        Self { store, collection }
    }

    /// Mark `id` as featured and demote every other featured item.
    pub async fn set_featured(&self, id: &str) -> Result<(), CollectionError> {
        let docs = self.store.read_all(self.collection).await?;
        if !docs.iter().any(|doc| doc.id == id) {
            return Err(CollectionError::NotFound(id.to_string()));
        }

        let now = now_iso();
        let mut ops = Vec::new();
        for doc in docs {
            let currently = doc
                .fields
                .get("featured")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            if doc.id == id {
                if currently {
                    continue;
                }
                ops.push(put_featured(doc.id, doc.fields, true, &now));
            } else if currently {
                ops.push(put_featured(doc.id, doc.fields, false, &now));
            }
        }

        if ops.is_empty() {
            // Target was already the single featured item
            return Ok(());
        }
        self.store.apply_batch(self.collection, ops).await?;
        Ok(())
    }

    /// Clear the featured flag on `id` without touching other items.
    pub async fn unset_featured(&self, id: &str) -> Result<(), CollectionError> {
        let doc = self.store.read(self.collection, id).await?;
        let now = now_iso();
        let op = put_featured(doc.id, doc.fields, false, &now);
        self.store.apply_batch(self.collection, vec![op]).await?;
        Ok(())
    }
}

fn put_featured(
    id: String,
    mut fields: crate::store::Fields,
    featured: bool,
    now: &str,
) -> BatchOp {
    fields.insert("featured".to_string(), Value::Bool(featured));
    fields.insert("updatedAt".to_string(), Value::String(now.to_string()));
    BatchOp::Put { id, fields }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Document, Fields, MemoryStore};
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    async fn seeded() -> (Arc<MemoryStore>, FeaturedSelector) {
        let store = Arc::new(MemoryStore::new());
        store
            .seed(
                "projects",
                vec![
                    Document::new("p1".to_string(), fields(json!({"title": "One", "featured": false}))),
                    Document::new("p2".to_string(), fields(json!({"title": "Two", "featured": false}))),
                    Document::new("p3".to_string(), fields(json!({"title": "Three"}))),
                ],
            )
            .await;
        let backend: Arc<dyn DocumentStore> = store.clone();
        let selector = FeaturedSelector::new(backend, "projects");
        (store, selector)
    }

    async fn featured_ids(store: &MemoryStore) -> Vec<String> {
        store
            .read_all("projects")
            .await
            .unwrap()
            .into_iter()
            .filter(|doc| {
                doc.fields
                    .get("featured")
                    .and_then(Value::as_bool)
                    .unwrap_or(false)
            })
            .map(|doc| doc.id)
            .collect()
    }

    #[tokio::test]
    async fn test_set_featured_promotes_single_item() {
        let (store, selector) = seeded().await;
        selector.set_featured("p2").await.unwrap();
        assert_eq!(featured_ids(&store).await, vec!["p2".to_string()]);
    }

    #[tokio::test]
    async fn test_set_featured_demotes_previous() {
        let (store, selector) = seeded().await;
        selector.set_featured("p2").await.unwrap();
        selector.set_featured("p3").await.unwrap();
        assert_eq!(featured_ids(&store).await, vec!["p3".to_string()]);
    }

    #[tokio::test]
    async fn test_set_featured_on_featured_item_is_noop() {
        let (store, selector) = seeded().await;
        selector.set_featured("p1").await.unwrap();
        let ops_before = store.op_count();
        selector.set_featured("p1").await.unwrap();
        assert_eq!(featured_ids(&store).await, vec!["p1".to_string()]);
        // Only the read happened on the second call
        assert_eq!(store.op_count(), ops_before.saturating_add(1));
    }

    #[tokio::test]
    async fn test_set_featured_unknown_id() {
        let (_store, selector) = seeded().await;
        let result = selector.set_featured("ghost").await;
        assert!(matches!(result, Err(CollectionError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unset_featured_touches_only_target() {
        let (store, selector) = seeded().await;
        selector.set_featured("p2").await.unwrap();
        selector.unset_featured("p2").await.unwrap();
        assert!(featured_ids(&store).await.is_empty());

        let docs = store.read_all("projects").await.unwrap();
        let p1 = docs.iter().find(|d| d.id == "p1").unwrap();
        assert!(p1.fields.get("updatedAt").is_none(), "p1 was never written");
    }
}
