use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::utils::atomic_write;

use super::{BatchOp, Document, DocumentStore, Fields, StoreError};

const COLLECTIONS_DIR: &str = "collections";

/// On-disk container for one collection file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CollectionFile {
    #[serde(default)]
    documents: Vec<Document>,
}

/// Document store backed by one JSON file per collection.
///
/// Documents are kept in an array, so arrival order is the file order.
/// All mutations re-read the file under a per-collection mutex and
/// replace it with an atomic temp-file rename, which is what makes
/// `apply_batch` and `replace_all` all-or-nothing.
pub struct JsonFileStore {
    root: PathBuf,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            root: data_dir.join(COLLECTIONS_DIR),
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{collection}.json"))
    }

    async fn collection_lock(&self, collection: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(collection.to_string())
            .or_default()
            .clone()
    }

    async fn load(&self, collection: &str) -> Result<CollectionFile, StoreError> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(CollectionFile::default());
        }
        let content = fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn save(&self, collection: &str, file: &CollectionFile) -> Result<(), StoreError> {
        let path = self.collection_path(collection);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(file)?;
        atomic_write(&path, content.as_bytes()).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn read_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        Ok(self.load(collection).await?.documents)
    }

    async fn read(&self, collection: &str, id: &str) -> Result<Document, StoreError> {
        self.load(collection)
            .await?
            .documents
            .into_iter()
            .find(|doc| doc.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn insert(&self, collection: &str, fields: Fields) -> Result<Document, StoreError> {
        let lock = self.collection_lock(collection).await;
        let _guard = lock.lock().await;

        let mut file = self.load(collection).await?;
        let doc = Document::new(Uuid::new_v4().to_string(), fields);
        file.documents.push(doc.clone());
        self.save(collection, &file).await?;
        Ok(doc)
    }

    async fn write(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let lock = self.collection_lock(collection).await;
        let _guard = lock.lock().await;

        let mut file = self.load(collection).await?;
        let doc = file
            .documents
            .iter_mut()
            .find(|doc| doc.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        doc.fields = fields;
        self.save(collection, &file).await
    }

    async fn remove(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let lock = self.collection_lock(collection).await;
        let _guard = lock.lock().await;

        let mut file = self.load(collection).await?;
        let before = file.documents.len();
        file.documents.retain(|doc| doc.id != id);
        if file.documents.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.save(collection, &file).await
    }

    async fn apply_batch(&self, collection: &str, ops: Vec<BatchOp>) -> Result<(), StoreError> {
        let lock = self.collection_lock(collection).await;
        let _guard = lock.lock().await;

        let mut file = self.load(collection).await?;
        for op in ops {
            match op {
                BatchOp::Put { id, fields } => {
                    match file.documents.iter_mut().find(|doc| doc.id == id) {
                        Some(doc) => doc.fields = fields,
                        None => file.documents.push(Document::new(id, fields)),
                    }
                }
                BatchOp::Delete { id } => {
                    let before = file.documents.len();
                    file.documents.retain(|doc| doc.id != id);
                    if file.documents.len() == before {
                        // Nothing has been written yet, so the failed
                        // batch leaves the file untouched.
                        return Err(StoreError::NotFound(id));
                    }
                }
            }
        }
        self.save(collection, &file).await
    }

    async fn replace_all(
        &self,
        collection: &str,
        docs: Vec<Fields>,
    ) -> Result<Vec<Document>, StoreError> {
        let lock = self.collection_lock(collection).await;
        let _guard = lock.lock().await;

        let documents: Vec<Document> = docs
            .into_iter()
            .map(|fields| Document::new(Uuid::new_v4().to_string(), fields))
            .collect();
        let file = CollectionFile {
            documents: documents.clone(),
        };
        self.save(collection, &file).await?;
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn test_read_all_empty_collection() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        let docs = store.read_all("projects").await.unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_preserves_arrival_order() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());

        let first = store
            .insert("projects", fields(json!({"title": "A"})))
            .await
            .unwrap();
        let second = store
            .insert("projects", fields(json!({"title": "B"})))
            .await
            .unwrap();
        assert!(!first.id.is_empty());
        assert_ne!(first.id, second.id);

        let docs = store.read_all("projects").await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].fields.get("title").unwrap(), "A");
        assert_eq!(docs[1].fields.get("title").unwrap(), "B");
    }

    #[tokio::test]
    async fn test_write_overwrites_fields() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        let doc = store
            .insert("projects", fields(json!({"title": "A"})))
            .await
            .unwrap();

        store
            .write("projects", &doc.id, fields(json!({"title": "B"})))
            .await
            .unwrap();
        let read = store.read("projects", &doc.id).await.unwrap();
        assert_eq!(read.fields.get("title").unwrap(), "B");
    }

    #[tokio::test]
    async fn test_write_missing_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        let result = store
            .write("projects", "nope", fields(json!({"title": "B"})))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_remove_missing_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        let result = store.remove("projects", "nope").await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_batch_failure_leaves_collection_unchanged() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        let doc = store
            .insert("projects", fields(json!({"title": "A"})))
            .await
            .unwrap();

        let ops = vec![
            BatchOp::Put {
                id: doc.id.clone(),
                fields: fields(json!({"title": "changed"})),
            },
            BatchOp::Delete {
                id: "missing".to_string(),
            },
        ];
        let result = store.apply_batch("projects", ops).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));

        // The Put earlier in the failed batch must not be visible
        let read = store.read("projects", &doc.id).await.unwrap();
        assert_eq!(read.fields.get("title").unwrap(), "A");
    }

    #[tokio::test]
    async fn test_replace_all_swaps_contents() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        store
            .insert("skills", fields(json!({"name": "Old"})))
            .await
            .unwrap();

        let docs = store
            .replace_all(
                "skills",
                vec![fields(json!({"name": "A"})), fields(json!({"name": "B"}))],
            )
            .await
            .unwrap();
        assert_eq!(docs.len(), 2);

        let read = store.read_all("skills").await.unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[0].fields.get("name").unwrap(), "A");
        assert_eq!(read[1].fields.get("name").unwrap(), "B");
    }

    #[tokio::test]
    async fn test_reads_legacy_string_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("collections");
        std::fs::create_dir_all(&path).unwrap();
        std::fs::write(
            path.join("skills.json"),
            r#"{"documents": ["Rust", {"id": "abc", "name": "Go", "order": 0}]}"#,
        )
        .unwrap();

        let store = JsonFileStore::new(dir.path());
        let docs = store.read_all("skills").await.unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs[0].id.is_empty());
        assert_eq!(docs[0].fields.get("name").unwrap(), "Rust");
        assert_eq!(docs[1].id, "abc");
    }
}
