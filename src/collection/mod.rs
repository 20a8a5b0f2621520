//! Ordered-collection operations over the document store.

mod featured;

pub use featured::FeaturedSelector;

use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::item::Record;
use crate::store::{to_fields, BatchOp, Document, DocumentStore, Fields, StoreError};
use crate::utils::now_iso;

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("Storage error: {0}")]
    Store(StoreError),

    #[error("Item '{0}' not found")]
    NotFound(String),

    #[error("Invalid ordering: {0}")]
    InvalidOrdering(String),
}

impl From<StoreError> for CollectionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}

/// Decode a stored document into a typed record.
fn decode<R: Record>(doc: Document) -> Result<R, serde_json::Error> {
    let mut item: R = serde_json::from_value(Value::Object(doc.fields))?;
    if !doc.id.is_empty() {
        item.set_id(doc.id);
    }
    Ok(item)
}

/// CRUD and reordering for one collection of records.
///
/// Owns `order` and the timestamps: records are appended at
/// `max(order) + 1`, renumbered only through [`OrderedCollection::reorder`],
/// and listed in ascending `order` with order-less records last in their
/// arrival order.
pub struct OrderedCollection<R: Record> {
    store: Arc<dyn DocumentStore>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> OrderedCollection<R> {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    /// List every record, sorted for display.
    ///
    /// Unreadable documents are skipped with a warning rather than
    /// failing the whole listing.
    pub async fn list(&self) -> Result<Vec<R>, CollectionError> {
        let docs = self.store.read_all(R::COLLECTION).await?;
        let mut items: Vec<R> = Vec::with_capacity(docs.len());
        for doc in docs {
            let id = doc.id.clone();
            match decode::<R>(doc) {
                Ok(item) => items.push(item),
                Err(err) => {
                    warn!(collection = R::COLLECTION, id = %id, "Skipping malformed document: {err}");
                }
            }
        }
        // Stable sort: order-less records keep arrival order at the end
        items.sort_by_key(|item| item.order().map_or((1_u8, 0_u32), |o| (0_u8, o)));
        Ok(items)
    }

    /// Fetch a single record by id.
    pub async fn get(&self, id: &str) -> Result<R, CollectionError> {
        let doc = self.store.read(R::COLLECTION, id).await?;
        decode::<R>(doc).map_err(|err| CollectionError::Store(StoreError::Json(err)))
    }

    /// Append a record, assigning `order` and the timestamps.
    pub async fn create(&self, mut item: R) -> Result<R, CollectionError> {
        let existing = self.store.read_all(R::COLLECTION).await?;
        let next_order = existing
            .iter()
            .filter_map(|doc| doc.fields.get("order").and_then(Value::as_u64))
            .max()
            .map_or(0, |max| max.saturating_add(1));
        item.set_order(u32::try_from(next_order).unwrap_or(u32::MAX));

        let now = now_iso();
        item.set_created_at(now.clone());
        item.set_updated_at(now);

        let fields = to_fields(&item)?;
        let doc = self.store.insert(R::COLLECTION, fields).await?;
        item.set_id(doc.id);
        Ok(item)
    }

    /// Merge a partial field patch into a stored record.
    ///
    /// `updatedAt` is refreshed; `id` is never merged.
    pub async fn update(&self, id: &str, patch: Fields) -> Result<(), CollectionError> {
        let doc = self.store.read(R::COLLECTION, id).await?;
        let mut fields = doc.fields;
        for (key, value) in patch {
            if key == "id" {
                continue;
            }
            fields.insert(key, value);
        }
        fields.insert("updatedAt".to_string(), Value::String(now_iso()));
        self.store.write(R::COLLECTION, id, fields).await?;
        Ok(())
    }

    /// Remove a record by id. Remaining `order` values keep their gaps.
    pub async fn delete(&self, id: &str) -> Result<(), CollectionError> {
        self.store.remove(R::COLLECTION, id).await?;
        Ok(())
    }

    /// Renumber the collection to match the given id sequence.
    ///
    /// The sequence must be a permutation of every persisted id; the
    /// renumbering is applied as one atomic batch.
    pub async fn reorder(&self, ids: &[String]) -> Result<(), CollectionError> {
        let docs = self.store.read_all(R::COLLECTION).await?;
        let by_id: HashMap<&str, &Document> = docs
            .iter()
            .filter(|doc| !doc.id.is_empty())
            .map(|doc| (doc.id.as_str(), doc))
            .collect();

        let mut seen: HashSet<&str> = HashSet::with_capacity(ids.len());
        for id in ids {
            if !by_id.contains_key(id.as_str()) {
                return Err(CollectionError::InvalidOrdering(format!(
                    "unknown id '{id}'"
                )));
            }
            if !seen.insert(id.as_str()) {
                return Err(CollectionError::InvalidOrdering(format!(
                    "duplicate id '{id}'"
                )));
            }
        }
        if seen.len() != by_id.len() {
            return Err(CollectionError::InvalidOrdering(
                "sequence must include every item exactly once".to_string(),
            ));
        }

        let now = now_iso();
        let mut ops = Vec::with_capacity(ids.len());
        for (position, id) in ids.iter().enumerate() {
            let Some(doc) = by_id.get(id.as_str()) else {
                continue;
            };
            let mut fields = doc.fields.clone();
            fields.insert(
                "order".to_string(),
                Value::from(u32::try_from(position).unwrap_or(u32::MAX)),
            );
            fields.insert("updatedAt".to_string(), Value::String(now.clone()));
            ops.push(BatchOp::Put {
                id: id.clone(),
                fields,
            });
        }
        self.store.apply_batch(R::COLLECTION, ops).await?;
        Ok(())
    }

    /// Atomically replace the whole collection with the given records.
    ///
    /// `order` becomes the position in the input; prior ids are gone.
    pub async fn replace_all(&self, items: Vec<R>) -> Result<Vec<R>, CollectionError> {
        let now = now_iso();
        let mut docs = Vec::with_capacity(items.len());
        let mut stamped = Vec::with_capacity(items.len());
        for (position, mut item) in items.into_iter().enumerate() {
            item.set_order(u32::try_from(position).unwrap_or(u32::MAX));
            item.set_created_at(now.clone());
            item.set_updated_at(now.clone());
            docs.push(to_fields(&item)?);
            stamped.push(item);
        }

        let persisted = self.store.replace_all(R::COLLECTION, docs).await?;
        for (item, doc) in stamped.iter_mut().zip(persisted) {
            item.set_id(doc.id);
        }
        Ok(stamped)
    }
}
