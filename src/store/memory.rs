use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{BatchOp, Document, DocumentStore, Fields, StoreError};

/// In-memory document store used as a test double.
///
/// Counts every store call and supports one-shot failure injection so
/// tests can assert that a failed operation left nothing behind and that
/// rejected requests never reached the store.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
    ops: AtomicU64,
    fail_next: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of store calls of any kind so far.
    pub fn op_count(&self) -> u64 {
        self.ops.load(Ordering::SeqCst)
    }

    /// Make the next store call of any kind fail with
    /// [`StoreError::Unavailable`], without mutating anything.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Seed a collection with raw documents, bypassing id assignment.
    ///
    /// Lets tests set up legacy shapes (id-less entries, missing `order`).
    pub async fn seed(&self, collection: &str, docs: Vec<Document>) {
        let mut collections = self.collections.lock().await;
        collections.insert(collection.to_string(), docs);
    }

    fn enter(&self) -> Result<(), StoreError> {
        self.ops.fetch_add(1, Ordering::SeqCst);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.enter()?;
        let collections = self.collections.lock().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn read(&self, collection: &str, id: &str) -> Result<Document, StoreError> {
        self.enter()?;
        let collections = self.collections.lock().await;
        collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn insert(&self, collection: &str, fields: Fields) -> Result<Document, StoreError> {
        self.enter()?;
        let mut collections = self.collections.lock().await;
        let doc = Document::new(Uuid::new_v4().to_string(), fields);
        collections
            .entry(collection.to_string())
            .or_default()
            .push(doc.clone());
        Ok(doc)
    }

    async fn write(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        self.enter()?;
        let mut collections = self.collections.lock().await;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        doc.fields = fields;
        Ok(())
    }

    async fn remove(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.enter()?;
        let mut collections = self.collections.lock().await;
        let docs = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let before = docs.len();
        docs.retain(|doc| doc.id != id);
        if docs.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn apply_batch(&self, collection: &str, ops: Vec<BatchOp>) -> Result<(), StoreError> {
        self.enter()?;
        let mut collections = self.collections.lock().await;
        let docs = collections.entry(collection.to_string()).or_default();

        // Stage on a copy so a failing op leaves the collection unchanged
        let mut staged = docs.clone();
        for op in ops {
            match op {
                BatchOp::Put { id, fields } => match staged.iter_mut().find(|doc| doc.id == id) {
                    Some(doc) => doc.fields = fields,
                    None => staged.push(Document::new(id, fields)),
                },
                BatchOp::Delete { id } => {
                    let before = staged.len();
                    staged.retain(|doc| doc.id != id);
                    if staged.len() == before {
                        return Err(StoreError::NotFound(id));
                    }
                }
            }
        }
        *docs = staged;
        Ok(())
    }

    async fn replace_all(
        &self,
        collection: &str,
        docs: Vec<Fields>,
    ) -> Result<Vec<Document>, StoreError> {
        self.enter()?;
        let documents: Vec<Document> = docs
            .into_iter()
            .map(|fields| Document::new(Uuid::new_v4().to_string(), fields))
            .collect();
        let mut collections = self.collections.lock().await;
        collections.insert(collection.to_string(), documents.clone());
        Ok(documents)
    }
}
