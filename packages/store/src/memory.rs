use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::document::{Document, Fields};
use crate::error::{Result, StoreError};
use crate::query::QueryDescriptor;
use crate::repo::{generate_id, DocumentStore};

type Collections = HashMap<String, BTreeMap<String, Document>>;

/// In-memory DocumentStore for testing and offline use.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    collections: Arc<Mutex<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>> {
        self.collections
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    /// Insert a document under a caller-chosen id, replacing any existing one.
    pub fn insert(&self, collection: &str, doc: Document) -> Result<()> {
        self.lock()?
            .entry(collection.to_string())
            .or_default()
            .insert(doc.id.clone(), doc);
        Ok(())
    }

    /// Number of documents in a collection.
    pub fn len(&self, collection: &str) -> Result<usize> {
        Ok(self.lock()?.get(collection).map_or(0, BTreeMap::len))
    }
}

impl DocumentStore for MemoryStore {
    async fn create(&self, collection: &str, fields: Fields) -> Result<String> {
        let id = generate_id();
        self.insert(collection, Document::new(id.clone(), fields))?;
        debug!(collection, %id, "created document");
        Ok(id)
    }

    async fn read_one(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        Ok(self
            .lock()?
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn read_many(&self, collection: &str, query: &QueryDescriptor) -> Result<Vec<Document>> {
        let guard = self.lock()?;
        let page = match guard.get(collection) {
            Some(docs) => query.evaluate(docs.values()),
            None => Vec::new(),
        };
        debug!(collection, returned = page.len(), "read_many");
        Ok(page)
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        let mut guard = self.lock()?;
        let doc = guard
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        doc.merge(fields);
        debug!(collection, id, "updated document");
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        if let Some(docs) = self.lock()?.get_mut(collection) {
            docs.remove(id);
        }
        debug!(collection, id, "deleted document");
        Ok(())
    }
}
