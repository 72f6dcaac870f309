//! Shared fixtures for the shell scenario tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use api::{Category, LocalAuth, MemoryBlobStore, RecipeDraft, RecipesConfig};
use chrono::{TimeZone, Utc};
use store::{Document, DocumentStore, Fields, MemoryStore, QueryDescriptor, StoreError};
use tokio::sync::oneshot;
use ui::RecipeApp;

pub const COLLECTION: &str = "recipes";

/// MemoryStore wrapper that can hold a page read until released, fail page
/// reads on demand, and count deletes.
#[derive(Clone, Default)]
pub struct TestStore {
    inner: MemoryStore,
    gate: Arc<Mutex<Option<oneshot::Receiver<()>>>>,
    fail_reads: Arc<AtomicBool>,
    deletes: Arc<AtomicUsize>,
}

impl TestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    /// The next `read_many` waits until the returned sender fires.
    pub fn arm_gate(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn delete_calls(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

impl DocumentStore for TestStore {
    async fn create(&self, collection: &str, fields: Fields) -> store::Result<String> {
        self.inner.create(collection, fields).await
    }

    async fn read_one(&self, collection: &str, id: &str) -> store::Result<Option<Document>> {
        self.inner.read_one(collection, id).await
    }

    async fn read_many(
        &self,
        collection: &str,
        query: &QueryDescriptor,
    ) -> store::Result<Vec<Document>> {
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("network down".to_string()));
        }
        self.inner.read_many(collection, query).await
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> store::Result<()> {
        self.inner.update(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &str) -> store::Result<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(collection, id).await
    }
}

pub type TestApp = RecipeApp<TestStore, LocalAuth, MemoryBlobStore>;

pub fn app(store: &TestStore, auth: &LocalAuth) -> TestApp {
    RecipeApp::new(
        store.clone(),
        auth.clone(),
        MemoryBlobStore::new("https://storage.example", "recipes-bucket"),
        RecipesConfig::default(),
    )
}

/// A valid recipe published on day `day` of March 2024.
pub fn draft(name: &str, day: u32, category: Category, published: bool) -> RecipeDraft {
    RecipeDraft {
        name: name.to_string(),
        category,
        directions: format!("Make the {name}"),
        ingredients: vec!["flour".to_string(), "water".to_string()],
        publish_date: Utc.with_ymd_and_hms(2024, 3, day, 8, 30, 0).unwrap(),
        is_published: published,
        image_url: Some(format!("https://img.example/{name}.png")),
    }
}

/// Store `drafts` directly, bypassing the shell. Returns ids in input order.
pub async fn seed(store: &TestStore, drafts: &[RecipeDraft]) -> Vec<String> {
    let mut ids = Vec::new();
    for draft in drafts {
        ids.push(store.create(COLLECTION, draft.to_fields()).await.unwrap());
    }
    ids
}
