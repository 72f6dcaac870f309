//! # Document store interface
//!
//! [`DocumentStore`] is the boundary to the external document database. The rest of
//! the workspace talks to persistence only through this trait, so the same recipe
//! logic runs against [`crate::MemoryStore`] in tests and [`crate::FileStore`] on
//! desktop.
//!
//! | Method | Contract |
//! |--------|----------|
//! | [`create`](DocumentStore::create) | Insert a new document; the store assigns and returns its id. |
//! | [`read_one`](DocumentStore::read_one) | Point read; `Ok(None)` when the id does not exist. |
//! | [`read_many`](DocumentStore::read_many) | Filtered, ordered, limited page, optionally starting after an anchor document. |
//! | [`update`](DocumentStore::update) | Merge a partial field map into an existing document; `NotFound` if absent. |
//! | [`delete`](DocumentStore::delete) | Remove a document; deleting a missing id succeeds. |
//!
//! Each operation is atomic at single-document granularity. There are no
//! transactions and no retries at this layer.

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::document::{Document, Fields};
use crate::error::Result;
use crate::query::QueryDescriptor;

/// Length of store-generated document ids.
pub const ID_LEN: usize = 20;

/// Async interface to a collection-oriented document database.
pub trait DocumentStore {
    fn create(
        &self,
        collection: &str,
        fields: Fields,
    ) -> impl std::future::Future<Output = Result<String>>;
    fn read_one(
        &self,
        collection: &str,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Document>>>;
    fn read_many(
        &self,
        collection: &str,
        query: &QueryDescriptor,
    ) -> impl std::future::Future<Output = Result<Vec<Document>>>;
    fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> impl std::future::Future<Output = Result<()>>;
    fn delete(
        &self,
        collection: &str,
        id: &str,
    ) -> impl std::future::Future<Output = Result<()>>;
}

/// Generate a fresh random alphanumeric document id.
pub fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(char::from)
        .collect()
}
