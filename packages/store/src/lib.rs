pub mod config;
pub mod document;
pub mod error;
pub mod query;
pub mod repo;

mod memory;
pub use memory::MemoryStore;

mod file_store;
pub use file_store::FileStore;

pub use config::RecipesConfig;
pub use document::{Document, Fields, Timestamp, Value};
pub use error::{Result, StoreError};
pub use query::{Direction, Filter, OrderBy, QueryDescriptor};
pub use repo::DocumentStore;
