//! # Recipe domain and backend clients
//!
//! Everything the application shell calls lives here: the recipe model, the query
//! builder that turns list state into document store queries, and the clients for
//! the identity provider and the image store.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | [`AuthProvider`] trait, the in-process [`LocalAuth`], Argon2id password hashing, observable session state |
//! | [`blob`] | [`BlobStore`] trait, [`MemoryBlobStore`], download-URL path decoding |
//! | [`models`] | [`Recipe`], [`RecipeDraft`], [`Category`], [`SortOrder`], [`UserSession`] |
//! | [`recipes`] | [`RecipeQuery`] (filters, ordering, cursor) and [`RecipeCatalog`] (fetch and CRUD over a [`store::DocumentStore`]) |
//! | [`settings`] | Layered runtime [`Settings`] |
//!
//! Errors from every collaborator are funnelled into [`ApiError`] and returned to
//! the caller unchanged; nothing here retries.

pub mod auth;
pub mod blob;
pub mod error;
pub mod models;
pub mod recipes;
pub mod settings;

pub use auth::{AuthError, AuthProvider, LocalAuth, SessionHub, Subscription};
pub use blob::{BlobError, BlobStore, MemoryBlobStore};
pub use error::{ApiError, Result};
pub use models::{format_publish_date, Category, Recipe, RecipeDraft, SortOrder, UserSession};
pub use recipes::{merge_page, RecipeCatalog, RecipeQuery};
pub use settings::Settings;

pub use store::RecipesConfig;
