//! # Application configuration (`recipes.toml`)
//!
//! Defines the TOML configuration file read at startup
//! (filename: [`RecipesConfig::filename`] = `"recipes.toml"`). It names the
//! collection recipes live in, the page sizes offered to the reader, and where
//! uploaded images are stored.
//!
//! ## Structure
//!
//! ```toml
//! [catalog]
//! collection = "recipes"
//! default_page_size = 3
//! page_sizes = [3, 6, 9]
//!
//! [storage]
//! bucket = "recipes-app"
//! image_dir = "recipes"
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`RecipesConfig`] | Top-level config. Provides builder helpers, TOML (de)serialisation, and the canonical filename. |
//! | [`CatalogConfig`] | Collection name and pagination choices. Default page size is **3**. |
//! | [`StorageConfig`] | Blob bucket and the folder images are uploaded into. |
//!
//! All structs implement `Default` so that a missing or empty config file is
//! equivalent to the default configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration stored in `recipes.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipesConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Catalog (collection + pagination) configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Document collection that holds recipes.
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Page size used before the reader picks one.
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    /// Page sizes the reader may choose from.
    #[serde(default = "default_page_sizes")]
    pub page_sizes: Vec<usize>,
}

fn default_collection() -> String {
    "recipes".to_string()
}

fn default_page_size() -> usize {
    3
}

fn default_page_sizes() -> Vec<usize> {
    vec![3, 6, 9]
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            default_page_size: default_page_size(),
            page_sizes: default_page_sizes(),
        }
    }
}

/// Blob storage configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Folder inside the bucket that recipe images are uploaded to.
    #[serde(default = "default_image_dir")]
    pub image_dir: String,
}

fn default_bucket() -> String {
    "recipes-app".to_string()
}

fn default_image_dir() -> String {
    "recipes".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            image_dir: default_image_dir(),
        }
    }
}

impl RecipesConfig {
    /// Builder method to set the recipe collection.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.catalog.collection = collection.into();
        self
    }

    /// Builder method to set the default page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.catalog.default_page_size = page_size;
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "recipes.toml"
    }

    /// Whether the reader may select this page size.
    pub fn is_allowed_page_size(&self, page_size: usize) -> bool {
        page_size > 0
            && (page_size == self.catalog.default_page_size
                || self.catalog.page_sizes.contains(&page_size))
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
