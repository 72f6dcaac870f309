//! Runtime settings, layered from defaults, an optional `recipes.toml`, and
//! `RECIPES__*` environment variables (a `.env` file is loaded first).

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use store::config::{CatalogConfig, StorageConfig};
use store::RecipesConfig;

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_VAR: &str = "RECIPES_CONFIG";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Runtime {
    /// Where the desktop build keeps its documents; platform data dir when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    pub storage_base_url: String,
}

impl Default for Runtime {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_base_url: "http://localhost:9199".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub runtime: Runtime,
}

impl Settings {
    /// Load settings from `RECIPES_CONFIG` (default `recipes.toml`) and the environment.
    pub fn new() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let path = std::env::var(CONFIG_PATH_VAR)
            .unwrap_or_else(|_| RecipesConfig::filename().to_string());
        Self::from_sources(&path, Environment::with_prefix("RECIPES").separator("__"))
    }

    fn from_sources(path: &str, env: Environment) -> Result<Self, ConfigError> {
        let defaults = Runtime::default();
        Config::builder()
            .set_default("runtime.storage_base_url", defaults.storage_base_url)?
            .add_source(File::with_name(path).format(FileFormat::Toml).required(false))
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// The file-level part of the settings.
    pub fn recipes_config(&self) -> RecipesConfig {
        RecipesConfig {
            catalog: self.catalog.clone(),
            storage: self.storage.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("RECIPES")
            .separator("__")
            .source(Some(source))
    }

    #[test]
    fn test_defaults_without_sources() {
        let settings = Settings::from_sources("does-not-exist.toml", env(&[])).unwrap();
        assert_eq!(settings.recipes_config(), RecipesConfig::default());
        assert_eq!(settings.runtime.storage_base_url, "http://localhost:9199");
        assert!(settings.runtime.data_dir.is_none());
    }

    #[test]
    fn test_environment_overrides() {
        let settings = Settings::from_sources(
            "does-not-exist.toml",
            env(&[
                ("RECIPES__CATALOG__DEFAULT_PAGE_SIZE", "6"),
                ("RECIPES__STORAGE__BUCKET", "test-bucket"),
                ("RECIPES__RUNTIME__DATA_DIR", "/tmp/recipes"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.catalog.default_page_size, 6);
        assert_eq!(settings.catalog.collection, "recipes");
        assert_eq!(settings.storage.bucket, "test-bucket");
        assert_eq!(settings.runtime.data_dir, Some(PathBuf::from("/tmp/recipes")));
    }
}
