//! # Filesystem-backed document store
//!
//! [`FileStore`] is a [`DocumentStore`] implementation that persists each document
//! as a JSON file. It is used by the desktop binary so that recipes survive
//! restarts without an external database.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! └── <collection>/
//!     └── <id>.json          # serialized Document
//! ```
//!
//! Queries load every document of the collection and evaluate the
//! [`QueryDescriptor`] in process.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::document::{Document, Fields};
use crate::error::{Result, StoreError};
use crate::query::QueryDescriptor;
use crate::repo::{generate_id, DocumentStore};

/// Filesystem-backed DocumentStore for desktop persistence.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn collection_dir(&self, collection: &str) -> Result<PathBuf> {
        check_segment(collection)?;
        Ok(self.base.join(collection))
    }

    fn document_path(&self, collection: &str, id: &str) -> Result<PathBuf> {
        check_segment(id)?;
        Ok(self.collection_dir(collection)?.join(format!("{id}.json")))
    }

    fn load(&self, path: &Path) -> Result<Option<Document>> {
        match std::fs::read(path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, collection: &str, doc: &Document) -> Result<()> {
        let path = self.document_path(collection, &doc.id)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_vec_pretty(doc)?)?;
        Ok(())
    }

    fn load_all(&self, collection: &str) -> Result<Vec<Document>> {
        let dir = self.collection_dir(collection)?;
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut docs = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(doc) = self.load(&path)? {
                docs.push(doc);
            }
        }
        Ok(docs)
    }
}

/// Collection names and ids become path segments.
fn check_segment(segment: &str) -> Result<()> {
    let valid = !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidDocument(format!(
            "'{segment}' is not a valid collection or document name"
        )))
    }
}

impl DocumentStore for FileStore {
    async fn create(&self, collection: &str, fields: Fields) -> Result<String> {
        let doc = Document::new(generate_id(), fields);
        self.save(collection, &doc)?;
        debug!(collection, id = %doc.id, "created document file");
        Ok(doc.id)
    }

    async fn read_one(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        self.load(&self.document_path(collection, id)?)
    }

    async fn read_many(&self, collection: &str, query: &QueryDescriptor) -> Result<Vec<Document>> {
        let docs = self.load_all(collection)?;
        Ok(query.evaluate(&docs))
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        let path = self.document_path(collection, id)?;
        let mut doc = self
            .load(&path)?
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        doc.merge(fields);
        self.save(collection, &doc)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        match std::fs::remove_file(self.document_path(collection, id)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
