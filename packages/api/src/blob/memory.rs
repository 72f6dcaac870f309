use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;
use uuid::Uuid;

use super::{progress_percent, storage_path_from_url, BlobError, BlobStore};

/// Default upload chunk size (256 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 256 * 1024;

/// In-memory BlobStore for testing and desktop use.
#[derive(Clone, Debug)]
pub struct MemoryBlobStore {
    base_url: String,
    bucket: String,
    chunk_size: usize,
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryBlobStore {
    pub fn new(base_url: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            objects: Arc::default(),
        }
    }

    /// Builder method to set the upload chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Stored bytes at a path, if any.
    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    fn download_url(&self, path: &str) -> String {
        format!(
            "{}/v0/b/{}/o/{}?alt=media&token={}",
            self.base_url,
            self.bucket,
            urlencoding::encode(path),
            Uuid::new_v4()
        )
    }
}

impl BlobStore for MemoryBlobStore {
    async fn upload<F>(&self, bytes: &[u8], path: &str, mut on_progress: F) -> Result<String, BlobError>
    where
        F: FnMut(u8),
    {
        if bytes.is_empty() {
            return Err(BlobError::EmptyUpload);
        }

        let mut received = Vec::with_capacity(bytes.len());
        for chunk in bytes.chunks(self.chunk_size) {
            received.extend_from_slice(chunk);
            let percent = progress_percent(received.len(), bytes.len());
            debug!(path, percent, "upload progress");
            on_progress(percent);
        }

        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_string(), received);
        Ok(self.download_url(path))
    }

    async fn delete(&self, download_url: &str) -> Result<(), BlobError> {
        let path = storage_path_from_url(download_url)?;
        let removed = self
            .objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&path);
        match removed {
            Some(_) => {
                debug!(%path, "deleted object");
                Ok(())
            }
            None => Err(BlobError::NotFound(path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_reports_progress_and_returns_url() {
        let blobs = MemoryBlobStore::new("https://storage.example/", "bucket").with_chunk_size(4);
        let mut progress = Vec::new();

        let url = blobs
            .upload(b"0123456789", "recipes/pie.png", |p| progress.push(p))
            .await
            .unwrap();

        assert_eq!(progress, vec![40, 80, 100]);
        assert!(url.starts_with("https://storage.example/v0/b/bucket/o/recipes%2Fpie.png?alt=media&token="));
        assert_eq!(blobs.get("recipes/pie.png").unwrap(), b"0123456789");
    }

    #[tokio::test]
    async fn test_delete_by_download_url() {
        let blobs = MemoryBlobStore::new("https://storage.example", "bucket");
        let url = blobs.upload(b"img", "recipes/a b.png", |_| {}).await.unwrap();
        assert!(blobs.contains("recipes/a b.png"));

        blobs.delete(&url).await.unwrap();
        assert!(!blobs.contains("recipes/a b.png"));

        assert_eq!(
            blobs.delete(&url).await,
            Err(BlobError::NotFound("recipes/a b.png".to_string()))
        );
    }

    #[tokio::test]
    async fn test_empty_upload_rejected() {
        let blobs = MemoryBlobStore::new("https://storage.example", "bucket");
        assert_eq!(
            blobs.upload(b"", "recipes/x.png", |_| {}).await,
            Err(BlobError::EmptyUpload)
        );
    }
}
