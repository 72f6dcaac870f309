//! # Blob storage
//!
//! [`BlobStore`] is the boundary to the object store that holds recipe images.
//!
//! - `upload` streams bytes to a path and reports progress as whole percentages
//!   (`round(transferred / total * 100)`), resolving to a durable download URL.
//! - `delete` takes that download URL back. The storage path has to be recovered
//!   from the URL first; see [`storage_path_from_url`].
//!
//! Download URLs have the shape
//! `{base}/v0/b/{bucket}/o/{percent-encoded path}?alt=media&token={token}`.

mod memory;

pub use memory::MemoryBlobStore;

use thiserror::Error;
use uuid::Uuid;

/// Failure of a blob operation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BlobError {
    #[error("not a storage download URL: {0}")]
    InvalidUrl(String),

    #[error("no object stored at {0}")]
    NotFound(String),

    #[error("cannot upload an empty file")]
    EmptyUpload,
}

/// Async interface to an object store.
pub trait BlobStore {
    fn upload<F>(
        &self,
        bytes: &[u8],
        path: &str,
        on_progress: F,
    ) -> impl std::future::Future<Output = Result<String, BlobError>>
    where
        F: FnMut(u8);
    fn delete(&self, download_url: &str) -> impl std::future::Future<Output = Result<(), BlobError>>;
}

/// Recover the object path from a download URL.
///
/// The path is the text between `/o/` and the query string, percent-decoded.
pub fn storage_path_from_url(download_url: &str) -> Result<String, BlobError> {
    let invalid = || BlobError::InvalidUrl(download_url.to_string());

    let start = download_url.find("/o/").ok_or_else(invalid)? + "/o/".len();
    let rest = &download_url[start..];
    let encoded = match rest.find('?') {
        Some(end) => &rest[..end],
        None => return Err(invalid()),
    };
    if encoded.is_empty() {
        return Err(invalid());
    }

    urlencoding::decode(encoded)
        .map(|path| path.into_owned())
        .map_err(|_| invalid())
}

/// Build a unique object path for an uploaded image.
pub fn image_path(dir: &str, file_name: &str) -> String {
    let dir = dir.trim_matches('/');
    let file_name = file_name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(file_name);
    if dir.is_empty() {
        format!("{}-{}", Uuid::new_v4(), file_name)
    } else {
        format!("{}/{}-{}", dir, Uuid::new_v4(), file_name)
    }
}

/// Whole-percent progress of a transfer.
pub fn progress_percent(transferred: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((transferred as f64 / total as f64) * 100.0).round().min(100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_from_download_url() {
        let url = "https://storage.example/v0/b/bucket/o/recipes%2Fabc-pie%20crust.png?alt=media&token=t";
        assert_eq!(
            storage_path_from_url(url).unwrap(),
            "recipes/abc-pie crust.png"
        );
    }

    #[test]
    fn test_encoded_question_mark_survives() {
        let url = "https://s/v0/b/b/o/recipes%2Fwhat%3F.png?alt=media";
        assert_eq!(storage_path_from_url(url).unwrap(), "recipes/what?.png");
    }

    #[test]
    fn test_invalid_urls() {
        for url in [
            "https://s/v0/b/b/recipes.png?alt=media",
            "https://s/v0/b/b/o/recipes.png",
            "https://s/v0/b/b/o/?alt=media",
        ] {
            assert!(matches!(
                storage_path_from_url(url),
                Err(BlobError::InvalidUrl(_))
            ));
        }
    }

    #[test]
    fn test_image_path_is_unique_and_scoped() {
        let a = image_path("recipes", "pie.png");
        let b = image_path("recipes/", "C:\\photos\\pie.png");
        assert!(a.starts_with("recipes/") && a.ends_with("-pie.png"));
        assert!(b.starts_with("recipes/") && b.ends_with("-pie.png"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_progress_percent_rounds() {
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(3, 3), 100);
        assert_eq!(progress_percent(0, 0), 100);
    }
}
