//! Blob storage for toy images.
//!
//! Objects live in one bucket under slash-separated paths:
//!
//! - `temp/{millis}-{file}`: primary image before its toy row exists
//! - `{toy_id}/primary-{millis}-{file}`
//! - `{toy_id}/additional-{millis}-{file}`
//!
//! Rows store public URLs, not paths, so every backend must be able to map a
//! URL it handed out back to its path ([`ImageStorage::path_for_url`]).

use crate::error::{Result, ToyverseError};
use serde::{Deserialize, Serialize};

pub mod fs;
pub mod memory;

pub use fs::FsStorage;
pub use memory::MemStorage;

/// Object count and byte total of a bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageUsage {
    pub objects: usize,
    pub bytes: u64,
}

pub trait ImageStorage {
    /// Stores `bytes` at `path`, replacing any existing object.
    fn upload(&mut self, path: &str, bytes: &[u8]) -> Result<()>;

    fn public_url(&self, path: &str) -> String;

    /// Inverse of [`public_url`](Self::public_url). `None` for foreign URLs.
    fn path_for_url(&self, url: &str) -> Option<String>;

    fn move_object(&mut self, from: &str, to: &str) -> Result<()>;

    /// Removes objects. Paths that do not exist are ignored.
    fn remove(&mut self, paths: &[String]) -> Result<()>;

    fn usage(&self) -> Result<StorageUsage>;
}

/// Rejects empty paths, absolute paths and `..` segments.
pub(crate) fn check_path(path: &str) -> Result<()> {
    let bad = path.is_empty()
        || path.starts_with('/')
        || path.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if bad {
        return Err(ToyverseError::Storage(format!(
            "Invalid object path: '{}'",
            path
        )));
    }
    Ok(())
}

/// Object name for an uploaded file: path separators and whitespace become `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_whitespace() {
                '_'
            } else {
                c
            }
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "image".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_path() {
        assert!(check_path("temp/1-a.png").is_ok());
        assert!(check_path("").is_err());
        assert!(check_path("/etc/passwd").is_err());
        assert!(check_path("temp/../x").is_err());
        assert!(check_path("temp//x").is_err());
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("my goku.png"), "my_goku.png");
        assert_eq!(sanitize_file_name("../../x.png"), ".._.._x.png");
        assert_eq!(sanitize_file_name(".."), "image");
        assert_eq!(sanitize_file_name("  "), "image");
    }
}
