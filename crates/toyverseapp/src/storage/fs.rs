use super::{check_path, ImageStorage, StorageUsage};
use crate::error::{Result, ToyverseError};
use std::fs;
use std::path::{Path, PathBuf};

/// Bucket backed by a directory. Object paths map to relative file paths.
///
/// Public URLs are `{public_url_base}/{path}` when a base is configured,
/// otherwise `file://` URLs pointing into the directory.
pub struct FsStorage {
    root: PathBuf,
    public_url_base: Option<String>,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            public_url_base: None,
        }
    }

    pub fn with_public_url_base(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        let trimmed = base.trim().trim_end_matches('/');
        self.public_url_base = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn url_prefix(&self) -> String {
        match &self.public_url_base {
            Some(base) => format!("{}/", base),
            None => format!("file://{}/", self.root.display()),
        }
    }

    fn object_file(&self, path: &str) -> Result<PathBuf> {
        check_path(path)?;
        Ok(self.root.join(path))
    }

    fn ensure_parent(file: &Path) -> Result<()> {
        if let Some(parent) = file.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(ToyverseError::Io)?;
            }
        }
        Ok(())
    }

    fn walk(dir: &Path, usage: &mut StorageUsage) -> Result<()> {
        for entry in fs::read_dir(dir).map_err(ToyverseError::Io)? {
            let entry = entry.map_err(ToyverseError::Io)?;
            let meta = entry.metadata().map_err(ToyverseError::Io)?;
            if meta.is_dir() {
                Self::walk(&entry.path(), usage)?;
            } else {
                usage.objects += 1;
                usage.bytes += meta.len();
            }
        }
        Ok(())
    }
}

impl ImageStorage for FsStorage {
    fn upload(&mut self, path: &str, bytes: &[u8]) -> Result<()> {
        let file = self.object_file(path)?;
        Self::ensure_parent(&file)?;
        fs::write(&file, bytes).map_err(ToyverseError::Io)?;
        log::debug!("stored {} bytes at {}", bytes.len(), path);
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}{}", self.url_prefix(), path)
    }

    fn path_for_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.url_prefix())
            .filter(|p| check_path(p).is_ok())
            .map(str::to_string)
    }

    fn move_object(&mut self, from: &str, to: &str) -> Result<()> {
        let source = self.object_file(from)?;
        let target = self.object_file(to)?;
        if !source.exists() {
            return Err(ToyverseError::Storage(format!("Object not found: {}", from)));
        }
        Self::ensure_parent(&target)?;
        fs::rename(&source, &target).map_err(ToyverseError::Io)?;
        Ok(())
    }

    fn remove(&mut self, paths: &[String]) -> Result<()> {
        for path in paths {
            let file = self.object_file(path)?;
            if file.exists() {
                fs::remove_file(&file).map_err(ToyverseError::Io)?;
            }
        }
        Ok(())
    }

    fn usage(&self) -> Result<StorageUsage> {
        let mut usage = StorageUsage::default();
        if self.root.exists() {
            Self::walk(&self.root, &mut usage)?;
        }
        Ok(usage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_upload_creates_directories() {
        let dir = tempdir().unwrap();
        let mut storage = FsStorage::new(dir.path().join("images"));
        storage.upload("temp/1-a.png", b"abcd").unwrap();

        assert!(dir.path().join("images/temp/1-a.png").exists());
        assert_eq!(
            storage.usage().unwrap(),
            StorageUsage {
                objects: 1,
                bytes: 4
            }
        );
    }

    #[test]
    fn test_move_and_remove() {
        let dir = tempdir().unwrap();
        let mut storage = FsStorage::new(dir.path());
        storage.upload("temp/1-a.png", b"x").unwrap();
        storage.move_object("temp/1-a.png", "t1/primary-1-a.png").unwrap();

        assert!(!dir.path().join("temp/1-a.png").exists());
        assert!(dir.path().join("t1/primary-1-a.png").exists());

        storage
            .remove(&["t1/primary-1-a.png".into(), "t1/missing.png".into()])
            .unwrap();
        assert_eq!(storage.usage().unwrap().objects, 0);
    }

    #[test]
    fn test_file_urls_round_trip() {
        let dir = tempdir().unwrap();
        let storage = FsStorage::new(dir.path());
        let url = storage.public_url("t1/primary-1-a.png");

        assert!(url.starts_with("file://"));
        assert_eq!(storage.path_for_url(&url).as_deref(), Some("t1/primary-1-a.png"));
    }

    #[test]
    fn test_public_url_base() {
        let dir = tempdir().unwrap();
        let storage =
            FsStorage::new(dir.path()).with_public_url_base("https://cdn.example.com/toys/");
        let url = storage.public_url("t1/a.png");

        assert_eq!(url, "https://cdn.example.com/toys/t1/a.png");
        assert_eq!(storage.path_for_url(&url).as_deref(), Some("t1/a.png"));
        assert_eq!(storage.path_for_url("https://cdn.example.com/toys/../x"), None);
    }

    #[test]
    fn test_rejects_escaping_paths() {
        let dir = tempdir().unwrap();
        let mut storage = FsStorage::new(dir.path());
        assert!(storage.upload("../outside.png", b"x").is_err());
    }
}
