use super::{check_path, ImageStorage, StorageUsage};
use crate::error::{Result, ToyverseError};
use std::collections::BTreeMap;

const URL_PREFIX: &str = "mem://toy-images/";

/// In-memory bucket for tests, with switchable failures.
#[derive(Debug, Default)]
pub struct MemStorage {
    objects: BTreeMap<String, Vec<u8>>,
    fail_uploads: bool,
    fail_moves: bool,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_uploads(&mut self, fail: bool) {
        self.fail_uploads = fail;
    }

    pub fn set_fail_moves(&mut self, fail: bool) {
        self.fail_moves = fail;
    }

    pub fn paths(&self) -> Vec<String> {
        self.objects.keys().cloned().collect()
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.objects.get(path).map(Vec::as_slice)
    }
}

impl ImageStorage for MemStorage {
    fn upload(&mut self, path: &str, bytes: &[u8]) -> Result<()> {
        check_path(path)?;
        if self.fail_uploads {
            return Err(ToyverseError::Storage("Simulated upload error".into()));
        }
        self.objects.insert(path.to_string(), bytes.to_vec());
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}{}", URL_PREFIX, path)
    }

    fn path_for_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(URL_PREFIX)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
    }

    fn move_object(&mut self, from: &str, to: &str) -> Result<()> {
        check_path(to)?;
        if self.fail_moves {
            return Err(ToyverseError::Storage("Simulated move error".into()));
        }
        let bytes = self
            .objects
            .remove(from)
            .ok_or_else(|| ToyverseError::Storage(format!("Object not found: {}", from)))?;
        self.objects.insert(to.to_string(), bytes);
        Ok(())
    }

    fn remove(&mut self, paths: &[String]) -> Result<()> {
        for path in paths {
            self.objects.remove(path);
        }
        Ok(())
    }

    fn usage(&self) -> Result<StorageUsage> {
        Ok(StorageUsage {
            objects: self.objects.len(),
            bytes: self.objects.values().map(|b| b.len() as u64).sum(),
        })
    }
}
