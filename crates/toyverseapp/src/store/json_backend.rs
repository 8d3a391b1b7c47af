use super::backend::TableBackend;
use super::Tables;
use crate::error::{Result, ToyverseError};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Table backend persisting the snapshot as one pretty-printed JSON file.
pub struct JsonBackend {
    path: PathBuf,
}

impl JsonBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(&self) -> Result<PathBuf> {
        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !parent.exists() {
            fs::create_dir_all(&parent).map_err(ToyverseError::Io)?;
        }
        Ok(parent)
    }
}

impl TableBackend for JsonBackend {
    fn load_tables(&self) -> Result<Tables> {
        if !self.path.exists() {
            return Ok(Tables::default());
        }
        let content = fs::read_to_string(&self.path).map_err(ToyverseError::Io)?;
        if content.trim().is_empty() {
            return Ok(Tables::default());
        }
        let tables: Tables =
            serde_json::from_str(&content).map_err(ToyverseError::Serialization)?;
        log::debug!(
            "loaded {} toys from {}",
            tables.toys.len(),
            self.path.display()
        );
        Ok(tables)
    }

    fn save_tables(&self, tables: &Tables) -> Result<()> {
        let dir = self.ensure_parent()?;
        let content = serde_json::to_string_pretty(tables).map_err(ToyverseError::Serialization)?;

        let tmp_file = dir.join(format!(".toyverse-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(ToyverseError::Io)?;
        fs::rename(&tmp_file, &self.path).map_err(ToyverseError::Io)?;
        log::debug!(
            "saved {} toys to {}",
            tables.toys.len(),
            self.path.display()
        );
        Ok(())
    }
}
