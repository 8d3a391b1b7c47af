//! # Configuration
//!
//! Toyverse configuration is a [`confique`] struct, loaded in priority order:
//! 1. **Environment variables**: `TOYVERSE_DATA_FILE`, `TOYVERSE_CURRENCY`, etc.
//! 2. **Config file**: `toyverse.toml`, located by the caller (the CLI uses the
//!    OS config directory or `--config`). A missing file is skipped.
//! 3. **Compiled defaults**: `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_file` | data dir `/toys.json` | JSON snapshot of the catalog tables |
//! | `images_dir` | data dir `/images` | Directory holding image blobs |
//! | `public_url_base` | none | Base URL images are served from; `file://` URLs otherwise |
//! | `currency` | `$` | Symbol prefixed to prices |
//! | `default_sort` | `newest` | Sort used when `--sort` is not given |
//! | `owner_email` | `owner@toyverse.local` | Account mutating commands sign in as |
//! | `owner_password` | none | Password of that account; no password means read-only |

use crate::catalog::SortBy;
use crate::error::{Result, ToyverseError};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "toyverse.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ToyverseConfig {
    #[config(env = "TOYVERSE_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    #[config(env = "TOYVERSE_IMAGES_DIR")]
    pub images_dir: Option<PathBuf>,

    #[config(env = "TOYVERSE_PUBLIC_URL_BASE")]
    pub public_url_base: Option<String>,

    #[config(default = "$", env = "TOYVERSE_CURRENCY")]
    pub currency: String,

    #[config(default = "newest", env = "TOYVERSE_DEFAULT_SORT")]
    pub default_sort: String,

    #[config(default = "owner@toyverse.local", env = "TOYVERSE_OWNER_EMAIL")]
    pub owner_email: String,

    #[config(env = "TOYVERSE_OWNER_PASSWORD")]
    pub owner_password: Option<String>,
}

impl Default for ToyverseConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            images_dir: None,
            public_url_base: None,
            currency: "$".to_string(),
            default_sort: "newest".to_string(),
            owner_email: "owner@toyverse.local".to_string(),
            owner_password: None,
        }
    }
}

impl ToyverseConfig {
    /// Environment over `file` (if it exists) over defaults.
    pub fn load(file: &Path) -> Result<Self> {
        let config = Self::builder().env().file(file).load()?;
        config.default_sort()?;
        log::debug!("loaded config (file: {})", file.display());
        Ok(config)
    }

    /// `file` over defaults, ignoring the environment.
    pub fn from_file(file: &Path) -> Result<Self> {
        let config = Self::builder().file(file).load()?;
        config.default_sort()?;
        Ok(config)
    }

    pub fn default_sort(&self) -> Result<SortBy> {
        self.default_sort
            .parse()
            .map_err(|e: crate::catalog::ParseSortError| ToyverseError::Validation(e.to_string()))
    }

    pub fn data_file(&self, data_dir: &Path) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(|| data_dir.join("toys.json"))
    }

    pub fn images_dir(&self, data_dir: &Path) -> PathBuf {
        self.images_dir
            .clone()
            .unwrap_or_else(|| data_dir.join("images"))
    }

    /// Template `toyverse.toml` listing every key with its default.
    pub fn template() -> String {
        confique::toml::template::<Self>(confique::toml::FormatOptions::default())
    }
}
