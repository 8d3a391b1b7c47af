//! # Command Layer
//!
//! The business logic of toyverse. Each command lives in its own submodule as a
//! plain function over a [`ToyStore`](crate::store::ToyStore) and, when images
//! are involved, an [`ImageStorage`](crate::storage::ImageStorage).
//!
//! Commands:
//! - return a structured [`CmdResult`], never strings or exit codes
//! - do no terminal I/O and no argument parsing
//! - do not check the session; the API facade does that before calling them
//!
//! Partial failures that should not abort an operation (an image move that did
//! not happen, an additional image that could not be uploaded) become warning
//! [`CmdMessage`]s on the result and a `log::warn!` line.
//!
//! Tests for every command run against `InMemoryStore` and `MemStorage`.
//!
//! ## Command Modules
//!
//! - [`create`]: add a toy with its images and labels
//! - [`update`]: edit a toy
//! - [`delete`]: remove a toy with its rows and blobs
//! - [`view`]: one toy with its gallery
//! - [`list`]: the catalog pipeline over the stored collection
//! - [`usage`]: table row counts and bucket size
//! - [`helpers`]: record loading and image/label plumbing shared by the above

use crate::catalog::CatalogView;
use crate::model::Toy;
use serde::Serialize;

pub mod create;
pub mod delete;
pub mod helpers;
pub mod list;
pub mod update;
pub mod usage;
pub mod view;

pub use update::ToyUpdate;
pub use usage::UsageReport;
pub use view::ToyDetail;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self::with_level(MessageLevel::Info, content)
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self::with_level(MessageLevel::Success, content)
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self::with_level(MessageLevel::Warning, content)
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::with_level(MessageLevel::Error, content)
    }

    fn with_level(level: MessageLevel, content: impl Into<String>) -> Self {
        Self {
            level,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Rows created, edited or deleted, as stored after the operation.
    pub affected_toys: Vec<Toy>,
    pub catalog: Option<CatalogView>,
    pub detail: Option<ToyDetail>,
    pub usage: Option<UsageReport>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_catalog(mut self, catalog: CatalogView) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_detail(mut self, detail: ToyDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn with_usage(mut self, usage: UsageReport) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn warnings(&self) -> impl Iterator<Item = &CmdMessage> {
        self.messages
            .iter()
            .filter(|m| m.level == MessageLevel::Warning)
    }
}
