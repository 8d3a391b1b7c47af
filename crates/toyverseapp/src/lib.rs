//! # Toyverse Architecture
//!
//! Toyverse is a **UI-agnostic collectibles catalog library**. The CLI in the
//! `toyverse` crate is one client of it; nothing in here knows about terminals.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (toyverse crate)                                       │
//! │  - Parses arguments, formats output, owns exit codes        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade: selectors → ids, session checks, clock      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Create, edit, delete, view, list, usage                  │
//! └─────────────────────────────────────────────────────────────┘
//!                  │                          │
//!                  ▼                          ▼
//! ┌───────────────────────────────┐ ┌───────────────────────────┐
//! │  Catalog pipeline (catalog/)  │ │  Collaborators            │
//! │  filter, sort, stats, facets  │ │  store/ storage/ auth     │
//! │  pure, no I/O                 │ │  traits + local impls     │
//! └───────────────────────────────┘ └───────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust values and returns `Result<CmdResult>`.
//! It never writes to stdout/stderr and never exits the process. Logging goes
//! through the `log` facade; the binary decides whether and where it appears.
//!
//! ## Testing Strategy
//!
//! 1. **Catalog** (`catalog/*.rs`): properties of the pipeline over small record sets.
//! 2. **Commands** (`commands/*.rs`): business logic against `InMemoryStore` and
//!    `MemStorage`, including failure injection.
//! 3. **API** (`api.rs`): dispatch, session checks and selector resolution.
//! 4. **CLI** (`toyverse/tests`): end-to-end runs of the binary.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`catalog`]: Filter, sort, stats and facets over toy records
//! - [`palette`]: Stable type → color assignment
//! - [`commands`]: Business logic for each command
//! - [`store`]: Table store abstraction and implementations
//! - [`storage`]: Image bucket abstraction and implementations
//! - [`auth`]: Sessions
//! - [`model`]: Rows, records and drafts
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod auth;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod palette;
pub mod storage;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
