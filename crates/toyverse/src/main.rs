//! # Toyverse CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this
//! file only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/toyverseapp/`: UI-agnostic catalog library (pipeline, stores, commands, API)
//! - `crates/toyverse/`: this CLI, a client of `toyverseapp`
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/toyverse/src/cli/)                       │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - context wiring + dispatch (commands.rs)                  │
//! │  - colored terminal output (print.rs)                       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/toyverseapp/src/api.rs)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The CLI owns every user-facing concern: argument parsing, config and logger
//! setup, signing in, rendering and exit codes.
//!
//! ## Testing Approach
//!
//! - Formatting helpers are unit tested in `print.rs`, argument parsing in `setup.rs`.
//! - `tests/cli_e2e.rs` runs the built binary against a temporary catalog.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
