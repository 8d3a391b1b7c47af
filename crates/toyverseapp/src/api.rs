//! # API Facade
//!
//! A **thin facade** over the command layer and the single entry point for
//! every UI. It:
//! - resolves toy selectors (full UUIDs or unambiguous prefixes) to ids
//! - checks the session before create, edit and delete
//! - supplies the clock
//! - dispatches to `commands::*` and returns their [`CmdResult`]
//!
//! It holds no business logic and does no I/O of its own.
//!
//! ## Selectors
//!
//! Ids are long, so anywhere a toy is named the caller may pass a prefix of its
//! UUID (at least [`MIN_PREFIX_LEN`] characters). A prefix matching no toy, or
//! more than one, is an `Api` error. A full UUID is passed through unchecked,
//! so an unknown one surfaces as `ToyNotFound` from the command.
//!
//! ## Generic Over Collaborators
//!
//! `ToyverseApi<S, I, A>` is generic over the table store, the image bucket and
//! the auth provider:
//! - CLI: `ToyverseApi<FileStore, FsStorage, LocalAuth>`
//! - Tests: `ToyverseApi<InMemoryStore, MemStorage, LocalAuth>`

use crate::auth::{AuthListener, AuthProvider, User};
use crate::catalog::FilterConfig;
use crate::commands::{self, helpers, CmdResult, ToyUpdate};
use crate::error::{Result, ToyverseError};
use crate::model::{ImageUpload, ToyDraft, ToyRecord};
use crate::storage::ImageStorage;
use crate::store::ToyStore;
use chrono::Utc;
use uuid::Uuid;

pub use crate::commands::{CmdMessage, MessageLevel};

pub const MIN_PREFIX_LEN: usize = 4;

pub struct ToyverseApi<S: ToyStore, I: ImageStorage, A: AuthProvider> {
    store: S,
    storage: I,
    auth: A,
}

impl<S: ToyStore, I: ImageStorage, A: AuthProvider> ToyverseApi<S, I, A> {
    pub fn new(store: S, storage: I, auth: A) -> Self {
        Self {
            store,
            storage,
            auth,
        }
    }

    pub fn sign_in(&mut self, email: &str, password: &str) -> Result<User> {
        self.auth.sign_in(email, password)
    }

    pub fn sign_out(&mut self) -> Result<()> {
        self.auth.sign_out()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.auth.current_user()
    }

    pub fn on_auth_change(&mut self, listener: AuthListener) {
        self.auth.subscribe(listener);
    }

    /// All toys as pipeline records, newest first.
    pub fn records(&self) -> Result<Vec<ToyRecord>> {
        helpers::load_records(&self.store)
    }

    pub fn list_toys(&self, config: &FilterConfig, search: &str) -> Result<CmdResult> {
        commands::list::run(&self.store, config, search, Utc::now())
    }

    pub fn view_toy(&self, selector: &str) -> Result<CmdResult> {
        let id = self.resolve_id(selector)?;
        commands::view::run(&self.store, &id)
    }

    pub fn create_toy(
        &mut self,
        draft: &ToyDraft,
        primary: Option<&ImageUpload>,
        additional: &[ImageUpload],
    ) -> Result<CmdResult> {
        helpers::require_user(&self.auth, "add toys")?;
        commands::create::run(
            &mut self.store,
            &mut self.storage,
            draft,
            primary,
            additional,
            Utc::now(),
        )
    }

    pub fn update_toy(&mut self, selector: &str, update: &ToyUpdate) -> Result<CmdResult> {
        helpers::require_user(&self.auth, "edit toys")?;
        let id = self.resolve_id(selector)?;
        commands::update::run(&mut self.store, &mut self.storage, &id, update, Utc::now())
    }

    pub fn delete_toy(&mut self, selector: &str) -> Result<CmdResult> {
        helpers::require_user(&self.auth, "delete toys")?;
        let id = self.resolve_id(selector)?;
        commands::delete::run(&mut self.store, &mut self.storage, &id)
    }

    pub fn usage(&self) -> Result<CmdResult> {
        commands::usage::run(&self.store, &self.storage)
    }

    /// Draft pre-filled with a toy's current values and labels.
    pub fn draft_for(&self, selector: &str) -> Result<ToyDraft> {
        let id = self.resolve_id(selector)?;
        let toy = self.store.get_toy(&id)?;
        let labels = self
            .store
            .labels_for(&id)?
            .into_iter()
            .map(|l| l.name)
            .collect();
        Ok(ToyDraft::from_toy(&toy, labels))
    }

    /// Full UUID, or a unique prefix of one.
    pub fn resolve_id(&self, selector: &str) -> Result<Uuid> {
        let selector = selector.trim().to_ascii_lowercase();
        if let Ok(id) = Uuid::parse_str(&selector) {
            return Ok(id);
        }
        if selector.len() < MIN_PREFIX_LEN {
            return Err(ToyverseError::Api(format!(
                "Toy id '{}' is too short, use at least {} characters",
                selector, MIN_PREFIX_LEN
            )));
        }

        let matches: Vec<Uuid> = self
            .store
            .list_toys()?
            .into_iter()
            .map(|t| t.id)
            .filter(|id| id.to_string().starts_with(&selector))
            .collect();
        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(ToyverseError::Api(format!("No toy matches '{}'", selector))),
            _ => Err(ToyverseError::Api(format!(
                "'{}' matches {} toys, use more characters",
                selector,
                matches.len()
            ))),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn storage(&self) -> &I {
        &self.storage
    }
}
