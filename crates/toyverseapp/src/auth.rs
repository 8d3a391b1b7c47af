//! Sessions.
//!
//! Mutating commands need a signed-in [`User`]. The [`AuthProvider`] trait is
//! what the API facade talks to; [`LocalAuth`] is a fixed account table used
//! by the CLI and the tests.

use crate::error::{Result, ToyverseError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
}

/// Session change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(User),
    SignedOut,
}

pub type AuthListener = Box<dyn FnMut(&AuthEvent)>;

pub trait AuthProvider {
    fn sign_in(&mut self, email: &str, password: &str) -> Result<User>;

    /// Ends the session. Signing out without a session is a no-op.
    fn sign_out(&mut self) -> Result<()>;

    fn current_user(&self) -> Option<&User>;

    /// Registers a listener called on every session change.
    fn subscribe(&mut self, listener: AuthListener);
}

struct Account {
    user: User,
    password: String,
}

#[derive(Default)]
pub struct LocalAuth {
    accounts: Vec<Account>,
    session: Option<User>,
    listeners: Vec<AuthListener>,
}

impl LocalAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, email: &str, password: &str) -> Self {
        self.accounts.push(Account {
            user: User {
                id: Uuid::new_v4(),
                email: email.trim().to_string(),
            },
            password: password.to_string(),
        });
        self
    }

    fn notify(&mut self, event: AuthEvent) {
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}

impl AuthProvider for LocalAuth {
    fn sign_in(&mut self, email: &str, password: &str) -> Result<User> {
        let email = email.trim();
        let user = self
            .accounts
            .iter()
            .find(|a| a.user.email.eq_ignore_ascii_case(email) && a.password == password)
            .map(|a| a.user.clone())
            .ok_or_else(|| ToyverseError::Auth("Invalid email or password".into()))?;

        self.session = Some(user.clone());
        log::info!("signed in as {}", user.email);
        self.notify(AuthEvent::SignedIn(user.clone()));
        Ok(user)
    }

    fn sign_out(&mut self) -> Result<()> {
        if self.session.take().is_some() {
            self.notify(AuthEvent::SignedOut);
        }
        Ok(())
    }

    fn current_user(&self) -> Option<&User> {
        self.session.as_ref()
    }

    fn subscribe(&mut self, listener: AuthListener) {
        self.listeners.push(listener);
    }
}
