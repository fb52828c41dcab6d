//! Explicit bearer-token session.
//!
//! The token lives in a shared [`Session`] object handed to the client at
//! construction, so its lifecycle is explicit: set on login, cleared on
//! logout, never ambient module state. How the token is persisted between
//! runs is the caller's business.

use std::sync::{Arc, RwLock};

/// Shared authentication state for one user session.
///
/// Cheap to clone; all clones observe the same token.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
}

impl Session {
    /// A session with no token (anonymous).
    pub fn new() -> Self {
        Self::default()
    }

    /// A session pre-loaded with a bearer token.
    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.set_token(token);
        session
    }

    /// The current bearer token, if logged in.
    pub fn token(&self) -> Option<String> {
        self.token.read().expect("session lock poisoned").clone()
    }

    /// Store a token (on login).
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().expect("session lock poisoned") = Some(token.into());
    }

    /// Drop the token (on logout).
    pub fn clear(&self) {
        *self.token.write().expect("session lock poisoned") = None;
    }

    /// Whether a token is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.token.read().expect("session lock poisoned").is_some()
    }
}
