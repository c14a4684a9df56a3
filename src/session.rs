//! Session Module
//!
//! Holds the current access/refresh credentials shared between the auth
//! flow and the API client.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// Credentials issued by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access: Option<String>,
    pub refresh: Option<String>,
}

impl Session {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: Some(access.into()),
            refresh: Some(refresh.into()),
        }
    }

    /// Access credential, treating an empty string as absent
    pub fn access_token(&self) -> Option<&str> {
        self.access.as_deref().filter(|token| !token.is_empty())
    }

    /// Refresh credential, treating an empty string as absent
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh.as_deref().filter(|token| !token.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }
}

/// Shared handle to the session.
///
/// Cloning yields another handle to the same credentials. Locks are never
/// held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    inner: Arc<Mutex<Session>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_session(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Copy of the current credentials
    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.lock().access_token().map(str::to_string)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.lock().refresh_token().map(str::to_string)
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_authenticated()
    }

    /// Replace both credentials
    pub fn update(&self, session: Session) {
        info!(
            authenticated = session.is_authenticated(),
            "Session credentials updated"
        );
        *self.lock() = session;
    }

    /// Swap in a new access credential only while `refresh` is still the
    /// held refresh credential. Returns whether the swap happened.
    pub fn replace_access_if(&self, refresh: &str, access: String) -> bool {
        let mut session = self.lock();
        if session.refresh_token() != Some(refresh) {
            debug!("Session changed during refresh, new access credential discarded");
            return false;
        }
        session.access = Some(access);
        debug!("Access credential replaced");
        true
    }

    /// Whether `refresh` is still the held refresh credential
    pub fn holds_refresh(&self, refresh: &str) -> bool {
        self.lock().refresh_token() == Some(refresh)
    }

    pub fn clear(&self) {
        info!("Session cleared");
        *self.lock() = Session::default();
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        // A poisoned lock still holds plain strings, safe to reuse.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
