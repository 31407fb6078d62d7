//! Signed-in session and the process-wide state that holds it.

use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::models::User;

/// Refresh this many seconds before the provider's expiry.
const EXPIRY_MARGIN_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix seconds.
    pub expires_at: u64,
    pub user: User,
}

impl Session {
    pub fn is_expired_at(&self, now: u64) -> bool {
        now + EXPIRY_MARGIN_SECS >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(unix_now())
    }
}

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Read access to the current bearer token.
///
/// The API client depends on this rather than on [`AuthState`] itself.
pub trait TokenSource: Send + Sync {
    fn access_token(&self) -> Option<String>;
}

/// What last happened to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// Nothing has happened yet.
    Initial,
    SignedIn,
    Refreshed,
    SignedOut,
}

/// Shared, cloneable handle to the current session.
#[derive(Clone)]
pub struct AuthState {
    session: Arc<RwLock<Option<Session>>>,
    events: Arc<watch::Sender<AuthEvent>>,
}

impl AuthState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthEvent::Initial);
        Self {
            session: Arc::new(RwLock::new(None)),
            events: Arc::new(tx),
        }
    }

    pub fn set(&self, session: Session, event: AuthEvent) {
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = Some(session);
        self.events.send_replace(event);
    }

    pub fn clear(&self) {
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = None;
        self.events.send_replace(AuthEvent::SignedOut);
    }

    pub fn current(&self) -> Option<Session> {
        self.session.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn user(&self) -> Option<User> {
        self.current().map(|s| s.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Receive every login, refresh and logout from now on.
    pub fn subscribe(&self) -> watch::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenSource for AuthState {
    fn access_token(&self) -> Option<String> {
        self.session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|s| s.access_token.clone())
    }
}

#[cfg(test)]
pub(crate) fn sample_session(token: &str, expires_at: u64) -> Session {
    Session {
        access_token: token.to_string(),
        refresh_token: format!("{}-refresh", token),
        expires_at,
        user: User {
            id: "u-1".to_string(),
            email: "admin@example.com".to_string(),
            name: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_includes_margin() {
        let session = sample_session("t", 1_000);
        assert!(!session.is_expired_at(900));
        assert!(session.is_expired_at(940));
        assert!(session.is_expired_at(2_000));
    }

    #[test]
    fn state_exposes_token_and_events() {
        let state = AuthState::new();
        let mut rx = state.subscribe();
        assert_eq!(state.access_token(), None);

        state.set(sample_session("abc", u64::MAX), AuthEvent::SignedIn);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), AuthEvent::SignedIn);
        assert_eq!(state.access_token().as_deref(), Some("abc"));

        let clone = state.clone();
        clone.clear();
        assert!(!state.is_authenticated());
        assert_eq!(*rx.borrow_and_update(), AuthEvent::SignedOut);
    }
}
