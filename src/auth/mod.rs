//! Administrator authentication.
//!
//! Sign-in is delegated to a hosted identity service ([`HostedIdentity`]).
//! The resulting [`Session`] lives in a shared [`AuthState`]; the API client
//! reads the bearer token through [`TokenSource`]. [`Authenticator`] ties the
//! provider, the state and the on-disk [`SessionStore`] together.

mod provider;
mod session;
mod store;

use tracing::{info, instrument, warn};

pub use provider::{HostedIdentity, IdentityProvider};
pub use session::{unix_now, AuthEvent, AuthState, Session, TokenSource};
pub use store::SessionStore;

use crate::error::{AdminError, FieldError, Result};
use crate::models::User;

pub struct Authenticator<P> {
    provider: P,
    state: AuthState,
    store: SessionStore,
}

impl<P: IdentityProvider> Authenticator<P> {
    pub fn new(provider: P, state: AuthState, store: SessionStore) -> Self {
        Self {
            provider,
            state,
            store,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Pick up the session left by a previous run.
    ///
    /// An expired session is refreshed; if that fails, or the stored file is
    /// unreadable, it is discarded and the caller starts signed out.
    #[instrument(target = "auth", level = "info", skip(self))]
    pub async fn restore(&self) -> Result<Option<User>> {
        let stored = match self.store.load().await {
            Ok(s) => s,
            Err(e) => {
                warn!(target: "auth", error = %e, "Discarding unreadable stored session");
                self.store.clear().await?;
                None
            }
        };

        let Some(session) = stored else {
            return Ok(None);
        };

        if !session.is_expired() {
            let user = session.user.clone();
            self.state.set(session, AuthEvent::SignedIn);
            return Ok(Some(user));
        }

        match self.provider.refresh(&session.refresh_token).await {
            Ok(fresh) => {
                self.store.save(&fresh).await?;
                let user = fresh.user.clone();
                self.state.set(fresh, AuthEvent::Refreshed);
                info!(target: "auth", user = %user.id, "Stored session refreshed");
                Ok(Some(user))
            }
            Err(e) => {
                warn!(target: "auth", error = %e, "Stored session could not be refreshed");
                self.store.clear().await?;
                Ok(None)
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let mut errors = Vec::new();
        if email.trim().is_empty() {
            errors.push(FieldError::new("email", "Email is required"));
        }
        if password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        }
        if !errors.is_empty() {
            return Err(AdminError::Validation(errors));
        }

        let session = self.provider.sign_in(email.trim(), password).await?;
        self.store.save(&session).await?;
        let user = session.user.clone();
        self.state.set(session, AuthEvent::SignedIn);
        Ok(user)
    }

    /// Sign out remotely (best effort) and forget the session locally.
    pub async fn logout(&self) -> Result<()> {
        if let Some(session) = self.state.current() {
            if let Err(e) = self.provider.sign_out(&session.access_token).await {
                warn!(target: "auth", error = %e, "Remote sign-out failed; clearing locally");
            }
        }
        self.state.clear();
        self.store.clear().await
    }

    /// Refresh the session if it is about to expire.
    pub async fn ensure_fresh(&self) -> Result<()> {
        let session = self.state.current().ok_or(AdminError::NotAuthenticated)?;
        if !session.is_expired() {
            return Ok(());
        }
        match self.provider.refresh(&session.refresh_token).await {
            Ok(fresh) => {
                self.store.save(&fresh).await?;
                self.state.set(fresh, AuthEvent::Refreshed);
                Ok(())
            }
            Err(e) => {
                warn!(target: "auth", error = %e, "Session refresh failed");
                self.state.clear();
                self.store.clear().await?;
                Err(AdminError::NotAuthenticated)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::session::sample_session;
    use super::*;

    #[derive(Clone, Default)]
    struct FakeProvider {
        refresh_ok: bool,
        sign_outs: Arc<AtomicUsize>,
    }

    impl IdentityProvider for FakeProvider {
        async fn sign_in(&self, _email: &str, password: &str) -> Result<Session> {
            if password == "secret" {
                Ok(sample_session("fresh", u64::MAX))
            } else {
                Err(AdminError::Auth("Invalid login credentials".into()))
            }
        }

        async fn refresh(&self, _refresh_token: &str) -> Result<Session> {
            if self.refresh_ok {
                Ok(sample_session("refreshed", u64::MAX))
            } else {
                Err(AdminError::Auth("expired".into()))
            }
        }

        async fn sign_out(&self, _access_token: &str) -> Result<()> {
            self.sign_outs.fetch_add(1, Ordering::SeqCst);
            Err(AdminError::Auth("network down".into()))
        }
    }

    fn store() -> SessionStore {
        let path: PathBuf = std::env::temp_dir()
            .join(format!("catalog-admin-auth-{}", uuid::Uuid::new_v4()))
            .join("session.json");
        SessionStore::new(path)
    }

    #[tokio::test]
    async fn login_persists_and_logout_clears() {
        let provider = FakeProvider::default();
        let auth = Authenticator::new(provider.clone(), AuthState::new(), store());

        let user = auth.login(" admin@example.com ", "secret").await.unwrap();
        assert_eq!(user.email, "admin@example.com");
        assert_eq!(auth.state().access_token().as_deref(), Some("fresh"));
        assert!(auth.store.load().await.unwrap().is_some());

        // Remote failure does not keep the session alive locally.
        auth.logout().await.unwrap();
        assert_eq!(provider.sign_outs.load(Ordering::SeqCst), 1);
        assert!(!auth.state().is_authenticated());
        assert!(auth.store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn login_rejects_empty_fields_without_calling_provider() {
        let auth = Authenticator::new(FakeProvider::default(), AuthState::new(), store());
        let err = auth.login("", "").await.unwrap_err();
        match err {
            AdminError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn restore_keeps_live_session() {
        let store = store();
        store.save(&sample_session("live", u64::MAX)).await.unwrap();
        let auth = Authenticator::new(FakeProvider::default(), AuthState::new(), store);

        assert!(auth.restore().await.unwrap().is_some());
        assert_eq!(auth.state().access_token().as_deref(), Some("live"));
    }

    #[tokio::test]
    async fn restore_refreshes_expired_session() {
        let store = store();
        store.save(&sample_session("old", 0)).await.unwrap();
        let provider = FakeProvider {
            refresh_ok: true,
            ..Default::default()
        };
        let auth = Authenticator::new(provider, AuthState::new(), store);

        assert!(auth.restore().await.unwrap().is_some());
        assert_eq!(auth.state().access_token().as_deref(), Some("refreshed"));
    }

    #[tokio::test]
    async fn restore_drops_unrefreshable_session() {
        let store = store();
        store.save(&sample_session("old", 0)).await.unwrap();
        let auth = Authenticator::new(FakeProvider::default(), AuthState::new(), store);

        assert!(auth.restore().await.unwrap().is_none());
        assert!(!auth.state().is_authenticated());
        assert!(auth.store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn ensure_fresh_requires_a_session() {
        let auth = Authenticator::new(FakeProvider::default(), AuthState::new(), store());
        assert!(matches!(
            auth.ensure_fresh().await,
            Err(AdminError::NotAuthenticated)
        ));
    }
}
