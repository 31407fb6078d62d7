//! Hosted identity service client.
//!
//! Speaks the password / refresh-token grant of the hosted auth REST API.
//! Every call carries the project's publishable key in the `apikey` header.
//! Credentials and tokens are never logged.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use super::session::{unix_now, Session};
use crate::error::{AdminError, Result};
use crate::models::User;

/// Something that can exchange credentials for a [`Session`].
pub trait IdentityProvider: Send + Sync {
    fn sign_in(&self, email: &str, password: &str) -> impl Future<Output = Result<Session>> + Send;
    fn refresh(&self, refresh_token: &str) -> impl Future<Output = Result<Session>> + Send;
    fn sign_out(&self, access_token: &str) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Clone)]
pub struct HostedIdentity {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    expires_at: Option<u64>,
    user: IdentityUser,
}

#[derive(Deserialize)]
struct IdentityUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Value,
}

impl TokenResponse {
    fn into_session(self) -> Session {
        let expires_at = self
            .expires_at
            .unwrap_or_else(|| unix_now() + self.expires_in.unwrap_or(3600));
        let name = ["name", "full_name"]
            .iter()
            .find_map(|k| self.user.user_metadata.get(*k).and_then(Value::as_str))
            .map(str::to_string);
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: User {
                id: self.user.id,
                email: self.user.email.unwrap_or_default(),
                name,
            },
        }
    }
}

/// Pull a readable message out of an identity-service error body.
fn extract_auth_error(body: &str) -> Option<String> {
    let v: Value = serde_json::from_str(body).ok()?;
    ["error_description", "msg", "message", "error"]
        .iter()
        .find_map(|k| v.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}

impl HostedIdentity {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    async fn token_grant(&self, grant_type: &str, body: Value) -> Result<Session> {
        let url = format!("{}/auth/v1/token", self.base_url);
        let res = self
            .client
            .post(&url)
            .query(&[("grant_type", grant_type)])
            .header("apikey", &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            let msg = extract_auth_error(&body)
                .unwrap_or_else(|| format!("identity service returned {}", status));
            warn!(target: "auth", %status, grant_type, "Token grant rejected");
            return Err(AdminError::Auth(msg));
        }

        let token: TokenResponse = res.json().await?;
        Ok(token.into_session())
    }
}

impl IdentityProvider for HostedIdentity {
    #[instrument(target = "auth", level = "info", skip(self, password))]
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let session = self
            .token_grant("password", json!({ "email": email, "password": password }))
            .await?;
        info!(target: "auth", user = %session.user.id, "Signed in");
        Ok(session)
    }

    #[instrument(target = "auth", level = "info", skip_all)]
    async fn refresh(&self, refresh_token: &str) -> Result<Session> {
        self.token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }

    #[instrument(target = "auth", level = "info", skip_all)]
    async fn sign_out(&self, access_token: &str) -> Result<()> {
        let url = format!("{}/auth/v1/logout", self.base_url);
        let res = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", access_token))
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(AdminError::Auth(
                extract_auth_error(&body).unwrap_or_else(|| format!("logout returned {}", status)),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::extract::Query;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};

    use super::*;
    use crate::test_support::spawn;

    async fn token(
        Query(q): Query<HashMap<String, String>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        if headers.get("apikey").and_then(|v| v.to_str().ok()) != Some("pk_test") {
            return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "No API key" })));
        }
        let ok = match q.get("grant_type").map(String::as_str) {
            Some("password") => body["password"] == "secret",
            Some("refresh_token") => body["refresh_token"] == "r-1",
            _ => false,
        };
        if !ok {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "invalid_grant", "error_description": "Invalid login credentials" })),
            );
        }
        (
            StatusCode::OK,
            Json(json!({
                "access_token": "a-1",
                "refresh_token": "r-1",
                "expires_in": 3600,
                "user": { "id": "u-9", "email": body["email"], "user_metadata": { "name": "Admin" } }
            })),
        )
    }

    async fn provider() -> HostedIdentity {
        let router = Router::new()
            .route("/auth/v1/token", post(token))
            .route("/auth/v1/logout", post(|| async { StatusCode::NO_CONTENT }));
        let url = spawn(router).await;
        HostedIdentity::new(&url, "pk_test", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn password_grant_builds_session() {
        let p = provider().await;
        let session = p.sign_in("admin@example.com", "secret").await.unwrap();
        assert_eq!(session.access_token, "a-1");
        assert_eq!(session.user.email, "admin@example.com");
        assert_eq!(session.user.display_name(), "Admin");
        assert!(!session.is_expired());
    }

    #[tokio::test]
    async fn rejected_credentials_surface_provider_message() {
        let p = provider().await;
        let err = p.sign_in("admin@example.com", "wrong").await.unwrap_err();
        assert_eq!(err.user_message(), "Invalid login credentials");
    }

    #[tokio::test]
    async fn refresh_and_sign_out() {
        let p = provider().await;
        assert_eq!(p.refresh("r-1").await.unwrap().refresh_token, "r-1");
        assert!(p.refresh("stale").await.is_err());
        p.sign_out("a-1").await.unwrap();
    }
}
