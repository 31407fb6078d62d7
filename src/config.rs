//! Loading client configuration from TOML, with environment overrides.
//!
//! Lookup order for the file: `--config`, then `CATALOG_ADMIN_CONFIG`, then
//! `catalog-admin.toml` in the working directory. A missing default file
//! means "use defaults"; a missing explicit file is an error.
//!
//! Environment overrides:
//!   CATALOG_API_BASE_URL : REST backend base URL
//!   CATALOG_AUTH_URL     : identity service URL
//!   CATALOG_AUTH_KEY     : identity service publishable key
//!   CATALOG_SESSION_PATH : where the signed-in session is kept

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::error::{AdminError, Result};

const DEFAULT_CONFIG_FILE: &str = "catalog-admin.toml";
const DEFAULT_API_BASE_URL: &str = "https://backend-arabicaraa.up.railway.app/api/v1";

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub api_base_url: String,
    pub auth_url: String,
    pub auth_publishable_key: String,
    pub session_path: PathBuf,
    pub request_timeout_secs: u64,
    pub log_file: PathBuf,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            auth_url: String::new(),
            auth_publishable_key: String::new(),
            session_path: default_session_path(),
            request_timeout_secs: 20,
            log_file: PathBuf::from("catalog-admin.log"),
        }
    }
}

fn default_session_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".catalog-admin").join("session.json"),
        None => PathBuf::from(".catalog-admin").join("session.json"),
    }
}

impl AdminConfig {
    /// Load from `explicit` (or the default locations) and apply env overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os("CATALOG_ADMIN_CONFIG").map(PathBuf::from);
        let (path, required) = match (explicit, from_env) {
            (Some(p), _) => (p.to_path_buf(), true),
            (None, Some(p)) => (p, true),
            (None, None) => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let mut config = if path.exists() {
            let text = std::fs::read_to_string(&path)?;
            let config = Self::from_toml(&text)?;
            info!(target: "config", path = %path.display(), "Loaded configuration");
            config
        } else if required {
            return Err(AdminError::Config(format!(
                "config file {} not found",
                path.display()
            )));
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Apply overrides from a variable lookup (the process env in production).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("CATALOG_API_BASE_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = lookup("CATALOG_AUTH_URL") {
            self.auth_url = v;
        }
        if let Some(v) = lookup("CATALOG_AUTH_KEY") {
            self.auth_publishable_key = v;
        }
        if let Some(v) = lookup("CATALOG_SESSION_PATH") {
            self.session_path = PathBuf::from(v);
        }
    }

    /// The identity service cannot be reached without both URL and key.
    pub fn validate(&self) -> Result<()> {
        if self.auth_url.trim().is_empty() || self.auth_publishable_key.trim().is_empty() {
            return Err(AdminError::Config(
                "identity service URL and publishable key must be set".into(),
            ));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(AdminError::Config("api_base_url must not be empty".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
