use std::fmt;
use std::io;

use crate::api::SyncReport;
use crate::models::Id;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AdminError>;

/// A single failed form check, keyed by the field it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Error type for every fallible operation in the crate.
#[derive(Debug)]
pub enum AdminError {
    /// An index did not point into the current list.
    OutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
    /// Required fields are empty or malformed; nothing was sent.
    Validation(Vec<FieldError>),
    /// Transport-level failure talking to the backend or identity service.
    Http(reqwest::Error),
    /// The backend answered with a non-success status.
    Api { status: u16, message: String },
    /// The identity service rejected a sign-in, refresh or sign-out.
    Auth(String),
    /// No session, or the backend no longer accepts the current token.
    NotAuthenticated,
    /// Submit was called on a form that is already closed.
    FormClosed,
    /// Missing or unreadable configuration.
    Config(String),
    Io(io::Error),
    Json(serde_json::Error),
    /// The level was saved as `level_id` but some exercise changes were not
    /// applied.
    Sync { level_id: Id, report: SyncReport },
}

impl AdminError {
    /// Text suitable for showing to the person using the admin screens.
    pub fn user_message(&self) -> String {
        match self {
            AdminError::Validation(errors) => errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            AdminError::Api { status, message } if message.is_empty() => {
                format!("Request failed with status {}", status)
            }
            AdminError::Api { message, .. } => message.clone(),
            AdminError::Auth(message) => message.clone(),
            AdminError::NotAuthenticated => {
                "Your session has expired. Please sign in again.".to_string()
            }
            AdminError::Http(_) => "Could not reach the server. Please try again.".to_string(),
            AdminError::Sync { report, .. } => report.summary(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminError::OutOfRange { what, index, len } => {
                write!(f, "{} index {} out of range (len {})", what, index, len)
            }
            AdminError::Validation(errors) => {
                write!(f, "validation failed: ")?;
                for (i, e) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", e)?;
                }
                Ok(())
            }
            AdminError::Http(e) => write!(f, "HTTP error: {}", e),
            AdminError::Api { status, message } => write!(f, "API error {}: {}", status, message),
            AdminError::Auth(message) => write!(f, "authentication failed: {}", message),
            AdminError::NotAuthenticated => write!(f, "not signed in"),
            AdminError::FormClosed => write!(f, "form is closed"),
            AdminError::Config(message) => write!(f, "configuration error: {}", message),
            AdminError::Io(e) => write!(f, "IO error: {}", e),
            AdminError::Json(e) => write!(f, "JSON error: {}", e),
            AdminError::Sync { level_id, report } => write!(
                f,
                "exercise sync for level {} incomplete: {}",
                level_id,
                report.summary()
            ),
        }
    }
}

impl std::error::Error for AdminError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AdminError::Http(e) => Some(e),
            AdminError::Io(e) => Some(e),
            AdminError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AdminError {
    fn from(err: reqwest::Error) -> Self {
        AdminError::Http(err)
    }
}

impl From<io::Error> for AdminError {
    fn from(err: io::Error) -> Self {
        AdminError::Io(err)
    }
}

impl From<serde_json::Error> for AdminError {
    fn from(err: serde_json::Error) -> Self {
        AdminError::Json(err)
    }
}

impl From<toml::de::Error> for AdminError {
    fn from(err: toml::de::Error) -> Self {
        AdminError::Config(err.to_string())
    }
}
