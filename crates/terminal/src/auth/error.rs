use thiserror::Error;

use crate::api::ApiError;

/// Message used when the backend rejects a token without saying why.
pub const ACCESS_DENIED: &str = "Access denied";

/// Message the login screen shows for a rejection without a backend reason.
pub const STAFF_REQUIRED: &str = "Access denied. Staff account required.";

/// Why a session could not be established or validated.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token is valid but the holder is not active staff.
    #[error("{}", .0.as_deref().unwrap_or(ACCESS_DENIED))]
    Denied(Option<String>),

    /// The backend could not be reached or answered garbage.
    #[error("Failed to connect to server")]
    Transport(#[source] ApiError),

    /// The session provider refused or failed; its message is shown as-is.
    #[error("{0}")]
    Provider(String),

    /// Sign-in succeeded without producing a session.
    #[error("Login failed")]
    NoSession,
}

impl AuthError {
    /// Text the login path reports for this failure.
    #[must_use]
    pub fn login_message(&self) -> String {
        match self {
            Self::Denied(None) => STAFF_REQUIRED.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        Self::Provider(err.to_string())
    }
}
