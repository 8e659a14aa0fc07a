//! Input rules checked on the till before a round trip.
//!
//! The backend and the session provider validate everything again; these
//! checks only stop obviously bad input from leaving the terminal.

use thiserror::Error;

use crate::types::{Email, EmailError};

/// A rule an input broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),
}

/// Credentials typed on the login screen.
#[derive(Debug, Clone)]
pub struct LoginInput<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

impl LoginInput<'_> {
    /// Validate and return the parsed email.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for a malformed email or empty password.
    pub fn validate(&self) -> Result<Email, ValidationError> {
        let email = Email::parse(self.email)?;
        if self.password.is_empty() {
            return Err(ValidationError::Required { field: "Password" });
        }
        Ok(email)
    }
}
