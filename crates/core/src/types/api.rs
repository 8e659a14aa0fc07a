//! Backend response envelope.

use serde::{Deserialize, Serialize};

/// The `{ success, data?, error?, message? }` envelope every backend route
/// answers with, on success and on failure alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful envelope carrying `data`.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    /// Failed envelope carrying an error message.
    #[must_use]
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
        }
    }

    /// Collapse the envelope into its payload or its error message.
    ///
    /// A successful envelope without `data` and a failed envelope without an
    /// `error` both come back as `Err(None)`, leaving the caller to choose the
    /// fallback wording.
    ///
    /// # Errors
    ///
    /// Returns the backend's error message when `success` is false or the
    /// payload is missing.
    pub fn into_result(self) -> Result<T, Option<String>> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(self.error.filter(|e| !e.is_empty())),
        }
    }
}
