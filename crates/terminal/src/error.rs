//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::ApiError;
use crate::bridge::BridgeError;

/// Application-level error type for the terminal UI.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend API call failed.
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    /// The bridge host is gone.
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// Template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// No staff member is signed in.
    #[error("Unauthorized")]
    Unauthorized,

    /// The request conflicts with current state.
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Api(_) | Self::Bridge(_) | Self::Template(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Api(ApiError::Rejected(_)) => StatusCode::FORBIDDEN,
            Self::Api(_) => StatusCode::BAD_GATEWAY,
            Self::Bridge(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Conflict(_) => StatusCode::CONFLICT,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Api(ApiError::Rejected(reason)) => reason
                .clone()
                .unwrap_or_else(|| "Request rejected".to_string()),
            Self::Api(_) => "Failed to connect to server".to_string(),
            Self::Bridge(_) => "Terminal host unavailable".to_string(),
            Self::Template(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product p1".to_string());
        assert_eq!(err.to_string(), "Not found: product p1");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(status(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status(AppError::Conflict("unavailable".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status(AppError::Api(ApiError::Rejected(None))),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status(AppError::Api(ApiError::InvalidToken)),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status(AppError::Bridge(BridgeError::HostUnavailable)),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
