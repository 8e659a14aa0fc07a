//! Backend REST client.
//!
//! Every backend route answers with the `{ success, data?, error? }`
//! envelope, on success and on failure alike, so the body is parsed even
//! for non-2xx statuses.

use std::sync::Arc;
use std::time::Duration;

use kebab_pos_core::{ApiResponse, StaffUser};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Identity endpoint that maps a bearer token to a staff account.
pub const ME_PATH: &str = "/api/auth/me";

/// Errors from talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The body was not the expected JSON envelope.
    #[error("Invalid response from {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The envelope reported a failure.
    #[error("{}", .0.as_deref().unwrap_or("Request rejected"))]
    Rejected(Option<String>),

    /// The access token cannot be sent as a header.
    #[error("Invalid access token")]
    InvalidToken,
}

/// Client for the Kebab POS backend API.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// `GET` a route and return its envelope without judging it.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or when the body is not an envelope.
    pub async fn envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        headers: HeaderMap,
    ) -> Result<ApiResponse<T>, ApiError> {
        let url = format!("{}{path}", self.inner.base_url);
        let response = self.inner.client.get(&url).headers(headers).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::debug!(%status, path, "Backend returned non-success status");
        }

        serde_json::from_str(&body).map_err(|source| {
            tracing::warn!(
                %status,
                path,
                body = %body.chars().take(200).collect::<String>(),
                "Backend response is not a JSON envelope"
            );
            ApiError::Parse {
                path: path.to_string(),
                source,
            }
        })
    }

    /// `GET` a route and unwrap its payload.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when the envelope reports failure.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        headers: HeaderMap,
    ) -> Result<T, ApiError> {
        self.envelope(path, headers)
            .await?
            .into_result()
            .map_err(ApiError::Rejected)
    }

    /// Ask the backend who holds `access_token`.
    ///
    /// Exactly one request per call; the envelope is returned as-is so the
    /// caller decides what a rejection means.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or an unparseable body.
    pub async fn fetch_me(
        &self,
        access_token: &SecretString,
    ) -> Result<ApiResponse<StaffUser>, ApiError> {
        self.envelope(ME_PATH, bearer_headers(access_token)?).await
    }
}

/// Header map carrying `Authorization: Bearer <token>`.
///
/// # Errors
///
/// Returns [`ApiError::InvalidToken`] if the token has bytes not allowed in
/// a header.
pub fn bearer_headers(access_token: &SecretString) -> Result<HeaderMap, ApiError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", access_token.expose_secret()))
        .map_err(|_| ApiError::InvalidToken)?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}
