//! Session provider seam and its Supabase GoTrue implementation.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::{RwLock, broadcast};
use tokio::task::JoinHandle;

use super::error::AuthError;
use super::session::{AuthEvent, AuthStateChange, Session, SessionUser, StoredSession};
use crate::config::SupabaseConfig;

/// Refresh this many seconds before the access token expires.
const REFRESH_MARGIN_SECS: i64 = 60;
/// How often the refresher wakes up when there is nothing to refresh.
const IDLE_REFRESH_CHECK: Duration = Duration::from_secs(30);
const EVENT_CAPACITY: usize = 16;

/// Where sessions come from.
///
/// The gate only needs these four calls; anything that can answer them can
/// stand in for the hosted auth service.
pub trait SessionProvider: Send + Sync + 'static {
    /// Current session, if any.
    fn get_session(&self) -> impl Future<Output = Result<Option<Session>, AuthError>> + Send;

    /// Exchange credentials for a session.
    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Option<Session>, AuthError>> + Send;

    /// End the current session. The local session is gone even on error.
    fn sign_out(&self) -> impl Future<Output = Result<(), AuthError>> + Send;

    /// Stream of auth-state changes from now on.
    fn subscribe(&self) -> broadcast::Receiver<AuthStateChange>;
}

/// Token grant response from `/auth/v1/token`.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: SessionUser,
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .or_else(|| self.expires_in.map(|secs| now + TimeDelta::seconds(secs)));
        Session {
            access_token: SecretString::from(self.access_token),
            refresh_token: self.refresh_token.map(SecretString::from),
            expires_at,
            user: self.user,
        }
    }
}

/// Error body; GoTrue has used all of these field names over time.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self, status: StatusCode) -> String {
        self.msg
            .or(self.message)
            .or(self.error_description)
            .or(self.error)
            .unwrap_or_else(|| format!("Authentication failed ({status})"))
    }
}

/// Client for a Supabase GoTrue auth server.
///
/// Keeps the current session in memory, optionally mirrored to a file so a
/// restarted till comes back signed in.
#[derive(Clone)]
pub struct GoTrueClient {
    inner: Arc<GoTrueClientInner>,
}

struct GoTrueClientInner {
    client: reqwest::Client,
    base_url: String,
    anon_key: SecretString,
    session: RwLock<Option<Session>>,
    events: broadcast::Sender<AuthStateChange>,
    store_path: Option<PathBuf>,
}

impl GoTrueClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(
        config: &SupabaseConfig,
        timeout: Duration,
        store_path: Option<PathBuf>,
    ) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            inner: Arc::new(GoTrueClientInner {
                client,
                base_url: config.url.trim_end_matches('/').to_string(),
                anon_key: config.anon_key.clone(),
                session: RwLock::new(None),
                events,
                store_path,
            }),
        })
    }

    /// Load the persisted session, refreshing it first if it has expired.
    pub async fn restore(&self) {
        let Some(path) = &self.inner.store_path else {
            return;
        };
        let stored = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return,
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "Failed to read stored session");
                return;
            }
        };
        let session: Session = match serde_json::from_str::<StoredSession>(&stored) {
            Ok(stored) => stored.into(),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable stored session");
                return;
            }
        };

        let expired = session.expires_within(Utc::now(), TimeDelta::zero());
        *self.inner.session.write().await = Some(session);
        if expired {
            tracing::info!("Stored session expired, refreshing");
            if let Err(e) = self.refresh().await {
                tracing::warn!(error = %e, "Stored session could not be refreshed");
            }
        } else {
            let session = self.inner.session.read().await.clone();
            self.emit(AuthEvent::InitialSession, session);
        }
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// A refresh the server rejects ends the session.
    ///
    /// # Errors
    ///
    /// Returns error if there is no refresh token or the exchange failed.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        let refresh_token = self
            .inner
            .session
            .read()
            .await
            .as_ref()
            .and_then(|s| s.refresh_token.clone())
            .ok_or(AuthError::NoSession)?;

        match self
            .grant(
                "refresh_token",
                &json!({ "refresh_token": refresh_token.expose_secret() }),
            )
            .await
        {
            Ok(session) => {
                self.store(Some(session.clone())).await;
                self.emit(AuthEvent::TokenRefreshed, Some(session));
                tracing::debug!("Access token refreshed");
                Ok(())
            }
            Err(GrantError::Rejected(message)) => {
                self.store(None).await;
                self.emit(AuthEvent::SignedOut, None);
                Err(AuthError::Provider(message))
            }
            Err(GrantError::Http(e)) => Err(e.into()),
        }
    }

    /// Keep the session fresh in the background until the handle is aborted.
    #[must_use]
    pub fn spawn_auto_refresh(&self) -> JoinHandle<()> {
        let client = self.clone();
        tokio::spawn(async move {
            loop {
                let due = client
                    .inner
                    .session
                    .read()
                    .await
                    .as_ref()
                    .filter(|s| s.refresh_token.is_some())
                    .and_then(|s| s.expires_at)
                    .map(|at| at - TimeDelta::seconds(REFRESH_MARGIN_SECS) - Utc::now());

                match due {
                    Some(wait) if wait > TimeDelta::zero() => {
                        let wait = wait.to_std().unwrap_or(IDLE_REFRESH_CHECK);
                        tokio::time::sleep(wait.min(IDLE_REFRESH_CHECK)).await;
                    }
                    Some(_) => {
                        if let Err(e) = client.refresh().await {
                            tracing::warn!(error = %e, "Automatic token refresh failed");
                            tokio::time::sleep(IDLE_REFRESH_CHECK).await;
                        }
                    }
                    None => tokio::time::sleep(IDLE_REFRESH_CHECK).await,
                }
            }
        })
    }

    async fn grant(
        &self,
        grant_type: &str,
        body: &serde_json::Value,
    ) -> Result<Session, GrantError> {
        let url = format!("{}/auth/v1/token?grant_type={grant_type}", self.inner.base_url);
        let response = self
            .inner
            .client
            .post(&url)
            .header("apikey", self.inner.anon_key.expose_secret())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: ErrorBody = response.json().await.unwrap_or_default();
            return Err(GrantError::Rejected(body.into_message(status)));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.into_session(Utc::now()))
    }

    async fn store(&self, session: Option<Session>) {
        self.inner.session.write().await.clone_from(&session);

        let Some(path) = &self.inner.store_path else {
            return;
        };
        let result = match &session {
            Some(session) => match serde_json::to_vec(&StoredSession::from(session)) {
                Ok(bytes) => tokio::fs::write(path, bytes).await,
                Err(e) => Err(std::io::Error::other(e)),
            },
            None => match tokio::fs::remove_file(path).await {
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                other => other,
            },
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, path = %path.display(), "Failed to persist session");
        }
    }

    fn emit(&self, event: AuthEvent, session: Option<Session>) {
        // No subscribers yet is fine.
        let _ = self.inner.events.send(AuthStateChange { event, session });
    }
}

enum GrantError {
    Http(reqwest::Error),
    Rejected(String),
}

impl From<reqwest::Error> for GrantError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err)
    }
}

impl SessionProvider for GoTrueClient {
    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        Ok(self.inner.session.read().await.clone())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Session>, AuthError> {
        let session = match self
            .grant("password", &json!({ "email": email, "password": password }))
            .await
        {
            Ok(session) => session,
            Err(GrantError::Rejected(message)) => return Err(AuthError::Provider(message)),
            Err(GrantError::Http(e)) => return Err(e.into()),
        };

        tracing::info!(user_id = %session.user.id, "Signed in with password");
        self.store(Some(session.clone())).await;
        self.emit(AuthEvent::SignedIn, Some(session.clone()));
        Ok(Some(session))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let token = self
            .inner
            .session
            .read()
            .await
            .as_ref()
            .map(|s| s.access_token.clone());

        let remote = match token {
            Some(token) => self
                .inner
                .client
                .post(format!("{}/auth/v1/logout", self.inner.base_url))
                .header("apikey", self.inner.anon_key.expose_secret())
                .bearer_auth(token.expose_secret())
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map(|_| ())
                .map_err(AuthError::from),
            None => Ok(()),
        };

        self.store(None).await;
        self.emit(AuthEvent::SignedOut, None);
        remote
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthStateChange> {
        self.inner.events.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Json, Router,
        extract::Query,
        http::{HeaderMap, StatusCode},
        routing::post,
    };
    use serde_json::Value;
    use std::collections::HashMap;

    use super::*;

    async fn token(
        Query(q): Query<HashMap<String, String>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        if headers.get("apikey").is_none() {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"message": "No API key found"})),
            );
        }
        let ok = match q.get("grant_type").map(String::as_str) {
            Some("password") => body["password"] == "hunter2",
            Some("refresh_token") => body["refresh_token"] == "refresh-1",
            _ => false,
        };
        if !ok {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_grant",
                    "error_description": "Invalid login credentials"
                })),
            );
        }
        (
            StatusCode::OK,
            Json(json!({
                "access_token": "access-1",
                "token_type": "bearer",
                "expires_in": 3600,
                "refresh_token": "refresh-1",
                "user": {"id": "u1", "email": "sam@kebab.shop", "aud": "authenticated"}
            })),
        )
    }

    async fn provider(store_path: Option<PathBuf>) -> GoTrueClient {
        let router = Router::new()
            .route("/auth/v1/token", post(token))
            .route("/auth/v1/logout", post(|| async { StatusCode::NO_CONTENT }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await });

        let config = SupabaseConfig {
            url: format!("http://{addr}"),
            anon_key: SecretString::from("anon"),
        };
        GoTrueClient::new(&config, Duration::from_secs(5), store_path).unwrap()
    }

    #[tokio::test]
    async fn test_sign_in_stores_session_and_emits() {
        let client = provider(None).await;
        let mut events = client.subscribe();

        let session = client
            .sign_in_with_password("sam@kebab.shop", "hunter2")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.access_token.expose_secret(), "access-1");
        assert!(session.expires_at.is_some());

        let change = events.recv().await.unwrap();
        assert_eq!(change.event, AuthEvent::SignedIn);
        assert!(client.get_session().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_rejected_credentials_pass_message_through() {
        let client = provider(None).await;
        let err = client
            .sign_in_with_password("sam@kebab.shop", "wrong")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials");
        assert!(client.get_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sign_out_clears_and_emits() {
        let client = provider(None).await;
        client
            .sign_in_with_password("sam@kebab.shop", "hunter2")
            .await
            .unwrap();
        let mut events = client.subscribe();

        client.sign_out().await.unwrap();
        let change = events.recv().await.unwrap();
        assert_eq!(change.event, AuthEvent::SignedOut);
        assert!(change.session.is_none());
        assert!(client.get_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_session_survives_restart_via_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let first = provider(Some(path.clone())).await;
        first
            .sign_in_with_password("sam@kebab.shop", "hunter2")
            .await
            .unwrap();
        assert!(path.exists());

        let second = provider(Some(path.clone())).await;
        second.restore().await;
        let restored = second.get_session().await.unwrap().unwrap();
        assert_eq!(restored.user.id, "u1");

        second.sign_out().await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_refresh_replaces_session() {
        let client = provider(None).await;
        client
            .sign_in_with_password("sam@kebab.shop", "hunter2")
            .await
            .unwrap();
        let mut events = client.subscribe();

        client.refresh().await.unwrap();
        assert_eq!(events.recv().await.unwrap().event, AuthEvent::TokenRefreshed);
    }
}
