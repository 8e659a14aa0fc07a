//! Auth session gate.
//!
//! The till is only usable by an authenticated member of staff. The gate
//! gets a session from the provider, asks the backend who holds it, and
//! keeps `user`/`session`/`is_loading` in step with provider events.
//!
//! Two validation paths exist and they treat rejection differently:
//!
//! - **login**: a rejected identity check forces a provider sign-out, clears
//!   the session and reports an error string.
//! - **passive** (mount and provider events): a rejected check only leaves
//!   the user unset; the provider session is left alone.
//!
//! Neither path retries, and no failure propagates: everything is folded
//! into a [`LoginOutcome`] or a log line.

mod error;
mod provider;
mod session;

pub use error::{ACCESS_DENIED, AuthError, STAFF_REQUIRED};
pub use provider::{GoTrueClient, SessionProvider};
pub use session::{AuthEvent, AuthStateChange, Session, SessionUser};

use std::sync::Arc;

use kebab_pos_core::StaffUser;
use kebab_pos_core::validation::LoginInput;
use reqwest::header::HeaderMap;
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::api::{BackendClient, bearer_headers};
use crate::error::{clear_sentry_user, set_sentry_user};

/// Result of a login attempt, as shown on the login screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LoginOutcome {
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug)]
struct GateState {
    user: Option<StaffUser>,
    session: Option<Session>,
    is_loading: bool,
}

/// Session gate shared by every handler.
///
/// Cheap to clone; all clones see the same state.
pub struct SessionGate<P> {
    inner: Arc<SessionGateInner<P>>,
}

struct SessionGateInner<P> {
    provider: P,
    backend: BackendClient,
    state: RwLock<GateState>,
}

impl<P> Clone for SessionGate<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Keeps the auth-state listener alive; dropping it unsubscribes.
#[derive(Debug)]
pub struct MountHandle {
    listener: JoinHandle<()>,
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

impl<P: SessionProvider> SessionGate<P> {
    /// Create an unmounted gate; it reports loading until [`Self::mount`]
    /// has finished its first validation.
    #[must_use]
    pub fn new(provider: P, backend: BackendClient) -> Self {
        Self {
            inner: Arc::new(SessionGateInner {
                provider,
                backend,
                state: RwLock::new(GateState {
                    user: None,
                    session: None,
                    is_loading: true,
                }),
            }),
        }
    }

    /// Subscribe to provider events, then establish the initial session.
    ///
    /// Returns once the first validation has completed, whatever its
    /// outcome. The returned handle keeps the listener running.
    pub async fn mount(&self) -> MountHandle {
        let mut changes = self.inner.provider.subscribe();
        let gate = self.clone();
        let listener = tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(change) => gate.on_auth_state_change(change).await,
                    Err(RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "Auth state listener fell behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        let session = match self.inner.provider.get_session().await {
            Ok(session) => usable(session),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read provider session");
                None
            }
        };
        self.inner.state.write().await.session.clone_from(&session);
        if let Some(session) = session {
            self.validate_passively(&session).await;
        }
        self.inner.state.write().await.is_loading = false;
        tracing::debug!("Session gate mounted");

        MountHandle { listener }
    }

    async fn on_auth_state_change(&self, change: AuthStateChange) {
        tracing::debug!(event = ?change.event, "Auth state changed");
        let session = usable(change.session);
        self.inner.state.write().await.session.clone_from(&session);
        match session {
            Some(session) => self.validate_passively(&session).await,
            None => self.inner.state.write().await.user = None,
        }
    }

    async fn validate_passively(&self, session: &Session) {
        match self.fetch_user(session).await {
            Ok(user) => self.inner.state.write().await.user = Some(user),
            Err(e) => {
                tracing::info!(error = %e, "Session is not an authorized staff session");
                self.inner.state.write().await.user = None;
            }
        }
    }

    /// One identity check against the backend.
    async fn fetch_user(&self, session: &Session) -> Result<StaffUser, AuthError> {
        let envelope = self
            .inner
            .backend
            .fetch_me(&session.access_token)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Failed to fetch user info");
                AuthError::Transport(e)
            })?;
        envelope.into_result().map_err(AuthError::Denied)
    }

    /// Sign in with email and password, then require a staff identity.
    pub async fn login(&self, email: &str, password: &str) -> LoginOutcome {
        let input = LoginInput { email, password };
        if let Err(e) = input.validate() {
            return LoginOutcome::failed(e.to_string());
        }

        let session = match self
            .inner
            .provider
            .sign_in_with_password(email.trim(), password)
            .await
        {
            Ok(Some(session)) => session,
            Ok(None) => return LoginOutcome::failed(AuthError::NoSession.to_string()),
            Err(e) => return LoginOutcome::failed(e.to_string()),
        };
        self.inner.state.write().await.session = Some(session.clone());

        match self.fetch_user(&session).await {
            Ok(user) => {
                set_sentry_user(&user.id, Some(&user.email));
                tracing::info!(user_id = %user.id, role = %user.role, "Staff signed in");
                self.inner.state.write().await.user = Some(user);
                LoginOutcome::ok()
            }
            Err(err) => {
                tracing::info!(error = %err, "Signing out rejected session");
                if let Err(e) = self.inner.provider.sign_out().await {
                    tracing::warn!(error = %e, "Provider sign-out failed");
                }
                let mut state = self.inner.state.write().await;
                state.session = None;
                state.user = None;
                LoginOutcome::failed(err.login_message())
            }
        }
    }

    /// Sign out. Always clears local state; provider failures are logged.
    pub async fn logout(&self) {
        if let Err(e) = self.inner.provider.sign_out().await {
            tracing::warn!(error = %e, "Provider sign-out failed");
        }
        let mut state = self.inner.state.write().await;
        state.session = None;
        state.user = None;
        drop(state);
        clear_sentry_user();
        tracing::info!("Staff signed out");
    }

    /// The validated staff identity, if any.
    pub async fn user(&self) -> Option<StaffUser> {
        self.inner.state.read().await.user.clone()
    }

    /// The current provider session, if any.
    pub async fn session(&self) -> Option<Session> {
        self.inner.state.read().await.session.clone()
    }

    /// True until the first validation after mount has completed.
    pub async fn is_loading(&self) -> bool {
        self.inner.state.read().await.is_loading
    }

    /// `Authorization: Bearer <token>` when a session exists, otherwise empty.
    pub async fn auth_headers(&self) -> HeaderMap {
        self.inner
            .state
            .read()
            .await
            .session
            .as_ref()
            .and_then(|s| {
                bearer_headers(&s.access_token)
                    .inspect_err(|e| tracing::warn!(error = %e, "Session token not sendable"))
                    .ok()
            })
            .unwrap_or_default()
    }
}

/// Drop a session whose token cannot be sent as a bearer header, so that
/// holding a session always means [`SessionGate::auth_headers`] is non-empty.
fn usable(session: Option<Session>) -> Option<Session> {
    session.filter(|s| {
        let sendable = bearer_headers(&s.access_token).is_ok();
        if !sendable {
            tracing::warn!(user_id = %s.user.id, "Discarding session with unusable access token");
        }
        sendable
    })
}
