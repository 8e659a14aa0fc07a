//! Provider session and auth-state change events.

use chrono::{DateTime, TimeDelta, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Identity the provider attaches to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// An authenticated provider session.
///
/// Implements `Debug` manually to redact the tokens.
#[derive(Clone)]
pub struct Session {
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
    pub expires_at: Option<DateTime<Utc>>,
    pub user: SessionUser,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

impl Session {
    /// Session holding just an access token.
    #[must_use]
    pub fn new(access_token: impl Into<String>, user: SessionUser) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            refresh_token: None,
            expires_at: None,
            user,
        }
    }

    /// Whether the access token expires within `margin` of `now`.
    #[must_use]
    pub fn expires_within(&self, now: DateTime<Utc>, margin: TimeDelta) -> bool {
        self.expires_at.is_some_and(|at| at - margin <= now)
    }
}

/// Kinds of auth-state change the provider broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

/// One auth-state change: what happened and the session after it.
#[derive(Debug, Clone)]
pub struct AuthStateChange {
    pub event: AuthEvent,
    pub session: Option<Session>,
}

/// On-disk form of a session.
#[derive(Serialize, Deserialize)]
pub(crate) struct StoredSession {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
    user: SessionUser,
}

impl From<&Session> for StoredSession {
    fn from(session: &Session) -> Self {
        Self {
            access_token: session.access_token.expose_secret().to_string(),
            refresh_token: session
                .refresh_token
                .as_ref()
                .map(|t| t.expose_secret().to_string()),
            expires_at: session.expires_at,
            user: session.user.clone(),
        }
    }
}

impl From<StoredSession> for Session {
    fn from(stored: StoredSession) -> Self {
        Self {
            access_token: SecretString::from(stored.access_token),
            refresh_token: stored.refresh_token.map(SecretString::from),
            expires_at: stored.expires_at,
            user: stored.user,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user() -> SessionUser {
        SessionUser {
            id: "u1".to_string(),
            email: Some("sam@kebab.shop".to_string()),
        }
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let mut session = Session::new("access-secret", user());
        session.refresh_token = Some(SecretString::from("refresh-secret"));
        let debug_output = format!("{session:?}");
        assert!(!debug_output.contains("access-secret"));
        assert!(!debug_output.contains("refresh-secret"));
        assert!(debug_output.contains("sam@kebab.shop"));
    }

    #[test]
    fn test_expires_within() {
        let now = Utc::now();
        let mut session = Session::new("t", user());
        assert!(!session.expires_within(now, TimeDelta::seconds(60)));

        session.expires_at = Some(now + TimeDelta::seconds(30));
        assert!(session.expires_within(now, TimeDelta::seconds(60)));
        assert!(!session.expires_within(now, TimeDelta::seconds(10)));
    }

    #[test]
    fn test_stored_session_restores_tokens() {
        let mut session = Session::new("access", user());
        session.refresh_token = Some(SecretString::from("refresh"));
        let json = serde_json::to_string(&StoredSession::from(&session)).unwrap();

        let restored: Session = serde_json::from_str::<StoredSession>(&json).unwrap().into();
        assert_eq!(restored.access_token.expose_secret(), "access");
        assert_eq!(
            restored.refresh_token.unwrap().expose_secret(),
            "refresh"
        );
        assert_eq!(restored.user, user());
    }
}
