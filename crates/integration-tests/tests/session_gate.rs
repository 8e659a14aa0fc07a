//! Session gate against a GoTrue-shaped provider and the backend identity
//! endpoint.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use kebab_pos_core::StaffRole;
use kebab_pos_integration_tests::{
    COOK_EMAIL, NOT_STAFF, PASSWORD, STAFF_EMAIL, eventually, fake_cloud, serve, staff_gate,
};
use kebab_pos_terminal::api::BackendClient;
use kebab_pos_terminal::auth::{GoTrueClient, SessionGate};
use kebab_pos_terminal::config::SupabaseConfig;
use reqwest::header::AUTHORIZATION;
use secrecy::SecretString;

#[tokio::test]
async fn test_mount_without_session() {
    let cloud = serve(fake_cloud()).await;
    let gate = staff_gate(&cloud);
    assert!(gate.is_loading().await);

    let _mount = gate.mount().await;
    assert!(!gate.is_loading().await);
    assert!(gate.user().await.is_none());
    assert!(gate.auth_headers().await.is_empty());
}

#[tokio::test]
async fn test_login_sets_user_and_session() {
    let cloud = serve(fake_cloud()).await;
    let gate = staff_gate(&cloud);
    let _mount = gate.mount().await;

    let outcome = gate.login(STAFF_EMAIL, PASSWORD).await;
    assert!(outcome.success, "{outcome:?}");
    assert_eq!(outcome.error, None);

    let user = gate.user().await.unwrap();
    assert_eq!(user.email, STAFF_EMAIL);
    assert_eq!(user.role, StaffRole::Staff);
    assert!(gate.session().await.is_some());
    assert!(!gate.is_loading().await);
    assert_eq!(
        gate.auth_headers().await.get(AUTHORIZATION).unwrap(),
        "Bearer access-staff"
    );
}

#[tokio::test]
async fn test_non_staff_login_clears_session() {
    let cloud = serve(fake_cloud()).await;
    let gate = staff_gate(&cloud);
    let _mount = gate.mount().await;

    let outcome = gate.login(COOK_EMAIL, PASSWORD).await;
    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some(NOT_STAFF));

    assert!(gate.user().await.is_none());
    assert!(eventually(|| async { gate.session().await.is_none() }).await);
    assert!(gate.auth_headers().await.is_empty());
}

#[tokio::test]
async fn test_invalid_input_never_reaches_provider() {
    let cloud = serve(fake_cloud()).await;
    let gate = staff_gate(&cloud);
    let _mount = gate.mount().await;

    let outcome = gate.login("not-an-email", PASSWORD).await;
    assert!(!outcome.success);
    assert!(outcome.error.is_some_and(|e| !e.is_empty()));
    assert!(gate.session().await.is_none());
}

#[tokio::test]
async fn test_unreachable_backend() {
    // Provider answers, backend does not.
    let cloud = serve(fake_cloud()).await;
    let supabase = SupabaseConfig {
        url: cloud,
        anon_key: SecretString::from("test-anon-key"),
    };
    let timeout = Duration::from_secs(2);
    let provider = GoTrueClient::new(&supabase, timeout, None).unwrap();
    let backend = BackendClient::new("http://127.0.0.1:9", timeout).unwrap();
    let gate = SessionGate::new(provider, backend);
    let _mount = gate.mount().await;

    let outcome = gate.login(STAFF_EMAIL, PASSWORD).await;
    assert_eq!(outcome.error.as_deref(), Some("Failed to connect to server"));
    assert!(eventually(|| async { gate.session().await.is_none() }).await);
}

#[tokio::test]
async fn test_logout_always_clears() {
    let cloud = serve(fake_cloud()).await;
    let gate = staff_gate(&cloud);
    let _mount = gate.mount().await;
    assert!(gate.login(STAFF_EMAIL, PASSWORD).await.success);

    gate.logout().await;
    assert!(
        eventually(|| async { gate.user().await.is_none() && gate.session().await.is_none() })
            .await
    );
    assert!(gate.auth_headers().await.is_empty());
}
