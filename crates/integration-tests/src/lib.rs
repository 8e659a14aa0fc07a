//! Integration tests for Kebab POS.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process terminal tests (no external services)
//! cargo test -p kebab-pos-integration-tests
//!
//! # Migration tests against two scratch databases
//! SOURCE_DATABASE_URL=postgres://... DEST_DATABASE_URL=postgres://... \
//!     cargo test -p kebab-pos-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `terminal_ui` - The till UI end to end: login, catalog, bridge routes
//! - `session_gate` - Gate behaviour against a GoTrue-shaped provider
//! - `migration` - Product/modifier-group copy (requires `PostgreSQL`)
//!
//! The hosted auth service and the backend API are replaced by
//! [`fake_cloud`], an axum router answering both on one local port.

use std::future::Future;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::{get, post},
};
use kebab_pos_core::TerminalSettings;
use kebab_pos_terminal::api::BackendClient;
use kebab_pos_terminal::auth::{GoTrueClient, MountHandle, SessionGate};
use kebab_pos_terminal::bridge::{Bridge, DesktopHost};
use kebab_pos_terminal::catalog::CatalogClient;
use kebab_pos_terminal::config::{ReceiptBranding, SupabaseConfig, TerminalConfig};
use kebab_pos_terminal::printer::ReceiptPrinter;
use kebab_pos_terminal::settings::SettingsStore;
use kebab_pos_terminal::shell::ShellInit;
use kebab_pos_terminal::state::{AppState, StaffGate};
use secrecy::SecretString;
use serde_json::{Value, json};
use tempfile::TempDir;

/// Staff account the fake backend accepts.
pub const STAFF_EMAIL: &str = "sam@kebab.shop";
/// Account the provider signs in but the backend rejects.
pub const COOK_EMAIL: &str = "cook@kebab.shop";
pub const PASSWORD: &str = "hunter2";
/// Message the fake backend rejects non-staff tokens with.
pub const NOT_STAFF: &str = "User is not a staff member";

const TIMEOUT: Duration = Duration::from_secs(5);

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");
    tokio::spawn(async move { axum::serve(listener, router).await });
    format!("http://{addr}")
}

async fn token(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let (user_id, access_token) = match (body["email"].as_str(), body["password"].as_str()) {
        (Some(STAFF_EMAIL), Some(PASSWORD)) => ("u-staff", "access-staff"),
        (Some(COOK_EMAIL), Some(PASSWORD)) => ("u-cook", "access-cook"),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_grant",
                    "error_description": "Invalid login credentials"
                })),
            );
        }
    };
    (
        StatusCode::OK,
        Json(json!({
            "access_token": access_token,
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "refresh-1",
            "user": {"id": user_id, "email": body["email"]}
        })),
    )
}

async fn me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some("Bearer access-staff") => (
            StatusCode::OK,
            Json(json!({"success": true, "data": {
                "id": "staff-1",
                "email": STAFF_EMAIL,
                "name": "Sam",
                "role": "staff",
                "isActive": true
            }})),
        ),
        Some(_) => (
            StatusCode::FORBIDDEN,
            Json(json!({"success": false, "error": NOT_STAFF})),
        ),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "error": "No token provided"})),
        ),
    }
}

/// GoTrue and backend routes on one router.
///
/// Menu: `Wraps` (id `1`) holds `Lamb Wrap` and the sold-out `Baklava`
/// (`p3`); `Plates` (id `2`) holds `Mixed Plate`, sold by weight too.
pub fn fake_cloud() -> Router {
    Router::new()
        .route("/auth/v1/token", post(token))
        .route("/auth/v1/logout", post(|| async { StatusCode::NO_CONTENT }))
        .route("/api/auth/me", get(me))
        .route(
            "/api/categories",
            get(|| async {
                Json(json!({"success": true, "data": [
                    {"id": "1", "name": "Wraps", "sortOrder": 1},
                    {"id": "2", "name": "Plates", "sortOrder": 2}
                ]}))
            }),
        )
        .route(
            "/api/products",
            get(|| async {
                Json(json!({"success": true, "data": [
                    {"id": "p1", "name": "Lamb Wrap", "price": 14.5, "categoryId": "1"},
                    {"id": "p2", "name": "Mixed Plate", "price": 22, "pricePerKg": 45,
                     "categoryId": "2"},
                    {"id": "p3", "name": "Baklava", "price": 4, "isAvailable": false,
                     "categoryId": "1"}
                ]}))
            }),
        )
        .route(
            "/api/settings",
            get(|| async { Json(json!({"success": true, "data": {"currencySymbol": "$"}})) }),
        )
}

/// A gate wired to a GoTrue client, both pointed at `cloud`.
///
/// # Panics
///
/// Panics if a client cannot be built.
#[must_use]
pub fn staff_gate(cloud: &str) -> StaffGate {
    let supabase = SupabaseConfig {
        url: cloud.to_string(),
        anon_key: SecretString::from("test-anon-key"),
    };
    let provider = GoTrueClient::new(&supabase, TIMEOUT, None).expect("Failed to build provider");
    let backend = BackendClient::new(cloud, TIMEOUT).expect("Failed to build backend client");
    SessionGate::new(provider, backend)
}

/// A running terminal UI backed by [`fake_cloud`].
pub struct TestTerminal {
    pub base_url: String,
    pub client: reqwest::Client,
    pub gate: StaffGate,
    _mount: MountHandle,
    _settings_dir: TempDir,
}

impl TestTerminal {
    /// Start the terminal with the given host settings.
    ///
    /// # Panics
    ///
    /// Panics if any part of the terminal fails to start.
    pub async fn start(settings: TerminalSettings) -> Self {
        let cloud = serve(fake_cloud()).await;
        let gate = staff_gate(&cloud);
        let mount = gate.mount().await;

        let settings_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let settings_path = settings_dir.path().join("settings.json");
        let store = SettingsStore::load(&settings_path, settings)
            .await
            .expect("Failed to load settings");
        let (bridge, _host) = Bridge::spawn(DesktopHost::new(
            store,
            ReceiptPrinter::new(ReceiptBranding::default()),
        ));

        let config = TerminalConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            default_api_url: cloud.clone(),
            settings_path,
            session_path: None,
            http_timeout: TIMEOUT,
            supabase: SupabaseConfig {
                url: cloud.clone(),
                anon_key: SecretString::from("test-anon-key"),
            },
            receipt: ReceiptBranding::default(),
            sentry_dsn: None,
            sentry_environment: None,
        };
        let backend = BackendClient::new(&cloud, TIMEOUT).expect("Failed to build backend client");
        let state = AppState::new(
            config,
            gate.clone(),
            bridge,
            CatalogClient::new(backend),
            ShellInit::new(false).initialize(),
        );

        let base_url = serve(kebab_pos_terminal::app(state)).await;
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            client,
            gate,
            _mount: mount,
            _settings_dir: settings_dir,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Submit the login form.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/auth/login"))
            .form(&[("email", email), ("password", password)])
            .send()
            .await
            .expect("Failed to submit login form")
    }

    /// Fetch a page and return its body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn page(&self, path: &str) -> String {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to fetch page")
            .text()
            .await
            .expect("Failed to read page")
    }
}

/// Poll `check` until it holds or two seconds pass.
///
/// Provider events reach the gate on a background task, so state they
/// change settles shortly after the call that caused them returns.
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..100 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}
