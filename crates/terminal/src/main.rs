//! Kebab POS terminal - the till's host shell.
//!
//! This binary serves the till UI to the embedded browser on localhost
//! (port 3004 by default).
//!
//! # Architecture
//!
//! - Axum web framework with Askama templates for the UI
//! - Native bridge task owning settings, window state and the printer
//! - Session gate backed by a GoTrue session provider and the backend's
//!   identity endpoint
//! - Backend REST API for the catalog, cached with moka
//!
//! # Security
//!
//! The UI can only reach the host through the five `/bridge` routes. The
//! server binds to localhost unless `POS_HOST` says otherwise.

#![cfg_attr(not(test), forbid(unsafe_code))]

use kebab_pos_core::TerminalSettings;
use kebab_pos_terminal::api::BackendClient;
use kebab_pos_terminal::auth::{GoTrueClient, SessionGate};
use kebab_pos_terminal::bridge::{Bridge, DesktopHost};
use kebab_pos_terminal::catalog::CatalogClient;
use kebab_pos_terminal::config::TerminalConfig;
use kebab_pos_terminal::printer::ReceiptPrinter;
use kebab_pos_terminal::settings::SettingsStore;
use kebab_pos_terminal::shell::ShellInit;
use kebab_pos_terminal::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &TerminalConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = TerminalConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kebab_pos_terminal=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let shell = ShellInit::new(true).initialize();

    // Host side: settings file and printer, owned by the bridge task
    let defaults = TerminalSettings {
        api_url: config.default_api_url.clone(),
        ..TerminalSettings::default()
    };
    let store = SettingsStore::load(&config.settings_path, defaults)
        .await
        .expect("Failed to load settings");
    // The backend URL is read once; changing it takes effect after restart.
    let api_url = store.get().api_url.clone();
    let host = DesktopHost::new(store, ReceiptPrinter::new(config.receipt.clone()));
    let (bridge, _host_task) = Bridge::spawn(host);
    tracing::info!(api_url = %api_url, "Bridge host started");

    let backend =
        BackendClient::new(&api_url, config.http_timeout).expect("Failed to create backend client");
    let provider = GoTrueClient::new(
        &config.supabase,
        config.http_timeout,
        config.session_path.clone(),
    )
    .expect("Failed to create session provider");
    provider.restore().await;
    let _refresh_task = provider.spawn_auto_refresh();

    // Mount in the background; the UI shows a loading screen meanwhile
    let gate = SessionGate::new(provider, backend.clone());
    let mounting = gate.clone();
    tokio::spawn(async move {
        let _mounted = mounting.mount().await;
        std::future::pending::<()>().await;
    });

    let state = AppState::new(
        config.clone(),
        gate,
        bridge,
        CatalogClient::new(backend),
        shell,
    );

    let app = kebab_pos_terminal::app(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    tracing::info!("terminal listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
