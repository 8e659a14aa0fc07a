//! Kebab POS terminal library.
//!
//! The host shell of the till: settings, printing and window state behind
//! the native bridge, the staff session gate, and the catalog UI served to
//! the embedded browser. Exposed as a library so it can be tested and wired
//! up from the binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod bridge;
pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod printer;
pub mod routes;
pub mod settings;
pub mod shell;
pub mod state;

use axum::{Router, http::HeaderName, middleware as axum_middleware, routing::get};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Build the UI router with its middleware stack.
///
/// Sentry layers are left to the binary so tests run without a client.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(axum_middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}
