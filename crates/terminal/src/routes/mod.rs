//! HTTP route handlers for the till UI.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Loading, login or POS screen
//! GET  /health                        - Health check
//!
//! # Auth
//! POST /auth/login                    - Sign in (form)
//! POST /auth/logout                   - Sign out
//!
//! # Catalog (requires staff session)
//! GET  /catalog                       - Categories, products and currency (JSON)
//! POST /catalog/products/{id}/select  - Select a product card
//! POST /catalog/refresh               - Drop cached catalog data
//!
//! # Native bridge (the only way to reach the host)
//! GET  /bridge/settings               - Current settings
//! PUT  /bridge/settings               - Partial settings update
//! POST /bridge/fullscreen             - Toggle fullscreen
//! GET  /bridge/app-info               - Version, platform, arch
//! POST /bridge/print                  - Print a receipt
//! ```

pub mod auth;
pub mod bridge;
pub mod catalog;
pub mod pos;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .route("/products/{id}/select", post(catalog::select_product))
        .route("/refresh", post(catalog::refresh))
}

/// Create the bridge routes router.
///
/// Exactly the five host operations; nothing else of the host is routed.
pub fn bridge_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/settings",
            get(bridge::get_settings).put(bridge::set_settings),
        )
        .route("/fullscreen", post(bridge::toggle_fullscreen))
        .route("/app-info", get(bridge::app_info))
        .route("/print", post(bridge::print_receipt))
}

/// Create all routes for the till UI.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pos::index))
        .nest("/auth", auth_routes())
        .nest("/catalog", catalog_routes())
        .nest("/bridge", bridge_routes())
}
