//! Native bridge routes.
//!
//! One route per bridge operation. Handlers only forward to the [`Bridge`]
//! handle; they never touch host state themselves.
//!
//! [`Bridge`]: crate::bridge::Bridge

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use kebab_pos_core::{AppInfo, ReceiptOrder, SettingsPatch, TerminalSettings};

use crate::error::Result;
use crate::printer::PrintOutcome;
use crate::state::AppState;

pub async fn get_settings(State(state): State<AppState>) -> Result<Json<TerminalSettings>> {
    Ok(Json(state.bridge().get_settings().await?))
}

/// Merge a partial update. Replies `false` if it could not be saved.
pub async fn set_settings(
    State(state): State<AppState>,
    Json(patch): Json<SettingsPatch>,
) -> Result<Json<bool>> {
    Ok(Json(state.bridge().set_settings(patch).await?))
}

/// Replies with the new fullscreen state.
pub async fn toggle_fullscreen(State(state): State<AppState>) -> Result<Json<bool>> {
    Ok(Json(state.bridge().toggle_fullscreen().await?))
}

pub async fn app_info(State(state): State<AppState>) -> Result<Json<AppInfo>> {
    Ok(Json(state.bridge().get_app_info().await?))
}

/// Print a receipt. Failures come back in the body, never as an error status,
/// including a payload that is not a receipt at all.
pub async fn print_receipt(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ReceiptOrder>, JsonRejection>,
) -> Json<PrintOutcome> {
    match payload {
        Ok(Json(order)) => Json(state.bridge().print_receipt(order).await),
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Unreadable receipt payload");
            Json(PrintOutcome::failed(rejection.body_text()))
        }
    }
}
