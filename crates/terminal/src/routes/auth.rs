//! Login and logout.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use super::pos::LoginTemplate;
use crate::state::AppState;

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Sign in through the session gate.
///
/// Success lands on the POS screen; failure re-renders the form with the
/// gate's error message and the email kept.
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let outcome = state.gate().login(&form.email, &form.password).await;
    if outcome.success {
        return Redirect::to("/").into_response();
    }

    (
        StatusCode::UNAUTHORIZED,
        LoginTemplate {
            status_bar_color: state.shell().status_bar_color,
            error: outcome.error,
            email: form.email,
        },
    )
        .into_response()
}

/// Sign out. Always succeeds locally.
pub async fn logout(State(state): State<AppState>) -> Redirect {
    state.gate().logout().await;
    Redirect::to("/")
}
