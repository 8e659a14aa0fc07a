//! The till's main screen.
//!
//! What `/` shows follows the session gate: a loading screen until the first
//! validation has finished, the login form when nobody is signed in, and the
//! category tabs with the product grid otherwise.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use kebab_pos_core::{CategoryId, StaffUser};
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::{CategoryTabs, ProductCardView, ProductGrid, TabView};
use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PosQuery {
    pub category: Option<String>,
}

/// Shown while the session gate is establishing the session.
#[derive(Template, WebTemplate)]
#[template(path = "loading.html")]
pub struct LoadingTemplate {
    pub status_bar_color: &'static str,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub status_bar_color: &'static str,
    pub error: Option<String>,
    pub email: String,
}

/// Category tabs and product grid for the signed-in staff member.
#[derive(Template, WebTemplate)]
#[template(path = "pos.html")]
pub struct PosTemplate {
    pub status_bar_color: &'static str,
    pub staff_name: String,
    pub role: String,
    pub tabs: Vec<TabView>,
    pub cards: Vec<ProductCardView>,
}

/// Display the screen matching the session state.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PosQuery>,
) -> Result<Response> {
    let gate = state.gate();
    let status_bar_color = state.shell().status_bar_color;

    if gate.is_loading().await {
        return Ok(LoadingTemplate { status_bar_color }.into_response());
    }

    let Some(user) = gate.user().await else {
        return Ok(LoginTemplate {
            status_bar_color,
            error: None,
            email: String::new(),
        }
        .into_response());
    };

    let requested = query.category.map(CategoryId::from);
    Ok(pos_page(&state, &user, requested.as_ref()).await?.into_response())
}

async fn pos_page(
    state: &AppState,
    user: &StaffUser,
    requested: Option<&CategoryId>,
) -> Result<PosTemplate> {
    let headers = state.gate().auth_headers().await;
    let catalog = state.catalog();
    let categories = catalog.categories(headers.clone()).await?;

    // The first tab is selected until a known one is picked.
    let mut selected = categories.first().map(|c| c.id.clone());
    if let Some(id) = requested {
        CategoryTabs::new(&categories, None).click(id, |id| selected = Some(id.clone()));
    }

    let products = match &selected {
        Some(id) => catalog.products_in(id, headers.clone()).await?,
        None => Vec::new(),
    };
    let currency_symbol = catalog.currency_symbol(headers).await;

    Ok(PosTemplate {
        status_bar_color: state.shell().status_bar_color,
        staff_name: user.name.clone(),
        role: user.role.to_string(),
        tabs: CategoryTabs::new(&categories, selected.as_ref()).tabs(),
        cards: ProductGrid::new(&products, &currency_symbol).cards(),
    })
}
