//! Catalog routes. All of them need a signed-in staff member.

use axum::{
    Json,
    extract::{Path, State},
    response::Redirect,
};
use kebab_pos_core::{Category, Product, ProductId, StaffUser};
use serde::Serialize;
use tracing::instrument;

use crate::catalog::{ProductGrid, category_href};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Everything the till needs to draw its menu.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub currency_symbol: String,
}

async fn require_staff(state: &AppState) -> Result<StaffUser> {
    state.gate().user().await.ok_or(AppError::Unauthorized)
}

/// Return the catalog as JSON.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<CatalogResponse>> {
    require_staff(&state).await?;
    let headers = state.gate().auth_headers().await;
    let catalog = state.catalog();

    Ok(Json(CatalogResponse {
        categories: catalog.categories(headers.clone()).await?,
        products: catalog.products(headers.clone()).await?,
        currency_symbol: catalog.currency_symbol(headers).await,
    }))
}

/// A product card was pressed.
///
/// Unavailable products never count as selected and answer `409 Conflict`.
#[instrument(skip(state))]
pub async fn select_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let user = require_staff(&state).await?;
    let headers = state.gate().auth_headers().await;
    let products = state.catalog().products(headers.clone()).await?;
    let currency_symbol = state.catalog().currency_symbol(headers).await;

    let id = ProductId::from(id);
    let Some(product) = products.iter().find(|p| p.id == id) else {
        return Err(AppError::NotFound(format!("Product {id}")));
    };

    let mut category = None;
    let fired = ProductGrid::new(&products, &currency_symbol).click(&id, |product| {
        tracing::info!(
            product_id = %product.id,
            product = %product.name,
            price = %product.price.display(&currency_symbol),
            staff = %user.email,
            "Product selected"
        );
        category = product.category_id.clone();
    });
    if !fired {
        return Err(AppError::Conflict(format!("{} is unavailable", product.name)));
    }

    Ok(match category {
        Some(category) => Redirect::to(&category_href(&category)),
        None => Redirect::to("/"),
    })
}

/// Drop cached catalog data and show the freshly loaded menu.
pub async fn refresh(State(state): State<AppState>) -> Result<Redirect> {
    require_staff(&state).await?;
    state.catalog().refresh();
    Ok(Redirect::to("/"))
}
