//! Catalog fetched from the backend.
//!
//! Categories, products and the shop's currency symbol are cached for a
//! short TTL. Staff edit the menu on the backend, so [`CatalogClient::refresh`]
//! lets the till pick changes up without waiting for expiry.

mod components;

pub use components::{
    CategoryTabs, CategoryTabsTemplate, ProductCardView, ProductGrid, ProductGridTemplate,
    TabView, category_href, price_lines,
};

use std::time::Duration;

use kebab_pos_core::{Category, CategoryId, Product};
use moka::future::Cache;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::api::{ApiError, BackendClient};

pub const CATEGORIES_PATH: &str = "/api/categories?active=true";
pub const PRODUCTS_PATH: &str = "/api/products?available=true";
pub const SHOP_SETTINGS_PATH: &str = "/api/settings";

/// Symbol used when the backend does not say otherwise.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

const CACHE_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
enum CacheKey {
    Categories,
    Products,
    CurrencySymbol,
}

#[derive(Debug, Clone)]
enum CacheValue {
    Categories(Vec<Category>),
    Products(Vec<Product>),
    CurrencySymbol(String),
}

/// The slice of the backend's shop settings the till reads.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShopSettings {
    #[serde(default)]
    currency_symbol: Option<String>,
}

/// Cached catalog reads.
#[derive(Clone)]
pub struct CatalogClient {
    backend: BackendClient,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    #[must_use]
    pub fn new(backend: BackendClient) -> Self {
        Self::with_ttl(backend, CACHE_TTL)
    }

    #[must_use]
    pub fn with_ttl(backend: BackendClient, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(16).time_to_live(ttl).build();
        Self { backend, cache }
    }

    /// Active categories in display order.
    ///
    /// # Errors
    ///
    /// Returns error if the backend request fails or is rejected.
    #[instrument(skip_all)]
    pub async fn categories(&self, headers: HeaderMap) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let mut categories: Vec<Category> = self.backend.get(CATEGORIES_PATH, headers).await?;
        categories.retain(|c| c.is_active);
        categories.sort_by_key(|c| c.sort_order);

        self.cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(categories.clone()),
            )
            .await;
        Ok(categories)
    }

    /// Every available product.
    ///
    /// # Errors
    ///
    /// Returns error if the backend request fails or is rejected.
    #[instrument(skip_all)]
    pub async fn products(&self, headers: HeaderMap) -> Result<Vec<Product>, ApiError> {
        if let Some(CacheValue::Products(products)) = self.cache.get(&CacheKey::Products).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let mut products: Vec<Product> = self.backend.get(PRODUCTS_PATH, headers).await?;
        products.sort_by_key(|p| p.sort_order);

        self.cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    /// Products belonging to `category`.
    ///
    /// # Errors
    ///
    /// Returns error if the backend request fails or is rejected.
    pub async fn products_in(
        &self,
        category: &CategoryId,
        headers: HeaderMap,
    ) -> Result<Vec<Product>, ApiError> {
        let mut products = self.products(headers).await?;
        products.retain(|p| p.in_category(category));
        Ok(products)
    }

    /// The shop's currency symbol.
    ///
    /// Never fails: a missing or unreadable setting falls back to
    /// [`DEFAULT_CURRENCY_SYMBOL`].
    pub async fn currency_symbol(&self, headers: HeaderMap) -> String {
        if let Some(CacheValue::CurrencySymbol(symbol)) =
            self.cache.get(&CacheKey::CurrencySymbol).await
        {
            return symbol;
        }

        let symbol = match self
            .backend
            .get::<ShopSettings>(SHOP_SETTINGS_PATH, headers)
            .await
        {
            Ok(settings) => settings
                .currency_symbol
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load shop settings, using default currency");
                return DEFAULT_CURRENCY_SYMBOL.to_string();
            }
        };

        self.cache
            .insert(
                CacheKey::CurrencySymbol,
                CacheValue::CurrencySymbol(symbol.clone()),
            )
            .await;
        symbol
    }

    /// Drop everything cached so the next read hits the backend.
    pub fn refresh(&self) {
        self.cache.invalidate_all();
        tracing::info!("Catalog cache cleared");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{Json, Router, routing::get};
    use serde_json::json;

    use super::*;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await });
        format!("http://{addr}")
    }

    async fn catalog(hits: Arc<AtomicUsize>) -> CatalogClient {
        let router = Router::new()
            .route(
                "/api/categories",
                get(|| async {
                    Json(json!({"success": true, "data": [
                        {"id": "2", "name": "Plates", "sortOrder": 2},
                        {"id": "1", "name": "Wraps", "sortOrder": 1},
                        {"id": "3", "name": "Retired", "isActive": false}
                    ]}))
                }),
            )
            .route(
                "/api/products",
                get(move || {
                    hits.fetch_add(1, Ordering::SeqCst);
                    async {
                        Json(json!({"success": true, "data": [
                            {"id": "p1", "name": "Lamb Wrap", "price": 14.5, "categoryId": "1"},
                            {"id": "p2", "name": "Mixed Plate", "price": 22, "categoryId": "2"}
                        ]}))
                    }
                }),
            )
            .route(
                "/api/settings",
                get(|| async { Json(json!({"success": true, "data": {"currencySymbol": "£"}})) }),
            );
        let backend = BackendClient::new(&serve(router).await, Duration::from_secs(5)).unwrap();
        CatalogClient::new(backend)
    }

    #[tokio::test]
    async fn test_categories_sorted_and_active() {
        let catalog = catalog(Arc::default()).await;
        let categories = catalog.categories(HeaderMap::new()).await.unwrap();
        let names: Vec<_> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Wraps", "Plates"]);
    }

    #[tokio::test]
    async fn test_products_filtered_by_category() {
        let catalog = catalog(Arc::default()).await;
        let wraps = catalog
            .products_in(&CategoryId::new("1"), HeaderMap::new())
            .await
            .unwrap();
        assert_eq!(wraps.len(), 1);
        assert_eq!(wraps[0].name, "Lamb Wrap");
    }

    #[tokio::test]
    async fn test_products_cached_until_refresh() {
        let hits = Arc::new(AtomicUsize::new(0));
        let catalog = catalog(Arc::clone(&hits)).await;

        catalog.products(HeaderMap::new()).await.unwrap();
        catalog.products(HeaderMap::new()).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        catalog.refresh();
        catalog.products(HeaderMap::new()).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_currency_symbol() {
        let catalog = catalog(Arc::default()).await;
        assert_eq!(catalog.currency_symbol(HeaderMap::new()).await, "£");
    }

    #[tokio::test]
    async fn test_currency_symbol_defaults_when_unreachable() {
        let backend = BackendClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let catalog = CatalogClient::new(backend);
        assert_eq!(
            catalog.currency_symbol(HeaderMap::new()).await,
            DEFAULT_CURRENCY_SYMBOL
        );
    }

    #[tokio::test]
    async fn test_rejected_products() {
        let router = Router::new().route(
            "/api/products",
            get(|| async { Json(json!({"success": false, "error": "Unauthorized"})) }),
        );
        let backend = BackendClient::new(&serve(router).await, Duration::from_secs(5)).unwrap();
        let err = CatalogClient::new(backend)
            .products(HeaderMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Rejected(Some(msg)) if msg == "Unauthorized"));
    }
}
