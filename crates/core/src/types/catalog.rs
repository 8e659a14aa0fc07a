//! Catalog display records.
//!
//! Categories and products are read-only on the till; the backend owns them.

use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ModifierGroupId, ProductId};
use super::price::Price;

/// A menu category shown as a tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Category {
    /// Minimal category with just an id and a name.
    #[must_use]
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            sort_order: 0,
            is_active: true,
        }
    }
}

/// A sellable menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Price per kilogram for items sold by weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_kg: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub sort_order: i32,
}

impl Product {
    /// Available product with a single unit price.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            price_per_kg: None,
            description: None,
            image: None,
            image_url: None,
            is_available: true,
            category_id: None,
            sort_order: 0,
        }
    }

    /// Image to show on the card; the hosted URL wins over the legacy path.
    #[must_use]
    pub fn display_image(&self) -> Option<&str> {
        let non_empty = |src: &&str| !src.is_empty();
        self.image_url
            .as_deref()
            .filter(non_empty)
            .or_else(|| self.image.as_deref().filter(non_empty))
    }

    /// Whether the product belongs to the given category.
    #[must_use]
    pub fn in_category(&self, category: &CategoryId) -> bool {
        self.category_id.as_ref() == Some(category)
    }
}

/// Join row linking a product to one of its modifier groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct ProductModifierGroup {
    #[cfg_attr(feature = "postgres", sqlx(rename = "productId"))]
    pub product_id: ProductId,
    #[cfg_attr(feature = "postgres", sqlx(rename = "modifierGroupId"))]
    pub modifier_group_id: ModifierGroupId,
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_from_backend_json() {
        let json = r#"{
            "id": "p1",
            "name": "Lamb Wrap",
            "price": 14.5,
            "pricePerKg": null,
            "imageUrl": "https://cdn.example.com/lamb.png",
            "isAvailable": false,
            "categoryId": "c1",
            "sortOrder": 2
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, Price::from_cents(1450));
        assert!(product.price_per_kg.is_none());
        assert!(!product.is_available);
        assert!(product.in_category(&CategoryId::new("c1")));
        assert_eq!(product.display_image(), Some("https://cdn.example.com/lamb.png"));
    }

    #[test]
    fn test_display_image_falls_back_to_image() {
        let mut product = Product::new("p2", "Baklava", Price::from_cents(400));
        assert_eq!(product.display_image(), None);
        product.image = Some("/img/baklava.png".to_string());
        assert_eq!(product.display_image(), Some("/img/baklava.png"));
        product.image_url = Some(String::new());
        assert_eq!(product.display_image(), Some("/img/baklava.png"));
    }

    #[test]
    fn test_category_defaults() {
        let category: Category = serde_json::from_str(r#"{"id":"1","name":"Wraps"}"#).unwrap();
        assert_eq!(category, Category::new("1", "Wraps"));
    }
}
