//! Receipt payload sent from the UI to the host's printer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::price::Price;

/// Payment method value that selects the kitchen docket layout.
pub const KITCHEN_PAYMENT_METHOD: &str = "kitchen";

/// Item name printed when neither the line nor its product has one.
pub const FALLBACK_ITEM_NAME: &str = "Item";

/// An order as the till hands it to the printer.
///
/// Fields are lenient: checkout sends slightly different shapes depending on
/// where the order came from (`orderType` vs `type`, `tax` vs `gstAmount`,
/// `null` for amounts it has not worked out).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptOrder {
    pub order_number: u64,
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub order_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<ReceiptItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subtotal: Price,
    #[serde(default, alias = "gstAmount", deserialize_with = "null_as_default")]
    pub tax: Price,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ReceiptOrder {
    /// Kitchen dockets are requested with the `kitchen` payment method.
    #[must_use]
    pub fn is_kitchen_docket(&self) -> bool {
        self.payment_method
            .as_deref()
            .is_some_and(|m| m.eq_ignore_ascii_case(KITCHEN_PAYMENT_METHOD))
    }

    /// Customer name worth printing; the `Guest` placeholder is skipped.
    #[must_use]
    pub fn printable_customer(&self) -> Option<&str> {
        self.customer_name
            .as_deref()
            .filter(|name| !name.is_empty() && *name != "Guest")
    }
}

/// One line of a receipt.
///
/// Lines built by the till carry `name`; order items loaded from the backend
/// carry it under `product.name` instead.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ReceiptProduct>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub modifiers: Vec<ReceiptModifier>,
}

impl ReceiptItem {
    /// A line for `quantity` of `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: Some(name.into()),
            quantity: Some(quantity),
            ..Self::default()
        }
    }

    /// Name printed for the line: its own, then its product's, then `Item`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| {
                self.product
                    .as_ref()
                    .and_then(|p| p.name.as_deref())
                    .filter(|n| !n.is_empty())
            })
            .unwrap_or(FALLBACK_ITEM_NAME)
    }

    /// Quantity printed for the line; missing or zero counts as one.
    #[must_use]
    pub fn printed_quantity(&self) -> u32 {
        self.quantity.filter(|q| *q > 0).unwrap_or(1)
    }

    /// Amount printed next to the line: the first non-zero of total, price
    /// and unit price.
    #[must_use]
    pub fn line_amount(&self) -> Price {
        [self.total_price, self.price, self.unit_price]
            .into_iter()
            .flatten()
            .find(|amount| !amount.is_zero())
            .unwrap_or(Price::ZERO)
    }

    /// Notes worth printing.
    #[must_use]
    pub fn printable_notes(&self) -> Option<&str> {
        self.notes.as_deref().filter(|n| !n.trim().is_empty())
    }
}

/// The product a backend order item points at.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReceiptProduct {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A modifier applied to a receipt line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptModifier {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: Price,
}

/// Read `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
