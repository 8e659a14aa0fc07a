//! Order type and payment method of an order.
//!
//! Wire values match the backend's lowercase strings (`dine-in`, `card`, ...).
//! Parsing is lenient about case and `_` vs `-`, since orders reach the
//! printer from more than one client.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How an order is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    #[serde(alias = "dine_in")]
    DineIn,
    #[default]
    Takeaway,
    Delivery,
    Online,
}

impl OrderType {
    /// All order types, in the order the till offers them.
    pub const ALL: [Self; 4] = [Self::DineIn, Self::Takeaway, Self::Delivery, Self::Online];

    /// Wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DineIn => "dine-in",
            Self::Takeaway => "takeaway",
            Self::Delivery => "delivery",
            Self::Online => "online",
        }
    }

    /// Heading printed on receipts and dockets.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::DineIn => "DINE IN",
            Self::Takeaway => "TAKEAWAY",
            Self::Delivery => "DELIVERY",
            Self::Online => "ONLINE",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| format!("invalid order type: {s}"))
    }
}

/// How an order was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Online,
}

impl PaymentMethod {
    pub const ALL: [Self; 3] = [Self::Cash, Self::Card, Self::Online];

    /// Wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Online => "online",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == normalized)
            .ok_or_else(|| format!("invalid payment method: {s}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_type_wire_values() {
        assert_eq!(serde_json::to_string(&OrderType::DineIn).unwrap(), "\"dine-in\"");
        let legacy: OrderType = serde_json::from_str("\"dine_in\"").unwrap();
        assert_eq!(legacy, OrderType::DineIn);
    }

    #[test]
    fn test_order_type_parse_is_lenient() {
        assert_eq!("takeaway".parse::<OrderType>().unwrap(), OrderType::Takeaway);
        assert_eq!("Dine_In".parse::<OrderType>().unwrap(), OrderType::DineIn);
        assert_eq!(" DELIVERY ".parse::<OrderType>().unwrap(), OrderType::Delivery);
        assert!("drive-thru".parse::<OrderType>().is_err());
        assert_eq!(OrderType::default().label(), "TAKEAWAY");
    }

    #[test]
    fn test_payment_method() {
        assert_eq!(serde_json::to_string(&PaymentMethod::Card).unwrap(), "\"card\"");
        assert_eq!("CARD".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert!("kitchen".parse::<PaymentMethod>().is_err());
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
    }
}
