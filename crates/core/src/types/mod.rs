//! Core types for Kebab POS.
//!
//! All records mirror the backend's JSON wire format (camelCase keys).

pub mod api;
pub mod catalog;
pub mod email;
pub mod id;
pub mod price;
pub mod receipt;
pub mod settings;
pub mod staff;
pub mod status;

pub use api::ApiResponse;
pub use catalog::{Category, Product, ProductModifierGroup};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use receipt::{
    FALLBACK_ITEM_NAME, KITCHEN_PAYMENT_METHOD, ReceiptItem, ReceiptModifier, ReceiptOrder,
    ReceiptProduct,
};
pub use settings::{AppInfo, DEFAULT_API_URL, PrinterTransport, SettingsPatch, TerminalSettings};
pub use staff::{StaffRole, StaffUser};
pub use status::*;
