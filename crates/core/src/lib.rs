//! Kebab POS Core - Shared types library.
//!
//! This crate provides common types used across all Kebab POS components:
//! - `terminal` - Host shell, session gate and catalog UI for the till
//! - `cli` - Command-line tools for one-off data migrations
//!
//! # Architecture
//!
//! The core crate contains only types, validation rules and traits - no I/O,
//! no database access, no HTTP clients. This keeps it lightweight and allows
//! it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Catalog records, staff identity, settings, receipts and IDs
//! - [`validation`] - Input rules shared with the backend API

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validation;

pub use types::*;
