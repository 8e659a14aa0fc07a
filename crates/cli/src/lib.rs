//! Kebab POS command-line tools.
//!
//! Exposed as a library so the integration tests can drive commands without
//! spawning the binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod commands;
