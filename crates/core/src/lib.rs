//! Oud Cart Core - Shared types library.
//!
//! This crate provides common types used across all Oud Cart components:
//! - `storefront` - Cart store, catalog, wizard, and rendering
//! - `cli` - Command-line adapter driving a storefront session
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product identifiers, prices, cart lines, and display locales

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
