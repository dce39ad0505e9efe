//! Mini Catalog Core - Shared types library.
//!
//! This crate provides common types used across all Mini Catalog components:
//! - `storefront` - Cart store, remote sync, durable snapshots, catalog loading
//! - `cli` - Command-line front end for browsing products and editing the cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no clocks,
//! no randomness. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs and prices, plus products and cart lines
//! - [`catalog`] - Product search and price sorting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod types;

pub use catalog::{ProductQuery, SortOption, SortOptionError};
pub use types::*;
