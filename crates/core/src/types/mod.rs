//! Core types for Mini Catalog.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;

pub use id::ProductId;
pub use price::{CurrencyCode, CurrencyCodeError, Price, format_price};
pub use product::{CartLine, Product};
