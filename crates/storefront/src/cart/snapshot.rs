//! Durable cart snapshot format.
//!
//! A snapshot is a JSON array of `{"product": {...}, "quantity": n}` records.
//! Decoding also enforces the cart invariants, so a snapshot edited by hand
//! into a duplicate or zero-quantity line is rejected like any other corrupt
//! document.

use std::collections::HashSet;

use mini_catalog_core::{CartLine, ProductId};
use thiserror::Error;

/// Why a stored snapshot could not be used.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Not valid JSON, or not the expected shape.
    #[error("Malformed cart snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    /// A line has quantity 0.
    #[error("Cart snapshot has zero quantity for product {0}")]
    ZeroQuantity(ProductId),

    /// Two lines share a product ID.
    #[error("Cart snapshot has duplicate lines for product {0}")]
    DuplicateProduct(ProductId),
}

/// Serialize lines for storage.
///
/// # Errors
///
/// Returns `SnapshotError::Parse` if serialization fails.
pub fn encode(lines: &[CartLine]) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(lines)?)
}

/// Parse and validate a stored snapshot.
///
/// # Errors
///
/// Returns `SnapshotError` if the text is not a valid line list or violates
/// the cart invariants.
pub fn decode(text: &str) -> Result<Vec<CartLine>, SnapshotError> {
    let lines: Vec<CartLine> = serde_json::from_str(text)?;

    let mut seen = HashSet::with_capacity(lines.len());
    for line in &lines {
        if line.quantity == 0 {
            return Err(SnapshotError::ZeroQuantity(line.product.id.clone()));
        }
        if !seen.insert(&line.product.id) {
            return Err(SnapshotError::DuplicateProduct(line.product.id.clone()));
        }
    }

    Ok(lines)
}
