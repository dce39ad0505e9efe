//! Catalog products and cart lines.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A catalog product.
///
/// Products are immutable once fetched; the cart holds its own copy of each
/// product it references so snapshots stay self-contained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price in cents.
    pub price: Price,
    /// Ordered tag labels.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Product {
    /// Create a product with no tags.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, title: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            tags: Vec::new(),
        }
    }

    /// Builder-style tag assignment.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// One product-quantity pairing in a cart.
///
/// The quantity is at least 1 for as long as the line exists; the cart store
/// removes lines instead of keeping zero-quantity entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// The product in this line.
    pub product: Product,
    /// Number of units.
    pub quantity: u32,
}

impl CartLine {
    /// Create a new cart line.
    #[must_use]
    pub const fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// Product identifier of this line.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}
