//! Newtype IDs for type-safe entity references.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Catalog product identifier.
///
/// Product IDs are opaque strings assigned by the catalog source. Wrapping
/// them prevents accidentally passing a title or tag where an ID is expected.
///
/// # Example
///
/// ```rust
/// # use mini_catalog_core::ProductId;
/// let id = ProductId::new("sku-001");
/// assert_eq!(id.as_str(), "sku-001");
/// assert_eq!(id, ProductId::from("sku-001"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new ID from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the ID and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
