//! Product search and sorting.
//!
//! Pure functions over an already-fetched product list. Loading the list is
//! the storefront crate's job.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{Product, ProductId};

/// Price ordering for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Cheapest first.
    #[default]
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
}

impl SortOption {
    /// Wire name, e.g. `price-asc`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown sort option.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown sort option '{0}' (expected price-asc or price-desc)")]
pub struct SortOptionError(String);

impl FromStr for SortOption {
    type Err = SortOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            other => Err(SortOptionError(other.to_owned())),
        }
    }
}

/// A listing query: title search plus price ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Case-insensitive substring matched against product titles.
    pub search: String,
    /// Price ordering.
    pub sort: SortOption,
}

impl ProductQuery {
    /// Create a query.
    #[must_use]
    pub fn new(search: impl Into<String>, sort: SortOption) -> Self {
        Self {
            search: search.into(),
            sort,
        }
    }

    /// Apply the query to `products`.
    ///
    /// Filtering keeps products whose title contains the search term,
    /// ignoring case. The sort is stable, so products with equal prices keep
    /// their catalog order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let needle = self.search.to_lowercase();
        let mut matches: Vec<&Product> = products
            .iter()
            .filter(|product| product.title.to_lowercase().contains(&needle))
            .collect();

        match self.sort {
            SortOption::PriceAsc => matches.sort_by_key(|product| product.price),
            SortOption::PriceDesc => {
                matches.sort_by(|a, b| b.price.cmp(&a.price));
            }
        }

        matches
    }
}

/// Find a product by ID.
#[must_use]
pub fn find<'a>(products: &'a [Product], id: &ProductId) -> Option<&'a Product> {
    products.iter().find(|product| &product.id == id)
}
