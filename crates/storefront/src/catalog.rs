//! Product catalog loading.
//!
//! The catalog is a JSON array of products read once at startup. A failed
//! load is a blocking condition for the front end and is not retried here.

use std::path::{Path, PathBuf};

use mini_catalog_core::Product;
use thiserror::Error;
use tracing::{error, info, instrument};

/// Message shown to users when the catalog cannot be loaded.
pub const CATALOG_UNAVAILABLE: &str = "Failed to load products. Please try again later.";

/// Errors that can occur when loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog file is not a valid product list.
    #[error("Failed to parse catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl CatalogError {
    /// Message safe to show to end users.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        CATALOG_UNAVAILABLE
    }
}

/// Load the product list from a JSON file.
///
/// # Errors
///
/// Returns `CatalogError` if the file cannot be read or parsed.
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub async fn load_products(path: impl AsRef<Path>) -> Result<Vec<Product>, CatalogError> {
    let path = path.as_ref();

    let text = tokio::fs::read_to_string(path).await.map_err(|source| {
        error!(error = %source, "Error fetching products");
        CatalogError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let products: Vec<Product> = serde_json::from_str(&text).map_err(|source| {
        error!(error = %source, "Error parsing products");
        CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;

    info!(count = products.len(), "Loaded product catalog");
    Ok(products)
}
