//! Unified error handling.
//!
//! Each concern has its own error enum next to the code that raises it.
//! `AppError` wraps the ones a front end can actually see. Remote, storage,
//! and snapshot failures never get this far: the session turns them into
//! state and logs.

use thiserror::Error;

use crate::cart::SyncError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The product catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A save was requested out of order.
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Message safe to show to end users.
    ///
    /// Catalog failures collapse to a single generic message; everything else
    /// is shown as-is.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Catalog(err) => err.user_message().to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
