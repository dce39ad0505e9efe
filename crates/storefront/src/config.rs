//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `CART_STORAGE_KEY` - Storage slot for the cart snapshot (default: shopify-cart)
//! - `CART_DATA_DIR` - Directory holding storage slots (default: .cart)
//! - `CATALOG_PATH` - Product catalog JSON file (default: data/products.json)
//! - `CART_REMOTE_LATENCY_MS` - Simulated remote round trip (default: 1000)
//! - `CART_REMOTE_FAILURE_RATE` - Simulated remote failure probability, 0 to 1 (default: 0.1)
//! - `CART_REMOTE_SEED` - Seed for the simulated failure draw (default: random)
//! - `CART_CURRENCY` - Display currency code: USD, EUR, GBP, CAD, AUD (default: USD)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use mini_catalog_core::CurrencyCode;
use thiserror::Error;

use crate::cart::{CART_STORAGE_KEY, RemoteConfig};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CartConfig {
    /// Storage slot for the cart snapshot
    pub storage_key: String,
    /// Directory holding storage slots
    pub data_dir: PathBuf,
    /// Product catalog JSON file
    pub catalog_path: PathBuf,
    /// Simulated remote store behaviour
    pub remote: RemoteConfig,
    /// Currency used when displaying prices
    pub currency: CurrencyCode,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: CART_STORAGE_KEY.to_string(),
            data_dir: PathBuf::from(".cart"),
            catalog_path: PathBuf::from("data/products.json"),
            remote: RemoteConfig::default(),
            currency: CurrencyCode::default(),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let storage_key = lookup("CART_STORAGE_KEY").unwrap_or(defaults.storage_key);
        if storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let data_dir = lookup("CART_DATA_DIR").map_or(defaults.data_dir, PathBuf::from);
        let catalog_path = lookup("CATALOG_PATH").map_or(defaults.catalog_path, PathBuf::from);

        let latency_ms: u64 = parse_or(&lookup, "CART_REMOTE_LATENCY_MS", 1000)?;
        let failure_rate: f64 = parse_or(&lookup, "CART_REMOTE_FAILURE_RATE", 0.1)?;
        validate_failure_rate(failure_rate)?;
        let seed = parse_optional::<u64>(&lookup, "CART_REMOTE_SEED")?;
        let currency = parse_or(&lookup, "CART_CURRENCY", defaults.currency)?;

        Ok(Self {
            storage_key,
            data_dir,
            catalog_path,
            remote: RemoteConfig {
                latency: Duration::from_millis(latency_ms),
                failure_rate,
                seed,
            },
            currency,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable, falling back to `default` when unset.
fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    Ok(parse_optional(lookup, key)?.unwrap_or(default))
}

/// Parse a variable if set.
fn parse_optional<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
        .transpose()
}

/// Failure rate must be a probability.
fn validate_failure_rate(rate: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&rate) {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvVar(
            "CART_REMOTE_FAILURE_RATE".to_string(),
            format!("must be between 0 and 1 (got {rate})"),
        ))
    }
}
