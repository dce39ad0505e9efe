//! Mini Catalog Storefront library.
//!
//! Everything between the product list and the remote cart service:
//!
//! - [`cart`] - Local cart store, remote cart store, save synchronizer, and
//!   the session that ties them to durable storage
//! - [`storage`] - Named text slots for durable cart snapshots
//! - [`catalog`] - Loading the product list
//! - [`config`] - Environment-driven configuration
//! - [`error`] - Crate-level error type
//!
//! # Example
//!
//! ```rust,ignore
//! use mini_catalog_storefront::cart::{CartSession, RemoteConfig, SimulatedRemoteStore};
//! use mini_catalog_storefront::storage::MemoryStorage;
//!
//! let remote = SimulatedRemoteStore::new(RemoteConfig::default());
//! let mut session = CartSession::new(remote, MemoryStorage::default(), "shopify-cart");
//!
//! session.add_item(product, 1);
//! let outcome = session.save().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod storage;

pub use error::{AppError, Result};
