//! Integration tests for Mini Catalog.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mini-catalog-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_session` - Session lifecycle over file storage and remote stores
//! - `catalog` - Loading and querying the bundled product catalog
//!
//! This library holds the test doubles shared by those suites.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use mini_catalog_core::{CartLine, Price, Product};
use mini_catalog_storefront::cart::{RemoteCartStore, RemoteError};
use tokio::sync::{Mutex, Notify};

/// Path of the catalog shipped in the repository's `data/` directory.
#[must_use]
pub fn bundled_catalog_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/products.json")
}

/// A product with no tags.
#[must_use]
pub fn product(id: &str, cents: i64) -> Product {
    Product::new(id, format!("Product {id}"), Price::from_cents(cents))
}

/// Remote store that answers from a script and records every call.
///
/// Each save pops the next scripted answer: `None` accepts, `Some(msg)`
/// rejects with `msg`. An exhausted script accepts.
#[derive(Debug, Default)]
pub struct ScriptedRemote {
    script: Mutex<VecDeque<Option<String>>>,
    saves: Mutex<Vec<Vec<CartLine>>>,
    loads: AtomicUsize,
}

impl ScriptedRemote {
    /// Create a store with the given script.
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = Option<&'static str>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().map(|s| s.map(str::to_owned)).collect()),
            saves: Mutex::new(Vec::new()),
            loads: AtomicUsize::new(0),
        }
    }

    /// Every line list submitted so far.
    pub async fn saves(&self) -> Vec<Vec<CartLine>> {
        self.saves.lock().await.clone()
    }

    /// Number of `load` calls so far.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl RemoteCartStore for ScriptedRemote {
    async fn save(&self, lines: Vec<CartLine>) -> Result<Vec<CartLine>, RemoteError> {
        self.saves.lock().await.push(lines.clone());
        match self.script.lock().await.pop_front().flatten() {
            Some(message) => Err(RemoteError::Rejected(message)),
            None => Ok(lines),
        }
    }

    async fn load(&self) -> Result<Vec<CartLine>, RemoteError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.saves.lock().await.last().cloned().unwrap_or_default())
    }
}

/// Remote store whose saves block until [`release`](Self::release) is called.
#[derive(Debug, Default)]
pub struct GatedRemote {
    gate: Notify,
    fail: bool,
}

impl GatedRemote {
    /// A gated store that accepts once released.
    #[must_use]
    pub fn accepting() -> Self {
        Self::default()
    }

    /// A gated store that fails once released.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            gate: Notify::new(),
            fail: true,
        }
    }

    /// Let one pending (or the next) save complete.
    pub fn release(&self) {
        self.gate.notify_one();
    }
}

impl RemoteCartStore for GatedRemote {
    async fn save(&self, lines: Vec<CartLine>) -> Result<Vec<CartLine>, RemoteError> {
        self.gate.notified().await;
        if self.fail {
            Err(RemoteError::Network("Failed to save cart".to_string()))
        } else {
            Ok(lines)
        }
    }

    async fn load(&self) -> Result<Vec<CartLine>, RemoteError> {
        Ok(Vec::new())
    }
}
