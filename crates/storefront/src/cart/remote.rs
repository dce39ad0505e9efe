//! Remote cart store contract and a simulated implementation.
//!
//! The remote store is an external collaborator: it accepts a full line list
//! on save and returns the previously accepted list on load. Each call yields
//! exactly one of a payload or an error.

use std::future::Future;
use std::time::Duration;

use mini_catalog_core::CartLine;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Errors returned by a remote cart store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The request did not reach the store or the response was lost.
    #[error("Network error: {0}")]
    Network(String),

    /// The store received the request and refused it.
    #[error("Rejected: {0}")]
    Rejected(String),
}

/// Save/load contract for the remote cart service.
///
/// Implementations may take arbitrarily long and may fail at any rate;
/// timeouts, if wanted, belong here rather than in the caller.
pub trait RemoteCartStore: Send + Sync {
    /// Persist `lines` remotely and return the accepted list.
    fn save(
        &self,
        lines: Vec<CartLine>,
    ) -> impl Future<Output = Result<Vec<CartLine>, RemoteError>> + Send;

    /// Fetch the last accepted list.
    fn load(&self) -> impl Future<Output = Result<Vec<CartLine>, RemoteError>> + Send;
}

/// Behaviour of [`SimulatedRemoteStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteConfig {
    /// Delay before every response.
    pub latency: Duration,
    /// Probability in `[0, 1]` that a call fails.
    pub failure_rate: f64,
    /// Seed for the failure draw. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl RemoteConfig {
    /// A store that answers immediately and never fails.
    #[must_use]
    pub const fn reliable() -> Self {
        Self {
            latency: Duration::ZERO,
            failure_rate: 0.0,
            seed: Some(0),
        }
    }

    /// A store that answers immediately and always fails.
    #[must_use]
    pub const fn failing() -> Self {
        Self {
            latency: Duration::ZERO,
            failure_rate: 1.0,
            seed: Some(0),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(1000),
            failure_rate: 0.1,
            seed: None,
        }
    }
}

/// In-process stand-in for the remote cart service.
///
/// Sleeps for the configured latency, then fails with the configured
/// probability. Accepted saves are remembered and returned by `load`.
#[derive(Debug)]
pub struct SimulatedRemoteStore {
    config: RemoteConfig,
    rng: Mutex<StdRng>,
    accepted: Mutex<Vec<CartLine>>,
}

impl SimulatedRemoteStore {
    /// Create a simulated store.
    #[must_use]
    pub fn new(config: RemoteConfig) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

        Self {
            config,
            rng: Mutex::new(rng),
            accepted: Mutex::new(Vec::new()),
        }
    }

    /// The store's configuration.
    #[must_use]
    pub const fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Wait out the latency and decide whether this call fails.
    async fn round_trip(&self) -> bool {
        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }
        let draw: f64 = self.rng.lock().await.random();
        draw < self.config.failure_rate
    }
}

impl RemoteCartStore for SimulatedRemoteStore {
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    async fn save(&self, lines: Vec<CartLine>) -> Result<Vec<CartLine>, RemoteError> {
        debug!("Saving cart to remote store");

        if self.round_trip().await {
            warn!("Simulated network failure on save");
            return Err(RemoteError::Network("Failed to save cart".to_string()));
        }

        self.accepted.lock().await.clone_from(&lines);
        info!("Cart saved to remote store");
        Ok(lines)
    }

    #[instrument(skip(self))]
    async fn load(&self) -> Result<Vec<CartLine>, RemoteError> {
        debug!("Loading cart from remote store");

        if self.round_trip().await {
            warn!("Simulated network failure on load");
            return Err(RemoteError::Network("Failed to load cart".to_string()));
        }

        Ok(self.accepted.lock().await.clone())
    }
}
