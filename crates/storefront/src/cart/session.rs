//! Cart session: the single read/mutate/save surface for a front end.
//!
//! A session owns the local cart, the save state machine, and a durable
//! storage slot. It restores the cart from the slot on construction, writes
//! the working lines back after every change, and talks to the remote store
//! only when asked to save.
//!
//! Failures never escape as errors: a corrupt snapshot becomes an empty cart,
//! a storage write failure is logged, and a failed save becomes
//! [`CartSession::last_error`].

use std::sync::Arc;

use mini_catalog_core::{CartLine, Price, Product, ProductId};
use tracing::{debug, info, instrument, warn};

use super::remote::{RemoteCartStore, RemoteError};
use super::snapshot;
use super::store::{CartAction, LocalCart};
use super::sync::{CartSynchronizer, SaveOutcome, SyncError};
use crate::storage::SnapshotStorage;

/// Default storage slot for the cart snapshot.
pub const CART_STORAGE_KEY: &str = "shopify-cart";

/// A save captured at the moment it was requested.
///
/// Holds its own copy of the lines and a handle to the remote store, so the
/// session stays free for edits while the request is in flight. Pass the
/// response from [`send`](Self::send) to [`CartSession::finish_save`]; until
/// then the session reports `is_saving() == true`.
#[derive(Debug)]
#[must_use = "a save request does nothing until sent and finished"]
pub struct SaveRequest<R> {
    lines: Vec<CartLine>,
    remote: Arc<R>,
}

impl<R: RemoteCartStore> SaveRequest<R> {
    /// Lines captured when the save was requested.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Submit the captured lines to the remote store.
    pub async fn send(self) -> SaveResponse {
        let result = self.remote.save(self.lines.clone()).await;
        SaveResponse {
            submitted: self.lines,
            result,
        }
    }
}

/// A remote store's answer to a [`SaveRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "pass the response to CartSession::finish_save"]
pub struct SaveResponse {
    submitted: Vec<CartLine>,
    result: Result<Vec<CartLine>, RemoteError>,
}

impl SaveResponse {
    /// Lines that were sent.
    #[must_use]
    pub fn submitted(&self) -> &[CartLine] {
        &self.submitted
    }

    /// Whether the remote store accepted the save.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Local cart + save synchronizer + durable snapshot.
#[derive(Debug)]
pub struct CartSession<R, S> {
    cart: LocalCart,
    sync: CartSynchronizer,
    remote: Arc<R>,
    storage: S,
    storage_key: String,
}

impl<R: RemoteCartStore, S: SnapshotStorage> CartSession<R, S> {
    /// Start a session, restoring the cart from `storage_key`.
    ///
    /// Never fails: a missing slot starts an empty cart, and an unreadable or
    /// malformed one starts an empty cart with a warning in the log.
    pub fn new(remote: R, storage: S, storage_key: impl Into<String>) -> Self {
        Self::with_shared_remote(Arc::new(remote), storage, storage_key)
    }

    /// Like [`new`](Self::new), for a remote store shared with other owners.
    pub fn with_shared_remote(remote: Arc<R>, storage: S, storage_key: impl Into<String>) -> Self {
        let mut session = Self {
            cart: LocalCart::new(),
            sync: CartSynchronizer::new(),
            remote,
            storage,
            storage_key: storage_key.into(),
        };
        session.restore();
        session
    }

    fn restore(&mut self) {
        let text = match self.storage.read(&self.storage_key) {
            Ok(Some(text)) => text,
            Ok(None) => {
                debug!(key = %self.storage_key, "No stored cart, starting empty");
                return;
            }
            Err(e) => {
                warn!(key = %self.storage_key, error = %e, "Failed to read stored cart, starting empty");
                return;
            }
        };

        match snapshot::decode(&text) {
            Ok(lines) => {
                info!(key = %self.storage_key, lines = lines.len(), "Restored cart from storage");
                self.cart.apply(CartAction::Load { lines });
            }
            Err(e) => {
                warn!(key = %self.storage_key, error = %e, "Discarding malformed stored cart");
                self.persist();
            }
        }
    }

    /// Write the working lines to storage. Failures are logged only.
    fn persist(&mut self) {
        let text = match snapshot::encode(self.cart.lines()) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Failed to encode cart snapshot");
                return;
            }
        };
        if let Err(e) = self.storage.write(&self.storage_key, &text) {
            warn!(key = %self.storage_key, error = %e, "Failed to persist cart snapshot");
        }
    }

    fn dispatch(&mut self, action: CartAction) {
        self.cart.apply(action);
        self.persist();
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` units of `product`.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_item(&mut self, product: Product, quantity: u32) {
        self.dispatch(CartAction::Add { product, quantity });
    }

    /// Set a line's quantity exactly. `quantity <= 0` removes the line.
    #[instrument(skip(self, product_id), fields(product_id = %product_id))]
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        self.dispatch(CartAction::UpdateQuantity {
            product_id: product_id.clone(),
            quantity,
        });
    }

    /// Remove a line if present.
    #[instrument(skip(self, product_id), fields(product_id = %product_id))]
    pub fn remove_item(&mut self, product_id: &ProductId) {
        self.dispatch(CartAction::Remove {
            product_id: product_id.clone(),
        });
    }

    /// Remove every line. Marks the cart dirty even if it was already empty.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.dispatch(CartAction::Clear);
    }

    // =========================================================================
    // Saving
    // =========================================================================

    /// Enter the saving state and capture the lines to send.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::SaveInFlight`] if an earlier request has not been
    /// finished yet.
    pub fn begin_save(&mut self) -> Result<SaveRequest<R>, SyncError> {
        self.sync.begin()?;
        Ok(SaveRequest {
            lines: self.cart.lines().to_vec(),
            remote: Arc::clone(&self.remote),
        })
    }

    /// Apply a remote response and return to idle.
    ///
    /// Success makes the accepted lines the new baseline. Failure rolls the
    /// working state back to the previous baseline (discarding any edits
    /// made while the request was in flight), persists it, and retains the
    /// error message.
    pub fn finish_save(&mut self, response: SaveResponse) -> SaveOutcome {
        debug!(submitted = response.submitted.len(), "Finishing cart save");
        let outcome = self.sync.complete(&mut self.cart, response.result);
        if !outcome.is_saved() {
            self.persist();
        }
        outcome
    }

    /// Save the current lines to the remote store and wait for the answer.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::SaveInFlight`] if a split-form save started with
    /// [`begin_save`](Self::begin_save) is still unfinished. Remote failures
    /// are not errors here; they come back as [`SaveOutcome::Failed`].
    #[instrument(skip(self), fields(lines = self.cart.lines().len()))]
    pub async fn save(&mut self) -> Result<SaveOutcome, SyncError> {
        let request = self.begin_save()?;
        let response = request.send().await;
        Ok(self.finish_save(response))
    }

    /// Forget the last save error.
    pub fn clear_error(&mut self) {
        self.sync.clear_error();
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Working lines.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    /// Lines last confirmed by the remote store (or restored at startup).
    #[must_use]
    pub fn last_saved(&self) -> &[CartLine] {
        self.cart.last_saved()
    }

    /// Sum of quantities.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.cart.total_item_count()
    }

    /// Sum of `price * quantity`, in cents.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.cart.subtotal()
    }

    /// Whether a save is in flight.
    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.sync.is_saving()
    }

    /// Message of the last failed save, until cleared.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.sync.last_error()
    }

    /// Whether there are local edits since the last save or rollback.
    #[must_use]
    pub const fn has_unsaved_changes(&self) -> bool {
        self.cart.has_unsaved_changes()
    }

    /// The remote store.
    ///
    /// Its `load` endpoint is not used when the session starts; the cart is
    /// restored from local storage only.
    #[must_use]
    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// The durable storage backend.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Name of the storage slot holding the snapshot.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::cart::remote::{RemoteConfig, SimulatedRemoteStore};
    use crate::storage::{MemoryStorage, StorageError};

    const KEY: &str = CART_STORAGE_KEY;

    fn alpha() -> Product {
        Product::new("a", "Alpha", Price::from_cents(1000))
    }

    fn beta() -> Product {
        Product::new("b", "Beta", Price::from_cents(250))
    }

    fn session(
        config: RemoteConfig,
        storage: MemoryStorage,
    ) -> CartSession<SimulatedRemoteStore, MemoryStorage> {
        CartSession::new(SimulatedRemoteStore::new(config), storage, KEY)
    }

    fn stored(session: &CartSession<SimulatedRemoteStore, MemoryStorage>) -> Vec<CartLine> {
        snapshot::decode(session.storage().get(KEY).unwrap()).unwrap()
    }

    /// Storage whose writes always fail.
    #[derive(Debug, Default)]
    struct BrokenStorage;

    impl SnapshotStorage for BrokenStorage {
        fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::InvalidKey("broken".to_string()))
        }

        fn write(&mut self, _key: &str, _contents: &str) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey("broken".to_string()))
        }
    }

    #[test]
    fn test_starts_empty_without_snapshot() {
        let session = session(RemoteConfig::reliable(), MemoryStorage::default());
        assert!(session.lines().is_empty());
        assert!(!session.has_unsaved_changes());
        assert!(!session.is_saving());
        assert_eq!(session.last_error(), None);
        assert_eq!(session.storage_key(), "shopify-cart");
    }

    #[test]
    fn test_restores_snapshot_as_working_and_baseline() {
        let lines = vec![CartLine::new(alpha(), 3)];
        let storage = MemoryStorage::with_slot(KEY, snapshot::encode(&lines).unwrap());

        let session = session(RemoteConfig::reliable(), storage);

        assert_eq!(session.lines(), lines.as_slice());
        assert_eq!(session.last_saved(), lines.as_slice());
        assert!(!session.has_unsaved_changes());
        assert_eq!(session.total_item_count(), 3);
    }

    #[test]
    fn test_corrupt_snapshot_starts_empty_and_is_replaced() {
        let storage = MemoryStorage::with_slot(KEY, "{definitely not json");
        let session = session(RemoteConfig::reliable(), storage);

        assert!(session.lines().is_empty());
        assert!(!session.has_unsaved_changes());
        assert_eq!(session.storage().get(KEY), Some("[]"));
    }

    #[test]
    fn test_storage_failures_are_not_surfaced() {
        let mut session = CartSession::new(
            SimulatedRemoteStore::new(RemoteConfig::reliable()),
            BrokenStorage,
            KEY,
        );
        session.add_item(alpha(), 1);
        assert_eq!(session.total_item_count(), 1);
        assert_eq!(session.last_error(), None);
    }

    #[test]
    fn test_every_mutation_persists() {
        let mut session = session(RemoteConfig::reliable(), MemoryStorage::default());

        session.add_item(alpha(), 1);
        assert_eq!(stored(&session), session.lines());

        session.add_item(beta(), 2);
        assert_eq!(stored(&session), session.lines());

        session.update_quantity(&ProductId::from("b"), 5);
        assert_eq!(stored(&session)[1].quantity, 5);

        session.remove_item(&ProductId::from("a"));
        assert_eq!(stored(&session).len(), 1);

        session.clear();
        assert!(stored(&session).is_empty());
        assert!(session.has_unsaved_changes());
    }

    #[test]
    fn test_scenario_from_empty() {
        let mut session = session(RemoteConfig::reliable(), MemoryStorage::default());
        session.add_item(alpha(), 1);
        session.add_item(alpha(), 1);

        assert_eq!(session.lines().len(), 1);
        assert_eq!(session.lines()[0].quantity, 2);
        assert_eq!(session.subtotal().cents(), 2000);
        assert_eq!(session.subtotal().display(), "$20.00");

        session.update_quantity(&ProductId::from("a"), 0);
        assert!(session.lines().is_empty());
    }

    #[tokio::test]
    async fn test_successful_save_clears_dirty() {
        let mut session = session(RemoteConfig::reliable(), MemoryStorage::default());
        session.add_item(alpha(), 2);
        let at_save = session.lines().to_vec();

        let outcome = session.save().await.unwrap();

        assert_eq!(outcome, SaveOutcome::Saved(at_save.clone()));
        assert!(!session.has_unsaved_changes());
        assert!(!session.is_saving());
        assert_eq!(session.last_saved(), at_save.as_slice());
        assert_eq!(session.remote().load().await.unwrap(), at_save);
    }

    #[tokio::test]
    async fn test_failed_save_rolls_back() {
        let baseline = vec![CartLine::new(alpha(), 1)];
        let storage = MemoryStorage::with_slot(KEY, snapshot::encode(&baseline).unwrap());
        let mut session = session(RemoteConfig::failing(), storage);

        session.add_item(beta(), 4);
        session.update_quantity(&ProductId::from("a"), 9);

        let outcome = session.save().await.unwrap();

        assert!(!outcome.is_saved());
        assert_eq!(session.lines(), baseline.as_slice());
        assert!(!session.has_unsaved_changes());
        assert_eq!(session.last_error(), Some("Network error: Failed to save cart"));
        assert_eq!(stored(&session), baseline);

        session.clear_error();
        assert_eq!(session.last_error(), None);
        assert_eq!(session.lines(), baseline.as_slice());
    }

    #[tokio::test]
    async fn test_save_captures_lines_at_request_time() {
        let mut session = session(RemoteConfig::reliable(), MemoryStorage::default());
        session.add_item(alpha(), 1);

        let request = session.begin_save().unwrap();
        assert!(session.is_saving());
        let in_flight = request.send();

        // Edit while the request is pending.
        session.add_item(beta(), 1);
        assert!(matches!(session.begin_save(), Err(SyncError::SaveInFlight)));

        let response = in_flight.await;
        assert_eq!(response.submitted(), &[CartLine::new(alpha(), 1)]);
        let outcome = session.finish_save(response);

        assert_eq!(outcome, SaveOutcome::Saved(vec![CartLine::new(alpha(), 1)]));
        assert_eq!(session.last_saved(), &[CartLine::new(alpha(), 1)]);
        assert_eq!(session.lines().len(), 2);
        assert!(!session.has_unsaved_changes());
        assert!(!session.is_saving());

        session.update_quantity(&ProductId::from("b"), 3);
        assert!(session.has_unsaved_changes());
    }

    #[tokio::test]
    async fn test_failed_save_discards_interleaved_edits() {
        let mut session = session(RemoteConfig::failing(), MemoryStorage::default());
        session.add_item(alpha(), 1);

        let request = session.begin_save().unwrap();
        session.add_item(beta(), 1);
        let response = request.send().await;
        session.finish_save(response);

        assert!(session.lines().is_empty());
        assert!(stored(&session).is_empty());
        assert!(session.last_error().is_some());
    }

    #[tokio::test]
    async fn test_overlapping_save_is_refused() {
        let mut session = session(RemoteConfig::reliable(), MemoryStorage::default());
        let _request = session.begin_save().unwrap();
        assert_eq!(session.save().await, Err(SyncError::SaveInFlight));
    }

    #[tokio::test]
    async fn test_new_save_clears_previous_error() {
        let mut session = session(RemoteConfig::failing(), MemoryStorage::default());
        session.save().await.unwrap();
        assert!(session.last_error().is_some());

        let _request = session.begin_save().unwrap();
        assert_eq!(session.last_error(), None);
    }
}
