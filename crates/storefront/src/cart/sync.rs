//! Save state machine.
//!
//! ```text
//! Idle --begin--> Saving --success--> Idle   (baseline := accepted lines)
//!                        --failure--> Idle   (working := baseline, error retained)
//! ```
//!
//! There are no queued saves: `begin` while a save is in flight is refused.

use mini_catalog_core::CartLine;
use thiserror::Error;
use tracing::{info, warn};

use super::remote::RemoteError;
use super::store::LocalCart;

/// Whether a save is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SaveState {
    #[default]
    Idle,
    Saving,
}

/// Result of a completed save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The remote store accepted these lines.
    Saved(Vec<CartLine>),
    /// The save failed with this message; the cart was rolled back.
    Failed(String),
}

impl SaveOutcome {
    /// Whether the save succeeded.
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }
}

/// Errors from driving the state machine out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SyncError {
    /// A save was requested while another was still in flight.
    #[error("A cart save is already in progress")]
    SaveInFlight,
}

/// Tracks save progress and the last save error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSynchronizer {
    state: SaveState,
    last_error: Option<String>,
}

impl CartSynchronizer {
    /// Create an idle synchronizer with no error.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `Saving`, clearing any previous error.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::SaveInFlight`] if a save is already in flight.
    pub fn begin(&mut self) -> Result<(), SyncError> {
        if self.state == SaveState::Saving {
            return Err(SyncError::SaveInFlight);
        }
        self.state = SaveState::Saving;
        self.last_error = None;
        Ok(())
    }

    /// Apply a remote response to `cart` and return to `Idle`.
    ///
    /// On success the accepted lines become the baseline. On failure the
    /// working state is rolled back to the baseline and the error message is
    /// retained until [`clear_error`](Self::clear_error).
    pub fn complete(
        &mut self,
        cart: &mut LocalCart,
        result: Result<Vec<CartLine>, RemoteError>,
    ) -> SaveOutcome {
        if self.state != SaveState::Saving {
            warn!("Save completed without a matching begin");
        }
        self.state = SaveState::Idle;

        match result {
            Ok(accepted) => {
                info!(lines = accepted.len(), "Cart saved");
                cart.commit(accepted.clone());
                SaveOutcome::Saved(accepted)
            }
            Err(err) => {
                let message = err.to_string();
                warn!(error = %message, "Cart save failed, rolling back to last saved state");
                cart.reset_to_last_saved();
                self.last_error = Some(message.clone());
                SaveOutcome::Failed(message)
            }
        }
    }

    /// Forget the retained error. Cart contents are untouched.
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> SaveState {
        self.state
    }

    /// Whether a save is in flight.
    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.state == SaveState::Saving
    }

    /// Message of the last failed save, if not yet cleared.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
