//! Shopping cart.
//!
//! # Architecture
//!
//! - [`store`] - In-memory working lines plus the last-saved baseline
//! - [`remote`] - Remote save/load contract and a simulated implementation
//! - [`sync`] - `Idle`/`Saving` state machine with rollback on failure
//! - [`snapshot`] - JSON format of the durable snapshot
//! - [`session`] - Composition root: restore on start, persist on change, save on demand
//!
//! Data flow: mutation → [`LocalCart`] marks dirty → [`CartSession`] writes
//! the snapshot → explicit save → [`RemoteCartStore`] → commit or rollback.

pub mod remote;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod sync;

pub use remote::{RemoteCartStore, RemoteConfig, RemoteError, SimulatedRemoteStore};
pub use session::{CART_STORAGE_KEY, CartSession, SaveRequest, SaveResponse};
pub use snapshot::SnapshotError;
pub use store::{CartAction, LocalCart};
pub use sync::{CartSynchronizer, SaveOutcome, SaveState, SyncError};
