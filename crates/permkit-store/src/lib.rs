//! # Permkit Store
//!
//! Storage abstraction for permkit holders.
//!
//! ## Key Types
//!
//! - [`HolderStorage`] - The async trait callers use to persist holders
//! - [`MemoryStorage`] - In-memory storage for tests
//! - [`HolderSnapshot`] - A CBOR-encodable copy of a holder's nodes
//!
//! ## Design Notes
//!
//! - **Save after mutate**: the mutation engine never persists. Callers save
//!   after a successful mutation, outside the holder's lock.
//! - **Whole-holder snapshots**: a save replaces the previous snapshot.

pub mod error;
pub mod memory;
pub mod snapshot;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStorage;
pub use snapshot::HolderSnapshot;
pub use traits::{HolderStorage, HolderStorageExt};
