//! Persistence layer: the [`Store`] trait and its backends.
//!
//! The contract is coarse: load a whole collection, save a whole
//! collection, delete by id. Consumers recompute everything from the loaded
//! collections on each interaction. `save_*` replaces the entire backing
//! collection (last-writer-wins; concurrent writers are not coordinated).

mod memory;
mod postgres;
mod store;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{SharedStore, Store, StoreError};
