//! Key/value persistence for memory records
//!
//! `KeyValueStore` is the narrow storage seam the memory store is written
//! against. Adapters provide a process-local map and a JSON file on disk.

pub mod adapters;
pub mod store;

pub use adapters::{FileKeyValueStore, InMemoryKeyValueStore};
pub use store::{KeyValueStore, KeyValueStoreRef};
