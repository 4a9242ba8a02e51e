// The jarvis-memory crate keeps the assistant's long-lived memory:
// a rolling context summary plus a list of user facts, persisted in a
// key/value store across sessions.

pub mod errors;
pub mod kv;
mod record;
mod store;

pub use errors::MemoryStoreError;
pub use kv::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, KeyValueStoreRef};
pub use record::MemoryRecord;
pub use store::{MemoryStore, CONTEXT_KEY, FACTS_KEY};
