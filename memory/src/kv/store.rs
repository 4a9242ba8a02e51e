use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::MemoryResult;

/// Trait defining the interface for string key/value stores
#[async_trait]
pub trait KeyValueStore: Send + Sync + Debug {
    /// Get a value by key, `None` when absent
    async fn get(&self, key: &str) -> MemoryResult<Option<String>>;

    /// Insert or replace a value
    async fn set(&self, key: &str, value: String) -> MemoryResult<()>;

    /// Remove a key. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> MemoryResult<()>;
}

/// Type alias for Arc-wrapped KeyValueStore trait objects
pub type KeyValueStoreRef = Arc<dyn KeyValueStore>;
