use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::debug;

use crate::errors::{MemoryResult, MemoryStoreError};
use crate::kv::store::KeyValueStore;

/// In-memory implementation of KeyValueStore
#[derive(Debug, Default, Clone)]
pub struct InMemoryKeyValueStore {
    /// Thread-safe storage of entries
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    /// Create a new InMemoryKeyValueStore
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> MemoryResult<Option<String>> {
        let entries = self.entries.read().map_err(|e| {
            MemoryStoreError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> MemoryResult<()> {
        let mut entries = self.entries.write().map_err(|e| {
            MemoryStoreError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        entries.insert(key.to_string(), value);
        debug!(key, "Stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> MemoryResult<()> {
        let mut entries = self.entries.write().map_err(|e| {
            MemoryStoreError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        if entries.remove(key).is_some() {
            debug!(key, "Removed value");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.get("jarvis_facts").await.unwrap(), None);

        store.set("jarvis_facts", "[]".to_string()).await.unwrap();
        assert_eq!(
            store.get("jarvis_facts").await.unwrap(),
            Some("[]".to_string())
        );

        store.set("jarvis_facts", "[\"a\"]".to_string()).await.unwrap();
        assert_eq!(
            store.get("jarvis_facts").await.unwrap(),
            Some("[\"a\"]".to_string())
        );
        assert_eq!(store.len(), 1);

        store.remove("jarvis_facts").await.unwrap();
        assert!(store.is_empty());
        // Removing twice is fine
        store.remove("jarvis_facts").await.unwrap();
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let store = InMemoryKeyValueStore::new();
        let other = store.clone();
        store.set("k", "v".to_string()).await.unwrap();
        assert_eq!(other.get("k").await.unwrap(), Some("v".to_string()));
    }
}
