use tracing::{debug, warn};

use crate::errors::MemoryResult;
use crate::kv::KeyValueStoreRef;
use crate::record::MemoryRecord;

/// Key holding the rolling context summary
pub const CONTEXT_KEY: &str = "jarvis_persistent_context";
/// Key holding the JSON array of facts
pub const FACTS_KEY: &str = "jarvis_facts";

/// Reads and writes the memory record through a key/value store
#[derive(Debug, Clone)]
pub struct MemoryStore {
    kv: KeyValueStoreRef,
}

impl MemoryStore {
    pub fn new(kv: KeyValueStoreRef) -> Self {
        Self { kv }
    }

    /// Loads the full record
    pub async fn load(&self) -> MemoryResult<MemoryRecord> {
        let context = self.context().await?;
        let facts = self.facts().await?;
        Ok(MemoryRecord::new(context, facts))
    }

    /// The stored context summary, if any
    pub async fn context(&self) -> MemoryResult<Option<String>> {
        Ok(self.kv.get(CONTEXT_KEY).await?.filter(|c| !c.is_empty()))
    }

    /// Replaces the context summary wholesale
    pub async fn save_context(&self, context: &str) -> MemoryResult<()> {
        self.kv.set(CONTEXT_KEY, context.to_string()).await?;
        debug!(len = context.len(), "Saved memory context");
        Ok(())
    }

    /// The stored facts. A value that fails to parse reads as no facts.
    pub async fn facts(&self) -> MemoryResult<Vec<String>> {
        let Some(raw) = self.kv.get(FACTS_KEY).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(facts) => Ok(facts),
            Err(e) => {
                warn!(error = %e, "Stored facts are not a JSON string array, ignoring them");
                Ok(Vec::new())
            }
        }
    }

    /// Persists a fact unless an identical one is already stored.
    /// Returns whether the fact was added.
    pub async fn add_fact(&self, fact: &str) -> MemoryResult<bool> {
        let mut record = MemoryRecord::new(None, self.facts().await?);
        if !record.add_fact(fact) {
            debug!(fact, "Fact already known");
            return Ok(false);
        }
        let serialized = serde_json::to_string(record.facts())?;
        self.kv.set(FACTS_KEY, serialized).await?;
        Ok(true)
    }

    /// Forgets both the context summary and all facts
    pub async fn clear(&self) -> MemoryResult<()> {
        self.kv.remove(CONTEXT_KEY).await?;
        self.kv.remove(FACTS_KEY).await?;
        debug!("Cleared memory");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{InMemoryKeyValueStore, KeyValueStore};
    use std::sync::Arc;

    fn store() -> (MemoryStore, InMemoryKeyValueStore) {
        let kv = InMemoryKeyValueStore::new();
        (MemoryStore::new(Arc::new(kv.clone())), kv)
    }

    #[tokio::test]
    async fn test_empty_store_loads_empty_record() {
        let (memory, _) = store();
        assert_eq!(memory.load().await.unwrap(), MemoryRecord::default());
    }

    #[tokio::test]
    async fn test_context_is_replaced_wholesale() {
        let (memory, _) = store();
        memory.save_context("first summary").await.unwrap();
        memory.save_context("second summary").await.unwrap();
        assert_eq!(
            memory.context().await.unwrap().as_deref(),
            Some("second summary")
        );
    }

    #[tokio::test]
    async fn test_add_fact_persists_without_duplicates() {
        let (memory, kv) = store();
        assert!(memory.add_fact("Name is Tony").await.unwrap());
        assert!(memory.add_fact("Drinks espresso").await.unwrap());
        assert!(!memory.add_fact("Name is Tony").await.unwrap());

        assert_eq!(
            kv.get(FACTS_KEY).await.unwrap().as_deref(),
            Some(r#"["Name is Tony","Drinks espresso"]"#)
        );
    }

    #[tokio::test]
    async fn test_corrupt_facts_read_as_empty() {
        let (memory, kv) = store();
        kv.set(FACTS_KEY, "{\"oops\": 1}".to_string()).await.unwrap();
        assert!(memory.facts().await.unwrap().is_empty());

        // Adding a fact overwrites the corrupt value
        assert!(memory.add_fact("Fresh start").await.unwrap());
        assert_eq!(memory.facts().await.unwrap(), vec!["Fresh start".to_string()]);
    }

    #[tokio::test]
    async fn test_clear_removes_both_keys() {
        let (memory, kv) = store();
        memory.save_context("summary").await.unwrap();
        memory.add_fact("fact").await.unwrap();

        memory.clear().await.unwrap();
        assert!(kv.is_empty());
        assert!(memory.load().await.unwrap().is_empty());
    }
}
