use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use jarvis_core::client::CompletionClient;
use jarvis_core::errors::JarvisResult;
use jarvis_core::types::CompletionRequest;
use jarvis_memory::{InMemoryKeyValueStore, MemoryStore};

type Responder = dyn Fn(&CompletionRequest) -> (Duration, JarvisResult<String>) + Send + Sync;

/// Completion client driven by a closure; records every request it sees
pub struct FakeClient {
    respond: Box<Responder>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeClient {
    pub fn new(
        respond: impl Fn(&CompletionRequest) -> (Duration, JarvisResult<String>) + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            respond: Box::new(respond),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Always answers `reply` immediately
    pub fn replying(reply: &str) -> Arc<Self> {
        let reply = reply.to_string();
        Self::new(move |_| (Duration::ZERO, Ok(reply.clone())))
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionClient for FakeClient {
    async fn complete(&self, request: CompletionRequest) -> JarvisResult<String> {
        let (delay, reply) = (self.respond)(&request);
        self.requests.lock().unwrap().push(request);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        reply
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

pub fn memory_store() -> MemoryStore {
    MemoryStore::new(Arc::new(InMemoryKeyValueStore::new()))
}
