//! Scripted completion client for unit tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use jarvis_core::client::CompletionClient;
use jarvis_core::errors::{JarvisError, JarvisResult};
use jarvis_core::types::CompletionRequest;

/// Replays canned replies in order and records every request.
/// Once the script runs out every call fails with `EmptyResponse`.
pub(crate) struct ScriptedClient {
    replies: Mutex<VecDeque<JarvisResult<String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    pub(crate) fn new(replies: Vec<JarvisResult<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, request: CompletionRequest) -> JarvisResult<String> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(JarvisError::EmptyResponse))
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}
