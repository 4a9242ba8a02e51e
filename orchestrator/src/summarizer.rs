//! Background compression of the transcript into the memory context.
//!
//! Summaries run as detached tasks and may finish out of order. Every
//! summarization takes a ticket when it is started; a summary is written
//! only if its ticket is newer than the last one written, so a slow, older
//! summary can never replace a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use jarvis_core::client::CompletionClientRef;
use jarvis_core::errors::JarvisError;
use jarvis_core::types::{ChatMessage, CompletionOptions, CompletionRequest};
use jarvis_memory::{MemoryStore, MemoryStoreError};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::prompt::SUMMARIZER_PROMPT;
use crate::session::{Message, Role};

#[derive(Error, Debug)]
pub enum SummarizationFailure {
    #[error("No summarizer configured")]
    Unconfigured,
    #[error("Summarizer call failed: {0}")]
    Completion(#[from] JarvisError),
    #[error("Failed to encode transcript: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("Failed to store summary: {0}")]
    Storage(#[from] MemoryStoreError),
}

/// What the summarizer sees of each message
#[derive(Serialize)]
struct TranscriptEntry<'a> {
    role: Role,
    content: &'a str,
}

/// Monotonic ticket dispenser paired with the ticket of the last write
#[derive(Debug, Default)]
struct SequenceGuard {
    next: AtomicU64,
    last_applied: Mutex<u64>,
}

/// Summarization capability bound to the memory store it writes into
#[derive(Clone)]
pub struct Summarizer {
    client: Option<CompletionClientRef>,
    model: String,
    memory: MemoryStore,
    guard: Arc<SequenceGuard>,
}

impl Summarizer {
    pub fn new(
        client: Option<CompletionClientRef>,
        model: impl Into<String>,
        memory: MemoryStore,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            memory,
            guard: Arc::new(SequenceGuard::default()),
        }
    }

    /// Takes the next ticket. Tickets start at 1 and only grow.
    pub fn issue_ticket(&self) -> u64 {
        self.guard.next.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Asks the summarizer model to compress `entries`
    pub async fn summarize(&self, entries: &[Message]) -> Result<String, SummarizationFailure> {
        let client = self
            .client
            .as_ref()
            .ok_or(SummarizationFailure::Unconfigured)?;

        let payload: Vec<TranscriptEntry<'_>> = entries
            .iter()
            .map(|m| TranscriptEntry {
                role: m.role,
                content: &m.content,
            })
            .collect();
        let request = CompletionRequest::new(
            SUMMARIZER_PROMPT,
            vec![ChatMessage::user(serde_json::to_string(&payload)?)],
            CompletionOptions::new(&self.model),
        );

        let summary = client.complete(request).await?;
        Ok(summary.trim().to_string())
    }

    /// Writes `summary` as the new context unless a newer ticket already
    /// wrote one. Returns whether the summary was stored.
    pub async fn apply(&self, ticket: u64, summary: &str) -> Result<bool, SummarizationFailure> {
        let mut last_applied = self.guard.last_applied.lock().await;
        if ticket <= *last_applied {
            debug!(
                ticket,
                last_applied = *last_applied,
                "Discarding stale summary"
            );
            return Ok(false);
        }
        self.memory.save_context(summary).await?;
        *last_applied = ticket;
        Ok(true)
    }

    /// Summarizes `entries` and stores the result under `ticket`
    #[instrument(skip(self, entries), fields(entries = entries.len()))]
    pub async fn run(&self, ticket: u64, entries: &[Message]) -> Result<bool, SummarizationFailure> {
        let summary = self.summarize(entries).await?;
        let stored = self.apply(ticket, &summary).await?;
        if stored {
            info!(len = summary.len(), "Memory context updated");
        }
        Ok(stored)
    }

    /// Starts a detached summarization of `entries`.
    ///
    /// Failures are logged and leave memory unchanged.
    pub fn spawn(&self, entries: Vec<Message>) -> JoinHandle<()> {
        let ticket = self.issue_ticket();
        let summarizer = self.clone();
        tokio::spawn(async move {
            if let Err(e) = summarizer.run(ticket, &entries).await {
                warn!(ticket, error = %e, "Memory summarization failed");
            }
        })
    }
}
