//! Per-session conversation state
//!
//! A `Session` owns the transcript of the current conversation. The
//! transcript is append-only and lives in memory only; long-lived context
//! goes through the memory store instead.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jarvis_core::types::{ChatMessage, ChatRole};
use serde::Serialize;
use uuid::Uuid;

/// Speaker of a transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl From<Role> for ChatRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => ChatRole::User,
            Role::Assistant => ChatRole::Assistant,
        }
    }
}

/// One entry in the transcript
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content.into(), false)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content.into(), false)
    }

    /// Assistant message flagged as a failure notice
    pub fn error(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content.into(), true)
    }

    fn new(role: Role, content: String, is_error: bool) -> Self {
        Self {
            role,
            content,
            timestamp: Utc::now(),
            is_error,
        }
    }

    pub fn to_chat_message(&self) -> ChatMessage {
        ChatMessage {
            role: self.role.into(),
            content: self.content.clone(),
        }
    }
}

/// Counters kept for the status line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    /// Successful generator round trips
    pub generations: u64,
    /// Latency of the most recent successful turn
    pub last_latency: Option<Duration>,
}

/// Session data structure
#[derive(Debug, Clone)]
pub struct Session {
    /// Unique session identifier
    pub id: String,
    transcript: Vec<Message>,
    pub stats: SessionStats,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a new session with a random ID
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            transcript: Vec::new(),
            stats: SessionStats::default(),
        }
    }

    /// Appends a message and returns the new transcript length
    pub fn push(&mut self, message: Message) -> usize {
        self.transcript.push(message);
        self.transcript.len()
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn len(&self) -> usize {
        self.transcript.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.transcript.last()
    }

    /// The most recent `count` messages, oldest first
    pub fn recent(&self, count: usize) -> &[Message] {
        let start = self.transcript.len().saturating_sub(count);
        &self.transcript[start..]
    }

    /// Transcript in wire form for the generator
    pub fn chat_history(&self) -> Vec<ChatMessage> {
        self.transcript.iter().map(Message::to_chat_message).collect()
    }
}
