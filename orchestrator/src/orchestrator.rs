use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use jarvis_core::client::{CompletionClient, CompletionClientRef, GroqClient};
use jarvis_core::config::JarvisConfig;
use jarvis_core::errors::JarvisError;
use jarvis_core::types::{CompletionOptions, CompletionRequest};
use jarvis_memory::{MemoryRecord, MemoryStore};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::actions::{action_notice, side_effect_for, SideEffect};
use crate::intent::{Intent, IntentClassifier};
use crate::prompt::build_system_prompt;
use crate::session::{Message, Session};
use crate::summarizer::Summarizer;

/// Transcript text shown when the generator cannot be reached
pub const GENERATION_ERROR_TEXT: &str = "SYSTEM FAILURE. UNABLE TO CONNECT TO NEURAL NET.";

#[derive(Error, Debug)]
pub enum GenerationFailure {
    #[error("No generator configured: API key missing")]
    MissingCredentials,
    #[error("Generator call failed: {0}")]
    Completion(#[from] JarvisError),
}

impl GenerationFailure {
    /// True when the key is missing or was rejected by the provider
    pub fn is_credential_error(&self) -> bool {
        match self {
            GenerationFailure::MissingCredentials => true,
            GenerationFailure::Completion(e) => e.is_credential_error(),
        }
    }
}

/// The three completion capabilities the orchestrator talks to.
/// A `None` entry means the capability could not be configured.
#[derive(Clone, Default)]
pub struct Capabilities {
    pub classifier: Option<CompletionClientRef>,
    pub generator: Option<CompletionClientRef>,
    pub summarizer: Option<CompletionClientRef>,
}

impl Capabilities {
    /// Builds one Groq client per capability from the configured keys
    pub fn from_config(config: &JarvisConfig) -> Self {
        Self {
            classifier: build_client("classifier", config.classifier_api_key(), config),
            generator: build_client("generator", config.primary_api_key(), config),
            summarizer: build_client("summarizer", config.memory_api_key(), config),
        }
    }
}

fn build_client(
    capability: &str,
    api_key: Option<&str>,
    config: &JarvisConfig,
) -> Option<CompletionClientRef> {
    match GroqClient::from_config(api_key, config) {
        Ok(client) => {
            debug!(capability, provider = client.provider_name(), "Capability ready");
            Some(Arc::new(client))
        }
        Err(e) => {
            warn!(capability, error = %e, "Capability unavailable");
            None
        }
    }
}

/// Models and tuning knobs for one orchestrator
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorSettings {
    pub model: String,
    pub classifier_model: String,
    pub memory_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub summarize_every: usize,
    pub summary_window: usize,
    pub search_url: String,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from_config(&JarvisConfig::default())
    }
}

impl OrchestratorSettings {
    pub fn from_config(config: &JarvisConfig) -> Self {
        Self {
            model: config.model_name().to_string(),
            classifier_model: config.classifier_model().to_string(),
            memory_model: config.memory_model().to_string(),
            temperature: config.temperature(),
            max_tokens: config.max_tokens(),
            summarize_every: config.summarize_every(),
            summary_window: config.summary_window(),
            search_url: config.search_url().to_string(),
        }
    }
}

/// Result of handling one utterance
#[derive(Debug)]
pub struct TurnOutcome {
    pub intent: Intent,
    /// The assistant message appended for this turn
    pub reply: Message,
    pub side_effect: Option<SideEffect>,
    /// Summarizations started during this turn. They run detached; awaiting
    /// them is optional.
    pub summarizations: Vec<JoinHandle<()>>,
}

/// Runs each utterance through classification, generation and memory upkeep
pub struct Orchestrator {
    settings: OrchestratorSettings,
    classifier: IntentClassifier,
    generator: Option<CompletionClientRef>,
    summarizer: Summarizer,
    memory: MemoryStore,
}

impl Orchestrator {
    pub fn new(
        capabilities: Capabilities,
        memory: MemoryStore,
        settings: OrchestratorSettings,
    ) -> Self {
        let classifier =
            IntentClassifier::new(capabilities.classifier, settings.classifier_model.clone());
        let summarizer = Summarizer::new(
            capabilities.summarizer,
            settings.memory_model.clone(),
            memory.clone(),
        );
        Self {
            settings,
            classifier,
            generator: capabilities.generator,
            summarizer,
            memory,
        }
    }

    /// Handles one user utterance. Never fails: generation errors become an
    /// error message in the transcript.
    ///
    /// Summarizations due during the turn start only once the turn has
    /// succeeded; a failed turn leaves memory untouched.
    #[instrument(skip(self, session, text), fields(session_id = %session.id))]
    pub async fn handle_utterance(&self, session: &mut Session, text: &str) -> TurnOutcome {
        let started = Instant::now();

        let user_window = self.append(session, Message::user(text));

        let intent = self.classifier.classify(text).await;
        if let Some(side_effect) = side_effect_for(&intent, &self.settings.search_url) {
            info!(action = intent.action_name(), url = side_effect.url(), "Executing action");
            let reply = Message::assistant(action_notice(&intent));
            let reply_window = self.append(session, reply.clone());
            return TurnOutcome {
                intent,
                reply,
                side_effect: Some(side_effect),
                summarizations: self.start_summaries(user_window.into_iter().chain(reply_window)),
            };
        }

        let (reply, summarizations) = match self.generate(session).await {
            Ok(text) => {
                let latency = started.elapsed();
                session.stats.generations += 1;
                session.stats.last_latency = Some(latency);
                debug!(latency_ms = latency.as_millis() as u64, "Generated reply");
                let reply = Message::assistant(text);
                let reply_window = self.append(session, reply.clone());
                let handles = self.start_summaries(user_window.into_iter().chain(reply_window));
                (reply, handles)
            }
            Err(e) => {
                error!(
                    error = %e,
                    credentials = e.is_credential_error(),
                    "Generation failed"
                );
                if user_window.is_some() {
                    debug!("Skipping memory summarization for failed turn");
                }
                let reply = Message::error(GENERATION_ERROR_TEXT);
                session.push(reply.clone());
                (reply, Vec::new())
            }
        };

        TurnOutcome {
            intent,
            reply,
            side_effect: None,
            summarizations,
        }
    }

    /// Appends a message. When the transcript length reaches a multiple of
    /// `summarize_every` (0 disables it), returns the trailing window to
    /// summarize.
    fn append(&self, session: &mut Session, message: Message) -> Option<Vec<Message>> {
        let len = session.push(message);
        let every = self.settings.summarize_every;
        if every > 0 && len % every == 0 {
            Some(session.recent(self.settings.summary_window).to_vec())
        } else {
            None
        }
    }

    fn start_summaries(
        &self,
        windows: impl IntoIterator<Item = Vec<Message>>,
    ) -> Vec<JoinHandle<()>> {
        windows
            .into_iter()
            .map(|entries| {
                debug!(entries = entries.len(), "Starting memory summarization");
                self.summarizer.spawn(entries)
            })
            .collect()
    }

    async fn generate(&self, session: &Session) -> Result<String, GenerationFailure> {
        let generator = self
            .generator
            .as_ref()
            .ok_or(GenerationFailure::MissingCredentials)?;

        let memory = self.load_memory().await;
        let system_prompt = build_system_prompt(&memory, &Local::now());
        let request = CompletionRequest::new(
            system_prompt,
            session.chat_history(),
            CompletionOptions::new(&self.settings.model)
                .with_temperature(self.settings.temperature)
                .with_max_tokens(self.settings.max_tokens),
        );

        Ok(generator.complete(request).await?)
    }

    async fn load_memory(&self) -> MemoryRecord {
        match self.memory.load().await {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Failed to load memory, continuing without it");
                MemoryRecord::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_failure_credential_classification() {
        assert!(GenerationFailure::MissingCredentials.is_credential_error());
        assert!(GenerationFailure::from(JarvisError::Auth("invalid key".to_string()))
            .is_credential_error());
        assert!(!GenerationFailure::from(JarvisError::Transport("reset".to_string()))
            .is_credential_error());
    }

    #[test]
    fn test_capabilities_without_keys_are_unavailable() {
        let capabilities = Capabilities::from_config(&JarvisConfig::default());
        assert!(capabilities.classifier.is_none());
        assert!(capabilities.generator.is_none());
        assert!(capabilities.summarizer.is_none());
    }
}
