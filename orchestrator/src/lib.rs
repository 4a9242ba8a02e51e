//! Conversation orchestration for J.A.R.V.I.S
//!
//! The [`Orchestrator`] takes one utterance at a time: it classifies the
//! intent, either emits a side effect (open a link, run a web search) or asks
//! the generator for a reply, appends everything to the session transcript,
//! and periodically compresses the transcript into long-lived memory.

pub mod actions;
pub mod code_assist;
pub mod intent;
pub mod orchestrator;
pub mod prompt;
pub mod session;
pub mod summarizer;

#[cfg(test)]
pub(crate) mod testing;

pub use actions::SideEffect;
pub use code_assist::{AnalysisMode, CodeAssistant};
pub use intent::{ClassificationFailure, Intent, IntentClassifier};
pub use orchestrator::{
    Capabilities, GenerationFailure, Orchestrator, OrchestratorSettings, TurnOutcome,
    GENERATION_ERROR_TEXT,
};
pub use session::{Message, Role, Session, SessionStats};
pub use summarizer::{SummarizationFailure, Summarizer};
