use jarvis_core::client::CompletionClientRef;
use jarvis_core::types::{ChatMessage, CompletionOptions, CompletionRequest};
use tracing::{error, instrument};

pub const OFFLINE_ANALYSIS_TEXT: &str = "Sir, the neural link is offline. Please check your API key.";
pub const FAILED_ANALYSIS_TEXT: &str =
    "Sir, I've encountered a glitch in the spectral analysis. Please try again.";
pub const OFFLINE_EXPLANATION_TEXT: &str = "Neural link offline.";
pub const FAILED_EXPLANATION_TEXT: &str = "Explanation protocol failed.";

const ANALYSIS_TEMPERATURE: f32 = 0.3;

/// What the code assistant should focus on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisMode {
    Debug,
    Optimize,
    /// Free-form instruction from the user
    Custom(String),
}

impl AnalysisMode {
    fn directive(&self) -> String {
        match self {
            AnalysisMode::Debug => "Solve bugs and explain fixes.".to_string(),
            AnalysisMode::Optimize => "Optimize performance and readability.".to_string(),
            AnalysisMode::Custom(instruction) => format!("CUSTOM: {}", instruction),
        }
    }
}

fn analysis_prompt(mode: &AnalysisMode) -> String {
    format!(
        "You are J.A.R.V.I.S., an advanced AI assistant working in the code workspace.
Mode: {}

Guidelines:
- Your tone is witty, sophisticated, and helpful.
- Provide code snippets in Markdown.
- Be extremely precise.
- Focus on the best engineering practices.",
        mode.directive()
    )
}

/// One-shot code analysis and explanation, independent of the chat transcript.
///
/// Both operations always return displayable text; failures are logged and
/// replaced with a fixed notice.
#[derive(Clone)]
pub struct CodeAssistant {
    client: Option<CompletionClientRef>,
    model: String,
    fast_model: String,
}

impl CodeAssistant {
    pub fn new(
        client: Option<CompletionClientRef>,
        model: impl Into<String>,
        fast_model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            fast_model: fast_model.into(),
        }
    }

    #[instrument(skip(self, code), fields(code_len = code.len()))]
    pub async fn analyze(&self, code: &str, mode: &AnalysisMode) -> String {
        let Some(client) = &self.client else {
            return OFFLINE_ANALYSIS_TEXT.to_string();
        };

        let request = CompletionRequest::new(
            analysis_prompt(mode),
            vec![ChatMessage::user(format!(
                "Here is my code for analysis:\n\n{}",
                code
            ))],
            CompletionOptions::new(&self.model).with_temperature(ANALYSIS_TEMPERATURE),
        );

        match client.complete(request).await {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "Code analysis failed");
                FAILED_ANALYSIS_TEXT.to_string()
            }
        }
    }

    #[instrument(skip(self, code), fields(code_len = code.len()))]
    pub async fn explain(&self, code: &str) -> String {
        let Some(client) = &self.client else {
            return OFFLINE_EXPLANATION_TEXT.to_string();
        };

        let request = CompletionRequest::new(
            "You are JARVIS. Explain this code simply but technically.",
            vec![ChatMessage::user(code)],
            CompletionOptions::new(&self.fast_model),
        );

        match client.complete(request).await {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "Code explanation failed");
                FAILED_EXPLANATION_TEXT.to_string()
            }
        }
    }
}
