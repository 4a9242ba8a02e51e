use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::JarvisConfig;
use crate::errors::{JarvisError, JarvisResult};
use crate::types::*;

/// A chat-completion capability: system prompt + turns in, reply text out.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> JarvisResult<String>;

    /// Provider name used in logs
    fn provider_name(&self) -> &'static str;
}

/// Shared handle to a completion capability
pub type CompletionClientRef = Arc<dyn CompletionClient>;

/// Client for the Groq OpenAI-compatible chat-completions API
#[derive(Debug, Clone)]
pub struct GroqClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GroqClient {
    /// Create a new Groq API client
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> JarvisResult<Self> {
        Self::with_timeout(api_key, base_url, Duration::from_secs(60))
    }

    pub fn with_timeout(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> JarvisResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(JarvisError::MissingApiKey("Groq client".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| JarvisError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Builds a client from a key and the shared connection settings in `config`
    pub fn from_config(api_key: Option<&str>, config: &JarvisConfig) -> JarvisResult<Self> {
        let api_key =
            api_key.ok_or_else(|| JarvisError::MissingApiKey("Groq client".to_string()))?;
        Self::with_timeout(
            api_key,
            config.base_url(),
            Duration::from_secs(config.request_timeout_secs()),
        )
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Send a raw chat-completion request
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> JarvisResult<ChatCompletionResponse> {
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| JarvisError::Transport(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.map_err(|e| {
                JarvisError::Transport(format!("Failed to read error response: {}", e))
            })?;
            return Err(status_error(status, &error_body));
        }

        response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| JarvisError::Parsing(format!("Failed to parse response: {}", e)))
    }
}

/// Maps a non-success status and its body to an error
fn status_error(status: StatusCode, body: &str) -> JarvisError {
    let message = serde_json::from_str::<ApiErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => JarvisError::Auth(message),
        _ => JarvisError::Http {
            status_code: status.as_u16(),
            message,
        },
    }
}

/// Extracts the first choice's text from a response
pub fn extract_text_from_response(response: &ChatCompletionResponse) -> JarvisResult<String> {
    response
        .choices
        .first()
        .and_then(|choice| choice.message.content.clone())
        .filter(|text| !text.trim().is_empty())
        .ok_or(JarvisError::EmptyResponse)
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(&self, request: CompletionRequest) -> JarvisResult<String> {
        debug!(
            model = %request.options.model,
            turns = request.turns.len(),
            json_output = request.options.json_output,
            "Sending chat completion"
        );
        let body = ChatCompletionRequest::from(request);
        let response = self.chat_completion(&body).await?;
        if let Some(usage) = &response.usage {
            debug!(total_tokens = usage.total_tokens, "Chat completion finished");
        }
        extract_text_from_response(&response)
    }

    fn provider_name(&self) -> &'static str {
        "groq"
    }
}
