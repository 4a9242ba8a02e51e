use serde::{Deserialize, Serialize};

/// Speaker of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single chat message on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }
}

/// Sampling and output options for one completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Ask the API to constrain the reply to a JSON object
    pub json_output: bool,
}

impl CompletionOptions {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: None,
            max_tokens: None,
            json_output: false,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }
}

/// Provider-neutral completion request handed to a `CompletionClient`
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub turns: Vec<ChatMessage>,
    pub options: CompletionOptions,
}

impl CompletionRequest {
    pub fn new(
        system_prompt: impl Into<String>,
        turns: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            turns,
            options,
        }
    }
}

/// Request body for the OpenAI-compatible `/chat/completions` endpoint
#[derive(Serialize, Debug)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl From<CompletionRequest> for ChatCompletionRequest {
    fn from(request: CompletionRequest) -> Self {
        let mut messages = Vec::with_capacity(request.turns.len() + 1);
        if !request.system_prompt.is_empty() {
            messages.push(ChatMessage::system(request.system_prompt));
        }
        messages.extend(request.turns);

        Self {
            model: request.options.model,
            messages,
            temperature: request.options.temperature,
            max_tokens: request.options.max_tokens,
            response_format: request
                .options
                .json_output
                .then(ResponseFormat::json_object),
        }
    }
}

/// Structured output constraint
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self {
            format_type: "json_object".to_string(),
        }
    }
}

/// Response from the `/chat/completions` endpoint
#[derive(Deserialize, Debug, Serialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// Candidate completion
#[derive(Deserialize, Debug, Serialize)]
pub struct Choice {
    pub message: ChoiceMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Deserialize, Debug, Serialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Token accounting reported by the API
#[derive(Deserialize, Debug, Serialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Error body returned by the API on failure
#[derive(Deserialize, Debug)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ApiErrorBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_prepends_system_prompt() {
        let request = CompletionRequest::new(
            "be brief",
            vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")],
            CompletionOptions::new("llama-3.1-8b-instant")
                .with_temperature(0.5)
                .with_max_tokens(1024),
        );

        let body = serde_json::to_value(ChatCompletionRequest::from(request)).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "llama-3.1-8b-instant",
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "hi"},
                    {"role": "assistant", "content": "hello"}
                ],
                "temperature": 0.5,
                "max_tokens": 1024
            })
        );
    }

    #[test]
    fn test_json_output_sets_response_format() {
        let request = CompletionRequest::new(
            "",
            vec![ChatMessage::user("open github")],
            CompletionOptions::new("m").with_json_output(),
        );

        let body = serde_json::to_value(ChatCompletionRequest::from(request)).unwrap();
        assert_eq!(body["response_format"], json!({"type": "json_object"}));
        // Empty system prompt is not sent
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let response: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": [{"message": {}}]})).unwrap();
        assert_eq!(response.choices.len(), 1);
        assert!(response.choices[0].message.content.is_none());
        assert!(response.usage.is_none());
    }
}
