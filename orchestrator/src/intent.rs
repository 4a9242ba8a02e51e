//! Intent classification
//!
//! Each utterance is first sent to a classifier model that must answer with
//! a JSON object `{"action": "...", "payload": "..."}`. The answer is decoded
//! into [`Intent`]; anything that does not fit the schema is rejected and the
//! caller falls back to [`Intent::None`].

use jarvis_core::client::CompletionClientRef;
use jarvis_core::errors::JarvisError;
use jarvis_core::types::{ChatMessage, CompletionOptions, CompletionRequest};
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::prompt::CLASSIFIER_PROMPT;

/// Classified purpose of an utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Plain conversation, handled by the generator
    None,
    /// Open an absolute http(s) URL
    OpenUrl { target: String },
    /// Run a web search
    SearchWeb { query: String },
}

impl Intent {
    /// Wire name of the action
    pub fn action_name(&self) -> &'static str {
        match self {
            Intent::None => "NONE",
            Intent::OpenUrl { .. } => "OPEN_URL",
            Intent::SearchWeb { .. } => "SEARCH_WEB",
        }
    }
}

#[derive(Error, Debug)]
pub enum ClassificationFailure {
    #[error("No classifier configured")]
    Unconfigured,
    #[error("Classifier call failed: {0}")]
    Transport(#[from] JarvisError),
    #[error("Malformed classifier output: {0}")]
    Malformed(String),
}

#[derive(Deserialize)]
struct RawIntent {
    action: String,
    #[serde(default)]
    payload: Option<Value>,
}

/// Decodes classifier output into an [`Intent`], rejecting schema mismatches
pub fn decode_intent(raw: &str) -> Result<Intent, ClassificationFailure> {
    let parsed: RawIntent = serde_json::from_str(raw.trim())
        .map_err(|e| ClassificationFailure::Malformed(format!("not an intent object: {}", e)))?;

    match parsed.action.trim() {
        "NONE" => Ok(Intent::None),
        "OPEN_URL" => {
            let target = payload_text(parsed.payload)?;
            let url = Url::parse(&target).map_err(|e| {
                ClassificationFailure::Malformed(format!("invalid OPEN_URL target {:?}: {}", target, e))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ClassificationFailure::Malformed(format!(
                    "unsupported URL scheme {:?}",
                    url.scheme()
                )));
            }
            Ok(Intent::OpenUrl { target })
        }
        "SEARCH_WEB" => Ok(Intent::SearchWeb {
            query: payload_text(parsed.payload)?,
        }),
        other => Err(ClassificationFailure::Malformed(format!(
            "unknown action {:?}",
            other
        ))),
    }
}

fn payload_text(payload: Option<Value>) -> Result<String, ClassificationFailure> {
    match payload {
        Some(Value::String(text)) if !text.trim().is_empty() => Ok(text),
        Some(other) => Err(ClassificationFailure::Malformed(format!(
            "payload must be a non-empty string, got {}",
            other
        ))),
        None => Err(ClassificationFailure::Malformed(
            "payload missing".to_string(),
        )),
    }
}

/// Sends utterances to the classification capability
#[derive(Clone)]
pub struct IntentClassifier {
    client: Option<CompletionClientRef>,
    model: String,
}

impl IntentClassifier {
    pub fn new(client: Option<CompletionClientRef>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Classifies `text`, surfacing every failure
    pub async fn try_classify(&self, text: &str) -> Result<Intent, ClassificationFailure> {
        let client = self
            .client
            .as_ref()
            .ok_or(ClassificationFailure::Unconfigured)?;

        let request = CompletionRequest::new(
            CLASSIFIER_PROMPT,
            vec![ChatMessage::user(text)],
            CompletionOptions::new(&self.model).with_json_output(),
        );
        let raw = client.complete(request).await?;
        debug!(raw = %raw, "Classifier replied");
        decode_intent(&raw)
    }

    /// Classifies `text`, falling back to [`Intent::None`] on any failure
    pub async fn classify(&self, text: &str) -> Intent {
        match self.try_classify(text).await {
            Ok(intent) => intent,
            Err(ClassificationFailure::Unconfigured) => {
                debug!("No classifier configured, treating utterance as conversation");
                Intent::None
            }
            Err(e) => {
                warn!(error = %e, "Intent classification failed, defaulting to NONE");
                Intent::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedClient;
    use std::sync::Arc;

    #[test]
    fn test_decode_none() {
        assert_eq!(decode_intent(r#"{"action": "NONE"}"#).unwrap(), Intent::None);
        // A stray payload on NONE is harmless
        assert_eq!(
            decode_intent(r#"{"action": "NONE", "payload": null}"#).unwrap(),
            Intent::None
        );
    }

    #[test]
    fn test_decode_open_url() {
        let intent =
            decode_intent(r#"{"action": "OPEN_URL", "payload": "https://github.com"}"#).unwrap();
        assert_eq!(
            intent,
            Intent::OpenUrl {
                target: "https://github.com".to_string()
            }
        );
        assert_eq!(intent.action_name(), "OPEN_URL");
    }

    #[test]
    fn test_decode_keeps_payload_verbatim() {
        let intent =
            decode_intent(r#"{"action": "SEARCH_WEB", "payload": "  rust ownership "}"#).unwrap();
        assert_eq!(
            intent,
            Intent::SearchWeb {
                query: "  rust ownership ".to_string()
            }
        );

        let target = "https://example.com/a b?q=1&r=%20";
        let raw = format!(r#"{{"action": "OPEN_URL", "payload": "{}"}}"#, target);
        assert_eq!(
            decode_intent(&raw).unwrap(),
            Intent::OpenUrl {
                target: target.to_string()
            }
        );
    }

    #[test]
    fn test_decode_rejects_schema_mismatch() {
        let cases = [
            "",
            "not json",
            "[]",
            r#"{"payload": "x"}"#,
            r#"{"action": "LAUNCH_MISSILES", "payload": "x"}"#,
            r#"{"action": "SEARCH_WEB"}"#,
            r#"{"action": "SEARCH_WEB", "payload": "   "}"#,
            r#"{"action": "SEARCH_WEB", "payload": 42}"#,
            r#"{"action": "OPEN_URL", "payload": "github.com"}"#,
            r#"{"action": "OPEN_URL", "payload": "javascript:alert(1)"}"#,
            r#"{"action": "open_url", "payload": "https://github.com"}"#,
        ];
        for case in cases {
            assert!(
                matches!(decode_intent(case), Err(ClassificationFailure::Malformed(_))),
                "expected rejection for {:?}",
                case
            );
        }
    }

    #[tokio::test]
    async fn test_classify_requests_json_output() {
        let client = Arc::new(ScriptedClient::new(vec![Ok(
            r#"{"action": "SEARCH_WEB", "payload": "rust ownership"}"#.to_string(),
        )]));
        let classifier = IntentClassifier::new(Some(client.clone()), "classifier-model");

        let intent = classifier.classify("search for rust ownership").await;
        assert_eq!(
            intent,
            Intent::SearchWeb {
                query: "rust ownership".to_string()
            }
        );

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].options.json_output);
        assert_eq!(requests[0].options.model, "classifier-model");
        assert_eq!(
            requests[0].turns,
            vec![ChatMessage::user("search for rust ownership")]
        );
    }

    #[tokio::test]
    async fn test_classify_fails_open() {
        let client = Arc::new(ScriptedClient::new(vec![
            Err(JarvisError::Transport("connection reset".to_string())),
            Ok("I think you want a search".to_string()),
        ]));
        let classifier = IntentClassifier::new(Some(client), "m");

        assert_eq!(classifier.classify("anything").await, Intent::None);
        assert_eq!(classifier.classify("anything").await, Intent::None);

        let unconfigured = IntentClassifier::new(None, "m");
        assert!(matches!(
            unconfigured.try_classify("hi").await,
            Err(ClassificationFailure::Unconfigured)
        ));
        assert_eq!(unconfigured.classify("hi").await, Intent::None);
    }
}
