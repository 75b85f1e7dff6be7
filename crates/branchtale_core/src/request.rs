//! Request and response types for LLM generation.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Conversation roles.
///
/// # Examples
///
/// ```
/// use branchtale_core::Role;
///
/// assert_eq!(format!("{}", Role::System), "system");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions for the model
    #[display("system")]
    System,
    /// Human turn
    #[display("user")]
    User,
    /// Model turn
    #[display("assistant")]
    Assistant,
}

/// A text message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender
    pub role: Role,
    /// Message text
    pub content: String,
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Provider-neutral generation request.
///
/// # Examples
///
/// ```
/// use branchtale_core::{GenerateRequest, Message};
///
/// let request = GenerateRequest::builder()
///     .messages(vec![Message::user("Hello!")])
///     .temperature(Some(0.7))
///     .model(Some("gpt-4o-mini".to_string()))
///     .build()
///     .unwrap();
///
/// assert_eq!(request.messages().len(), 1);
/// assert_eq!(*request.max_tokens(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, Getters, Builder)]
#[builder(setter(into))]
pub struct GenerateRequest {
    /// The conversation messages to send
    messages: Vec<Message>,
    /// Maximum number of tokens to generate
    #[builder(default)]
    max_tokens: Option<u32>,
    /// Sampling temperature
    #[builder(default)]
    temperature: Option<f32>,
    /// Model identifier to use
    #[builder(default)]
    model: Option<String>,
}

impl GenerateRequest {
    /// Create a builder.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }
}

/// Output produced by a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Output {
    /// Plain text output
    Text(String),
    /// Structured JSON output from providers with a JSON mode
    Json(serde_json::Value),
}

/// The unified response object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The generated outputs from the model
    pub outputs: Vec<Output>,
}

impl GenerateResponse {
    /// Create a response holding a single text output.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            outputs: vec![Output::Text(text.into())],
        }
    }

    /// Concatenated text of all outputs, or `None` when there is nothing to read.
    ///
    /// JSON outputs are rendered back to text so one parser handles both.
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .outputs
            .iter()
            .map(|output| match output {
                Output::Text(t) => t.clone(),
                Output::Json(v) => v.to_string(),
            })
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_joins_outputs() {
        let response = GenerateResponse {
            outputs: vec![
                Output::Text("{\"a\":".to_string()),
                Output::Text("1}".to_string()),
            ],
        };
        assert_eq!(response.text().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_blank_response_has_no_text() {
        assert_eq!(GenerateResponse::from_text("  \n").text(), None);
        assert_eq!(GenerateResponse { outputs: vec![] }.text(), None);
    }

    #[test]
    fn test_json_output_renders_as_text() {
        let response = GenerateResponse {
            outputs: vec![Output::Json(serde_json::json!({"title": "x"}))],
        };
        assert_eq!(response.text().as_deref(), Some(r#"{"title":"x"}"#));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::system("hi")).unwrap();
        assert_eq!(json, r#"{"role":"system","content":"hi"}"#);
    }
}
