//! Conversion between Branchtale and chat completion types

use crate::{ChatCompletionRequest, ChatCompletionRequestBuilder, ChatCompletionResponse, ChatMessage};
use branchtale_core::{GenerateRequest, GenerateResponse, Output};
use branchtale_error::{ProviderError, ProviderErrorKind};

/// Convert a GenerateRequest to a ChatCompletionRequest.
///
/// The request's own model wins over `default_model`.
#[tracing::instrument(skip(request), fields(messages = request.messages().len()))]
pub fn to_chat_request(
    request: &GenerateRequest,
    default_model: &str,
) -> Result<ChatCompletionRequest, ProviderError> {
    let messages: Vec<ChatMessage> = request
        .messages()
        .iter()
        .map(|m| ChatMessage::new(m.role.to_string(), m.content.clone()))
        .collect();

    if messages.is_empty() {
        return Err(ProviderError::new(ProviderErrorKind::InvalidRequest(
            "Request must contain at least one message".into(),
        )));
    }

    let model = request
        .model()
        .clone()
        .unwrap_or_else(|| default_model.to_string());

    ChatCompletionRequestBuilder::default()
        .model(model)
        .messages(messages)
        .max_tokens(*request.max_tokens())
        .temperature(*request.temperature())
        .stream(Some(false))
        .build()
        .map_err(|e| {
            ProviderError::new(ProviderErrorKind::InvalidRequest(format!(
                "Failed to build request: {}",
                e
            )))
        })
}

/// Convert a ChatCompletionResponse to a GenerateResponse.
///
/// The first choice is used; a missing or empty message is an error.
#[tracing::instrument(skip(response), fields(choices = response.choices().len()))]
pub fn from_chat_response(
    response: ChatCompletionResponse,
) -> Result<GenerateResponse, ProviderError> {
    let text = response
        .choices()
        .first()
        .and_then(|choice| choice.message().content().clone())
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| ProviderError::new(ProviderErrorKind::EmptyResponse))?;

    if let Some(usage) = response.usage() {
        tracing::debug!(
            prompt_tokens = usage.prompt_tokens(),
            completion_tokens = usage.completion_tokens(),
            "Token usage"
        );
    }

    Ok(GenerateResponse {
        outputs: vec![Output::Text(text)],
    })
}
