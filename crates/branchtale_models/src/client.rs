use crate::{convert, ChatCompletionRequest, ChatCompletionResponse, ProviderConfig};
use async_trait::async_trait;
use branchtale_core::{GenerateRequest, GenerateResponse};
use branchtale_error::{BranchtaleResult, ProviderError, ProviderErrorKind};
use branchtale_interface::StoryDriver;
use tracing::instrument;

/// Client for an OpenAI-compatible chat completions server
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Create a new client
    #[instrument(skip(config), fields(base_url = %config.base_url, model = %config.model))]
    pub fn new(config: ProviderConfig) -> Self {
        tracing::debug!("Creating provider client");
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Create a client that shares an existing connection pool
    pub fn with_http_client(config: ProviderConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Get the provider configuration
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Send a chat completion request
    #[instrument(skip(self, request), fields(model = %request.model()))]
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ProviderError> {
        let url = self.config.completions_url();
        tracing::debug!("Sending chat completion request to {}", url);

        let mut req = self
            .client
            .post(&url)
            .json(request)
            .header("Content-Type", "application/json");

        if let Some(api_key) = &self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req.send().await.map_err(|e| {
            tracing::error!("Request failed: {}", e);
            ProviderError::new(ProviderErrorKind::Http(format!("Request failed: {}", e)))
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), "Provider returned error");
            return Err(ProviderError::new(ProviderErrorKind::Api {
                status: status.as_u16(),
                message,
            }));
        }

        let result = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse response: {}", e);
            ProviderError::new(ProviderErrorKind::Deserialization(format!(
                "Failed to parse response: {}",
                e
            )))
        })?;

        tracing::debug!("Chat completion successful");
        Ok(result)
    }
}

#[async_trait]
impl StoryDriver for OpenAiClient {
    #[instrument(skip(self, req), fields(provider = "openai", model = %self.config.model))]
    async fn generate(&self, req: &GenerateRequest) -> BranchtaleResult<GenerateResponse> {
        let chat_request = convert::to_chat_request(req, &self.config.model)?;
        let response = self.chat_completion(&chat_request).await?;
        Ok(convert::from_chat_response(response)?)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
