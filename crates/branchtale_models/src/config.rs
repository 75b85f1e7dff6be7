//! Connection settings for an OpenAI-compatible server.

use branchtale_error::{ProviderError, ProviderErrorKind};

/// Connection settings for an OpenAI-compatible server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProviderConfig {
    /// Base URL of the server (e.g., "https://api.openai.com")
    pub base_url: String,
    /// Model used when a request does not name one
    pub model: String,
    /// Bearer token, if the server requires one
    pub api_key: Option<String>,
}

impl ProviderConfig {
    /// Create a configuration without an API key.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: None,
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Read the API key from the named environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderErrorKind::MissingApiKey`] if the variable is unset or empty.
    pub fn with_api_key_from_env(self, var: &str) -> Result<Self, ProviderError> {
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Ok(self.with_api_key(key)),
            _ => Err(ProviderError::new(ProviderErrorKind::MissingApiKey(
                var.to_string(),
            ))),
        }
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_dropped() {
        let config = ProviderConfig::new("http://localhost:8080/", "local");
        assert_eq!(
            config.completions_url(),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_missing_key_variable() {
        let err = ProviderConfig::new("http://x", "m")
            .with_api_key_from_env("BRANCHTALE_TEST_KEY_THAT_IS_NEVER_SET")
            .unwrap_err();
        assert!(matches!(err.kind, ProviderErrorKind::MissingApiKey(_)));
    }
}
