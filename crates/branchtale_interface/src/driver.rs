//! Trait definition for LLM backends.

use async_trait::async_trait;
use branchtale_core::{GenerateRequest, GenerateResponse};
use branchtale_error::BranchtaleResult;

/// Core trait that all LLM backends must implement.
///
/// A single request produces a single complete response. Streaming and
/// retries are not part of the contract.
#[async_trait]
pub trait StoryDriver: Send + Sync {
    /// Generate model output for a request.
    async fn generate(&self, req: &GenerateRequest) -> BranchtaleResult<GenerateResponse>;

    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gpt-4o-mini").
    fn model_name(&self) -> &str;
}
