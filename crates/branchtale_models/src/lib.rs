//! LLM provider integration for Branchtale.
//!
//! Stories are generated through any server that speaks the OpenAI chat
//! completions protocol: OpenAI itself, or a compatible gateway or local
//! inference server.
//!
//! # Example
//!
//! ```no_run
//! use branchtale_core::{GenerateRequest, Message};
//! use branchtale_interface::StoryDriver;
//! use branchtale_models::{OpenAiClient, ProviderConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ProviderConfig::new("https://api.openai.com", "gpt-4o-mini")
//!     .with_api_key(std::env::var("OPENAI_API_KEY")?);
//! let client = OpenAiClient::new(config);
//!
//! let request = GenerateRequest::builder()
//!     .messages(vec![Message::user("Create a story with the theme: pirates")])
//!     .build()?;
//! let response = client.generate(&request).await?;
//! println!("{:?}", response.text());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
mod convert;
mod request;
mod response;

pub use client::OpenAiClient;
pub use config::ProviderConfig;
pub use convert::{from_chat_response, to_chat_request};
pub use request::{
    ChatCompletionRequest, ChatCompletionRequestBuilder, ChatCompletionRequestBuilderError,
    ChatMessage,
};
pub use response::{ChatCompletionResponse, Choice, ChoiceMessage, Usage};
