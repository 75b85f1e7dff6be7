//! Story generation pipeline for Branchtale.
//!
//! This crate turns a theme into a stored choose-your-own-adventure story and
//! serves it back:
//!
//! - **Prompt**: [`StoryPrompt`] renders the generation request
//! - **Parser**: [`parse_story_response`] extracts and validates model output
//! - **Generator**: [`StoryGenerator`] calls the model and saves the tree
//! - **Jobs**: [`StoryJobRunner`] runs each request as a background task
//! - **Retrieval**: [`StoryReader`] and [`assemble_story`] rebuild stored stories
//! - **In-memory storage**: [`InMemoryStoryRepository`] for tests and local runs
//!
//! # Example
//!
//! ```rust,ignore
//! use branchtale_models::{OpenAiClient, ProviderConfig};
//! use branchtale_narrative::{InMemoryStoryRepository, StoryGenerator, StoryJobRunner, StoryReader};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let driver = Arc::new(OpenAiClient::new(ProviderConfig::new("https://api.openai.com", "gpt-4o-mini")));
//! let repository = Arc::new(InMemoryStoryRepository::new());
//! let runner = StoryJobRunner::new(StoryGenerator::new(driver, repository.clone()));
//!
//! let (job, handle) = runner.submit("haunted lighthouse", None).await?;
//! handle.await?;
//!
//! let story = StoryReader::new(repository).story_for_job(job.job_id()).await?;
//! println!("{} has {} nodes", story.title, story.all_nodes.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assembler;
mod extraction;
mod generator;
mod in_memory_repository;
mod parser;
mod prompt;
mod reader;
mod runner;

pub use assembler::assemble_story;
pub use extraction::{extract_json, parse_json};
pub use generator::StoryGenerator;
pub use in_memory_repository::InMemoryStoryRepository;
pub use parser::parse_story_response;
pub use prompt::{
    StoryPrompt, StoryPromptBuilder, StoryPromptBuilderError, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};
pub use reader::StoryReader;
pub use runner::StoryJobRunner;
