//! Branchtale: choose-your-own-adventure stories from a language model.
//!
//! A theme goes in; a background job asks an OpenAI-compatible model for a
//! nested story, validates it, and stores it as a tree of nodes linked by
//! options. Callers poll the job and then read the whole story back.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use branchtale::{
//!     BranchtaleConfig, InMemoryStoryRepository, OpenAiClient, StoryGenerator, StoryJobRunner,
//!     StoryReader,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BranchtaleConfig::load()?;
//!     let driver = Arc::new(OpenAiClient::new(config.provider_config()?));
//!     let repository = Arc::new(InMemoryStoryRepository::new());
//!
//!     let generator = StoryGenerator::new(driver, repository.clone())
//!         .with_prompt(config.story_prompt()?)
//!         .with_limits(config.tree_limits());
//!     let runner = StoryJobRunner::new(generator);
//!
//!     let (job, handle) = runner.submit("sunken city", None).await?;
//!     handle.await?;
//!
//!     let story = StoryReader::new(repository).story_for_job(job.job_id()).await?;
//!     println!("{}: {} nodes", story.title, story.all_nodes.len());
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `database` (default) - PostgreSQL store
//!
//! # Architecture
//!
//! - `branchtale_error` - Error types
//! - `branchtale_core` - Data model, validation, tree builder
//! - `branchtale_interface` - `StoryDriver` and `StoryRepository` traits
//! - `branchtale_models` - OpenAI-compatible driver
//! - `branchtale_narrative` - Parser, generator, job runner, retrieval
//! - `branchtale_database` - PostgreSQL repository
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod logging;

pub use config::{
    BranchtaleConfig, DatabaseSettings, LoggingSettings, ProviderSettings, TreeSettings,
};
pub use logging::{init_logging, LoggingOptions};

pub use branchtale_core::*;
pub use branchtale_error::*;
pub use branchtale_interface::*;
pub use branchtale_models::*;
pub use branchtale_narrative::*;

#[cfg(feature = "database")]
pub use branchtale_database::{
    database_url_from_env, establish_pool, PgPool, PostgresStoryRepository,
};
