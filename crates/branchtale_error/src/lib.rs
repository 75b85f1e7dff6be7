//! Error types for Branchtale.
//!
//! This crate provides the foundation error types used throughout the Branchtale workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use branchtale_error::{BranchtaleResult, StoryError, StoryErrorKind};
//!
//! fn load_story() -> BranchtaleResult<String> {
//!     Err(StoryError::new(StoryErrorKind::StoryNotFound(7)))?
//! }
//!
//! match load_story() {
//!     Ok(title) => println!("Got: {}", title),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
#[cfg(feature = "database")]
mod database;
mod error;
mod job;
mod json;
mod provider;
mod story;

pub use config::ConfigError;
#[cfg(feature = "database")]
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{BranchtaleError, BranchtaleErrorKind, BranchtaleResult};
pub use job::{JobError, JobErrorKind};
pub use json::JsonError;
pub use provider::{ProviderError, ProviderErrorKind};
pub use story::{StoryError, StoryErrorKind};
