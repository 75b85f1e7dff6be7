//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the branchtale binary.

mod commands;
mod handlers;

pub use commands::{Cli, Commands, StoreKind};
pub use handlers::create_story;
#[cfg(feature = "database")]
pub use handlers::{show_job, show_session, show_story};
