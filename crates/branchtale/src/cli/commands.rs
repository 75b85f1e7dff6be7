//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Branchtale - generate choose-your-own-adventure stories with a language model
#[derive(Parser, Debug)]
#[command(name = "branchtale")]
#[command(about = "Generate choose-your-own-adventure stories with a language model", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Extra configuration file, layered over the defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a story and print the finished job and story as JSON
    Create {
        /// Story theme, e.g. "haunted lighthouse"
        #[arg(long)]
        theme: String,

        /// Session to file the job under; a new one is created if omitted
        #[arg(long)]
        session: Option<String>,

        /// Where to store the story
        #[arg(long, value_enum, default_value = "memory")]
        store: StoreKind,
    },

    /// Show a job's status
    #[cfg(feature = "database")]
    Job {
        /// Job identifier
        job_id: String,
    },

    /// List the jobs of a session
    #[cfg(feature = "database")]
    Jobs {
        /// Session identifier
        session: String,
    },

    /// Print a stored story with all of its nodes
    #[cfg(feature = "database")]
    Story {
        /// Story identifier
        story_id: i32,
    },
}

/// Story stores selectable from the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    /// Process memory, discarded on exit
    Memory,
    /// PostgreSQL, using the configured connection string
    #[cfg(feature = "database")]
    Postgres,
}
