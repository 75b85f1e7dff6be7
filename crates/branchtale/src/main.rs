//! Branchtale CLI binary.
//!
//! This binary provides command-line access to Branchtale's functionality:
//! - Generate a story for a theme
//! - Inspect jobs and sessions
//! - Print stored stories

use branchtale::{init_logging, BranchtaleConfig, JobStatus, LoggingOptions};
use clap::Parser;
use std::process::ExitCode;

mod cli;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, create_story};
    #[cfg(feature = "database")]
    use cli::{show_job, show_session, show_story};

    // Environment first, so .env values reach the configuration layer
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = BranchtaleConfig::load_with(cli.config.as_deref())?;

    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    init_logging(
        &LoggingOptions::default()
            .with_level(level)
            .with_json(cli.json_logs || config.logging.json),
    )?;

    match cli.command {
        Commands::Create {
            theme,
            session,
            store,
        } => {
            let status = create_story(&config, store, &theme, session).await?;
            if status == JobStatus::Failed {
                return Ok(ExitCode::FAILURE);
            }
        }

        #[cfg(feature = "database")]
        Commands::Job { job_id } => {
            show_job(&config, &job_id).await?;
        }

        #[cfg(feature = "database")]
        Commands::Jobs { session } => {
            show_session(&config, &session).await?;
        }

        #[cfg(feature = "database")]
        Commands::Story { story_id } => {
            show_story(&config, story_id).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
