//! Command handlers.

use super::StoreKind;
use branchtale::{
    BranchtaleConfig, BranchtaleResult, InMemoryStoryRepository, JobStatus, JsonError,
    OpenAiClient, StoryGenerator, StoryJobRunner, StoryReader, StoryRepository,
};
#[cfg(feature = "database")]
use branchtale::{database_url_from_env, PostgresStoryRepository};
use serde::Serialize;
use std::sync::Arc;

fn print_json<T: Serialize>(value: &T) -> BranchtaleResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| JsonError::new(format!("Failed to render output: {}", e)))?;
    println!("{}", text);
    Ok(())
}

#[cfg(feature = "database")]
fn connect_postgres(config: &BranchtaleConfig) -> BranchtaleResult<PostgresStoryRepository> {
    let url = database_url_from_env(&config.database.url_env)?;
    Ok(PostgresStoryRepository::connect(&url, config.database.pool_size)?)
}

/// Submit a story job, wait for it, and print the job and the story.
///
/// Returns the job's final status.
pub async fn create_story(
    config: &BranchtaleConfig,
    store: StoreKind,
    theme: &str,
    session: Option<String>,
) -> BranchtaleResult<JobStatus> {
    let driver = Arc::new(OpenAiClient::new(config.provider_config()?));

    match store {
        StoreKind::Memory => {
            let repository = Arc::new(InMemoryStoryRepository::new());
            run_to_completion(config, driver, repository, theme, session).await
        }
        #[cfg(feature = "database")]
        StoreKind::Postgres => {
            let repository = Arc::new(connect_postgres(config)?);
            run_to_completion(config, driver, repository, theme, session).await
        }
    }
}

async fn run_to_completion<R>(
    config: &BranchtaleConfig,
    driver: Arc<OpenAiClient>,
    repository: Arc<R>,
    theme: &str,
    session: Option<String>,
) -> BranchtaleResult<JobStatus>
where
    R: StoryRepository + 'static,
{
    let generator = StoryGenerator::new(driver, Arc::clone(&repository))
        .with_prompt(config.story_prompt()?)
        .with_limits(config.tree_limits());
    let runner = StoryJobRunner::new(generator);

    let (job, handle) = runner.submit(theme, session).await?;
    tracing::info!(job_id = %job.job_id(), session_id = %job.session_id(), "Waiting for story");
    if let Err(e) = handle.await {
        tracing::error!(error = %e, "Story task did not finish");
    }

    let reader = StoryReader::new(repository);
    let status = reader.job(job.job_id()).await?;
    print_json(&status)?;

    if status.status == JobStatus::Completed {
        let story = reader.story_for_job(job.job_id()).await?;
        print_json(&story)?;
    }

    Ok(status.status)
}

/// Print a stored job.
#[cfg(feature = "database")]
pub async fn show_job(config: &BranchtaleConfig, job_id: &str) -> BranchtaleResult<()> {
    let reader = StoryReader::new(Arc::new(connect_postgres(config)?));
    print_json(&reader.job(job_id).await?)
}

/// Print every job of a session.
#[cfg(feature = "database")]
pub async fn show_session(config: &BranchtaleConfig, session_id: &str) -> BranchtaleResult<()> {
    let reader = StoryReader::new(Arc::new(connect_postgres(config)?));
    print_json(&reader.session_jobs(session_id).await?)
}

/// Print a stored story with all of its nodes.
#[cfg(feature = "database")]
pub async fn show_story(config: &BranchtaleConfig, story_id: i32) -> BranchtaleResult<()> {
    let reader = StoryReader::new(Arc::new(connect_postgres(config)?));
    print_json(&reader.complete_story(story_id).await?)
}
