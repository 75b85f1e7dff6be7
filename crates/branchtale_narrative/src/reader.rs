//! Read side: job status and completed stories.

use crate::assemble_story;
use branchtale_core::{CompleteStoryResponse, JobStatus, StoryJob, StoryJobResponse};
use branchtale_error::{BranchtaleResult, StoryError, StoryErrorKind};
use branchtale_interface::StoryRepository;
use std::sync::Arc;
use tracing::instrument;

/// Answers status and retrieval queries against a repository.
#[derive(Debug)]
pub struct StoryReader<R> {
    repository: Arc<R>,
}

impl<R> Clone for StoryReader<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: StoryRepository> StoryReader<R> {
    /// Create a reader over `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Current state of a job.
    #[instrument(skip(self))]
    pub async fn job(&self, job_id: &str) -> BranchtaleResult<StoryJobResponse> {
        Ok(StoryJobResponse::from(&self.load_job(job_id).await?))
    }

    /// Every job a session has submitted, oldest first.
    #[instrument(skip(self))]
    pub async fn session_jobs(&self, session_id: &str) -> BranchtaleResult<Vec<StoryJobResponse>> {
        let jobs = self.repository.list_jobs(session_id).await?;
        Ok(jobs.iter().map(StoryJobResponse::from).collect())
    }

    /// The complete story with every node.
    #[instrument(skip(self))]
    pub async fn complete_story(&self, story_id: i32) -> BranchtaleResult<CompleteStoryResponse> {
        let story = self
            .repository
            .get_story(story_id)
            .await?
            .ok_or_else(|| StoryError::new(StoryErrorKind::StoryNotFound(story_id)))?;
        let nodes = self.repository.list_story_nodes(story_id).await?;
        tracing::debug!(nodes = nodes.len(), "Loaded story nodes");
        Ok(assemble_story(story, nodes)?)
    }

    /// The story a job produced.
    ///
    /// Stories are only served once their job has completed, so a caller
    /// racing the generator never sees a tree that is still being written.
    #[instrument(skip(self))]
    pub async fn story_for_job(&self, job_id: &str) -> BranchtaleResult<CompleteStoryResponse> {
        let job = self.load_job(job_id).await?;
        match (job.status(), job.story_id()) {
            (JobStatus::Completed, Some(story_id)) => self.complete_story(*story_id).await,
            (status, _) => Err(StoryError::new(StoryErrorKind::JobNotReady {
                job_id: job_id.to_string(),
                status: status.to_string(),
            })
            .into()),
        }
    }

    async fn load_job(&self, job_id: &str) -> BranchtaleResult<StoryJob> {
        Ok(self
            .repository
            .get_job(job_id)
            .await?
            .ok_or_else(|| StoryError::new(StoryErrorKind::JobNotFound(job_id.to_string())))?)
    }
}
