//! Background execution of story jobs.

use crate::StoryGenerator;
use branchtale_core::{JobStatus, StoryJob};
use branchtale_error::{BranchtaleResult, StoryError, StoryErrorKind};
use branchtale_interface::{StoryDriver, StoryRepository};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::instrument;

/// Accepts generation requests and runs each one as an independent task.
///
/// Every job moves `pending → processing → completed | failed` exactly once.
/// Jobs share nothing but the repository; there is no cancellation and no
/// retry.
pub struct StoryJobRunner<D, R> {
    generator: Arc<StoryGenerator<D, R>>,
    repository: Arc<R>,
}

impl<D, R> Clone for StoryJobRunner<D, R> {
    fn clone(&self) -> Self {
        Self {
            generator: Arc::clone(&self.generator),
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<D, R> StoryJobRunner<D, R>
where
    D: StoryDriver + 'static,
    R: StoryRepository + 'static,
{
    /// Create a runner around a generator.
    pub fn new(generator: StoryGenerator<D, R>) -> Self {
        let repository = Arc::clone(generator.repository());
        Self {
            generator: Arc::new(generator),
            repository,
        }
    }

    /// The repository jobs are tracked in.
    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Record a pending job and start it in the background.
    ///
    /// A missing session id is replaced by a fresh UUID, which the caller
    /// should hand back on later requests to keep its jobs together.
    ///
    /// # Errors
    ///
    /// Rejects a blank theme, and fails if the job cannot be recorded. In
    /// both cases no task is started.
    #[instrument(skip(self), fields(job_id))]
    pub async fn submit(
        &self,
        theme: &str,
        session_id: Option<String>,
    ) -> BranchtaleResult<(StoryJob, JoinHandle<()>)> {
        let theme = theme.trim();
        if theme.is_empty() {
            return Err(StoryError::new(StoryErrorKind::InvalidInput(
                "theme must not be empty".to_string(),
            ))
            .into());
        }

        let session_id = session_id
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let job = StoryJob::pending(session_id, theme);
        tracing::Span::current().record("job_id", job.job_id().as_str());
        self.repository.create_job(&job).await?;
        tracing::info!(session_id = %job.session_id(), "Job submitted");

        let runner = self.clone();
        let job_id = job.job_id().clone();
        let handle = tokio::spawn(async move {
            runner.run(&job_id).await;
        });

        Ok((job, handle))
    }

    /// Drive one job to a terminal state.
    ///
    /// A job that does not exist is logged and ignored. Generation errors are
    /// recorded on the job, never returned.
    #[instrument(skip(self))]
    pub async fn run(&self, job_id: &str) {
        let job = match self.repository.get_job(job_id).await {
            Ok(Some(job)) => job,
            Ok(None) => {
                tracing::warn!("Job not found, nothing to run");
                return;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load job");
                return;
            }
        };

        if let Err(e) = self.execute(job).await {
            tracing::error!(error = %e, "Failed to record job progress");
        }
    }

    async fn execute(&self, mut job: StoryJob) -> BranchtaleResult<()> {
        job.start()?;
        self.repository
            .transition_job(&job, JobStatus::Pending)
            .await?;
        tracing::debug!(theme = %job.theme(), "Job processing");
        let processing = job.clone();

        match self.generator.generate(job.session_id(), job.theme()).await {
            Ok((story, summary)) => {
                job.complete(story.id)?;
                tracing::info!(
                    story_id = story.id,
                    nodes = summary.node_count(),
                    "Job completed"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "Job failed");
                job.fail(e.to_string())?;
            }
        }

        match self
            .repository
            .transition_job(&job, JobStatus::Processing)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) if *job.status() == JobStatus::Completed => {
                // The job must still end terminal; record the write failure instead
                tracing::warn!(error = %e, "Failed to record completion, marking job failed");
                let mut failed = processing;
                failed.fail(e.to_string())?;
                self.repository
                    .transition_job(&failed, JobStatus::Processing)
                    .await
            }
            Err(e) => Err(e),
        }
    }
}
