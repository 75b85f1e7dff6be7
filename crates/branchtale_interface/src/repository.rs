//! Repository trait for story and job persistence.

use async_trait::async_trait;
use branchtale_core::{JobStatus, Story, StoryJob, StoryNode, TreeSummary, ValidatedStory};
use branchtale_error::BranchtaleResult;

/// Persistence store for stories, their nodes, and generation jobs.
///
/// Implementations must be safe to share between concurrently running jobs.
#[async_trait]
pub trait StoryRepository: Send + Sync {
    /// Record a newly submitted job.
    async fn create_job(&self, job: &StoryJob) -> BranchtaleResult<()>;

    /// Load a job by its identifier.
    async fn get_job(&self, job_id: &str) -> BranchtaleResult<Option<StoryJob>>;

    /// Persist a job's new state, provided its stored status is still `from`.
    ///
    /// This is a compare-and-set: if another writer moved the job first the
    /// call fails with a conflict and nothing is written.
    async fn transition_job(&self, job: &StoryJob, from: JobStatus) -> BranchtaleResult<()>;

    /// All jobs submitted by a session, oldest first.
    async fn list_jobs(&self, session_id: &str) -> BranchtaleResult<Vec<StoryJob>>;

    /// Create a story and materialize its whole tree.
    ///
    /// This should atomically persist the story row and every node. If any
    /// part fails, the entire save should be rolled back so no story or node
    /// from this call remains visible.
    async fn save_story_tree(
        &self,
        session_id: &str,
        story: &ValidatedStory,
    ) -> BranchtaleResult<(Story, TreeSummary)>;

    /// Load story metadata by identifier.
    async fn get_story(&self, story_id: i32) -> BranchtaleResult<Option<Story>>;

    /// Every node belonging to a story, in insertion order.
    async fn list_story_nodes(&self, story_id: i32) -> BranchtaleResult<Vec<StoryNode>>;
}
