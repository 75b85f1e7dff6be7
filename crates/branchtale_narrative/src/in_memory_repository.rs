//! In-memory implementation of StoryRepository.
//!
//! All tables live behind one lock, so a story and its tree become visible in
//! a single step. All data is lost when the repository is dropped.

use async_trait::async_trait;
use branchtale_core::{
    build_tree, JobStatus, NewStoryNode, NodeSink, Story, StoryJob, StoryNode, StoryOption,
    TreeSummary, ValidatedStory,
};
use branchtale_error::{BranchtaleResult, JobError, JobErrorKind, StoryError, StoryErrorKind};
use branchtale_interface::StoryRepository;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::instrument;

/// In-memory repository for stories and jobs.
///
/// # Example
/// ```no_run
/// use branchtale_narrative::InMemoryStoryRepository;
///
/// let repo = InMemoryStoryRepository::new();
/// let bounded = InMemoryStoryRepository::with_node_capacity(10_000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStoryRepository {
    tables: Arc<RwLock<Tables>>,
    node_capacity: Option<usize>,
}

#[derive(Debug, Default)]
struct Tables {
    stories: BTreeMap<i32, Story>,
    nodes: BTreeMap<i32, StoryNode>,
    jobs: HashMap<String, StoryJob>,
    last_story_id: i32,
    last_node_id: i32,
}

/// Collects a tree before it is published.
struct StagedTree {
    next_id: i32,
    nodes: Vec<StoryNode>,
    room: Option<usize>,
}

impl NodeSink for StagedTree {
    type Error = StoryError;

    fn insert_node(&mut self, node: NewStoryNode) -> Result<i32, StoryError> {
        if let Some(room) = self.room {
            if self.nodes.len() >= room {
                return Err(StoryError::new(StoryErrorKind::CapacityExceeded(room)));
            }
        }
        self.next_id += 1;
        self.nodes.push(node.with_id(self.next_id));
        Ok(self.next_id)
    }

    fn set_options(&mut self, node_id: i32, options: Vec<StoryOption>) -> Result<(), StoryError> {
        let node = self
            .nodes
            .iter_mut()
            .rev()
            .find(|n| n.id == node_id)
            .ok_or_else(|| {
                StoryError::new(StoryErrorKind::Integrity(format!(
                    "options set on unknown node {}",
                    node_id
                )))
            })?;
        node.options = options;
        Ok(())
    }
}

impl InMemoryStoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository that holds at most `max_nodes` story nodes.
    ///
    /// A story whose tree would exceed the limit is rejected as a whole.
    pub fn with_node_capacity(max_nodes: usize) -> Self {
        Self {
            tables: Arc::default(),
            node_capacity: Some(max_nodes),
        }
    }

    /// Number of stored stories.
    pub async fn story_count(&self) -> usize {
        self.tables.read().await.stories.len()
    }

    /// Number of stored nodes across all stories.
    pub async fn node_count(&self) -> usize {
        self.tables.read().await.nodes.len()
    }

    /// Number of tracked jobs.
    pub async fn job_count(&self) -> usize {
        self.tables.read().await.jobs.len()
    }

    /// Clear all data.
    pub async fn clear(&self) {
        *self.tables.write().await = Tables::default();
    }
}

#[async_trait]
impl StoryRepository for InMemoryStoryRepository {
    #[instrument(skip(self, job), fields(job_id = %job.job_id()))]
    async fn create_job(&self, job: &StoryJob) -> BranchtaleResult<()> {
        let mut tables = self.tables.write().await;
        if tables.jobs.contains_key(job.job_id()) {
            return Err(StoryError::new(StoryErrorKind::InvalidInput(format!(
                "job '{}' already exists",
                job.job_id()
            )))
            .into());
        }
        tables.jobs.insert(job.job_id().clone(), job.clone());
        Ok(())
    }

    async fn get_job(&self, job_id: &str) -> BranchtaleResult<Option<StoryJob>> {
        Ok(self.tables.read().await.jobs.get(job_id).cloned())
    }

    #[instrument(skip(self, job), fields(job_id = %job.job_id(), to = %job.status()))]
    async fn transition_job(&self, job: &StoryJob, from: JobStatus) -> BranchtaleResult<()> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .jobs
            .get_mut(job.job_id())
            .ok_or_else(|| StoryError::new(StoryErrorKind::JobNotFound(job.job_id().clone())))?;

        if *stored.status() != from {
            return Err(JobError::new(JobErrorKind::Conflict {
                job_id: job.job_id().clone(),
                expected: from.to_string(),
                found: stored.status().to_string(),
            })
            .into());
        }
        if !from.can_transition_to(*job.status()) {
            return Err(JobError::new(JobErrorKind::IllegalTransition {
                from: from.to_string(),
                to: job.status().to_string(),
            })
            .into());
        }

        *stored = job.clone();
        Ok(())
    }

    async fn list_jobs(&self, session_id: &str) -> BranchtaleResult<Vec<StoryJob>> {
        let tables = self.tables.read().await;
        let mut jobs: Vec<StoryJob> = tables
            .jobs
            .values()
            .filter(|job| job.session_id() == session_id)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| a.created_at().cmp(b.created_at()));
        Ok(jobs)
    }

    #[instrument(skip(self, story), fields(title = %story.title(), nodes = story.node_count()))]
    async fn save_story_tree(
        &self,
        session_id: &str,
        story: &ValidatedStory,
    ) -> BranchtaleResult<(Story, TreeSummary)> {
        let mut tables = self.tables.write().await;

        let story_id = tables.last_story_id + 1;
        let mut staged = StagedTree {
            next_id: tables.last_node_id,
            nodes: Vec::with_capacity(*story.node_count()),
            room: self
                .node_capacity
                .map(|cap| cap.saturating_sub(tables.nodes.len())),
        };

        // Nothing below touches the tables until the whole tree is staged
        let summary = build_tree(&mut staged, story_id, story)?;

        let record = Story {
            id: story_id,
            title: story.title().clone(),
            session_id: Some(session_id.to_string()),
            created_at: Utc::now(),
        };
        tables.last_story_id = story_id;
        tables.last_node_id = staged.next_id;
        tables.stories.insert(story_id, record.clone());
        tables
            .nodes
            .extend(staged.nodes.into_iter().map(|node| (node.id, node)));

        tracing::debug!(story_id, "Story tree published");
        Ok((record, summary))
    }

    async fn get_story(&self, story_id: i32) -> BranchtaleResult<Option<Story>> {
        Ok(self.tables.read().await.stories.get(&story_id).cloned())
    }

    async fn list_story_nodes(&self, story_id: i32) -> BranchtaleResult<Vec<StoryNode>> {
        let tables = self.tables.read().await;
        Ok(tables
            .nodes
            .values()
            .filter(|node| node.story_id == story_id)
            .cloned()
            .collect())
    }
}
