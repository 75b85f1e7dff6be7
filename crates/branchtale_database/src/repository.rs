//! PostgreSQL implementation of StoryRepository.
//!
//! Diesel is synchronous, so every call checks a connection out of the pool
//! and runs on tokio's blocking thread pool.

use crate::connection::PgPool;
use crate::schema::{stories, story_jobs, story_nodes};
use crate::{
    DatabaseResult, NewStoryNodeRow, NewStoryRow, StoryJobRow, StoryNodeRow, StoryRow,
    UpdateStoryJobRow,
};
use async_trait::async_trait;
use branchtale_core::{
    build_tree, JobStatus, NewStoryNode, NodeSink, Story, StoryJob, StoryNode, StoryOption,
    TreeSummary, ValidatedStory,
};
use branchtale_error::{
    BranchtaleResult, DatabaseError, DatabaseErrorKind, JobError, JobErrorKind, StoryError,
    StoryErrorKind,
};
use branchtale_interface::StoryRepository;
use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use tracing::instrument;

/// PostgreSQL-backed repository for stories and jobs.
#[derive(Clone)]
pub struct PostgresStoryRepository {
    pool: PgPool,
}

impl std::fmt::Debug for PostgresStoryRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresStoryRepository")
            .field("connections", &self.pool.state().connections)
            .finish()
    }
}

/// Writes nodes through an open connection, normally inside a transaction.
struct PgNodeSink<'a> {
    conn: &'a mut PgConnection,
}

impl NodeSink for PgNodeSink<'_> {
    type Error = diesel::result::Error;

    fn insert_node(&mut self, node: NewStoryNode) -> Result<i32, Self::Error> {
        diesel::insert_into(story_nodes::table)
            .values(NewStoryNodeRow::from(&node))
            .returning(story_nodes::id)
            .get_result(self.conn)
    }

    fn set_options(&mut self, node_id: i32, options: Vec<StoryOption>) -> Result<(), Self::Error> {
        let options = serde_json::to_value(&options)
            .map_err(|e| diesel::result::Error::SerializationError(Box::new(e)))?;
        diesel::update(story_nodes::table.find(node_id))
            .set(story_nodes::options.eq(options))
            .execute(self.conn)?;
        Ok(())
    }
}

enum TransitionOutcome {
    Applied,
    Missing,
    Stale(String),
}

impl PostgresStoryRepository {
    /// Create a repository over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a pool for `database_url` and wrap it.
    pub fn connect(database_url: &str, pool_size: u32) -> DatabaseResult<Self> {
        crate::establish_pool(database_url, pool_size).map(Self::new)
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn with_conn<T, F>(&self, f: F) -> DatabaseResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> DatabaseResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| DatabaseError::new(DatabaseErrorKind::Pool(e.to_string())))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Task(e.to_string())))?
    }
}

#[async_trait]
impl StoryRepository for PostgresStoryRepository {
    #[instrument(skip(self, job), fields(job_id = %job.job_id()))]
    async fn create_job(&self, job: &StoryJob) -> BranchtaleResult<()> {
        let row = StoryJobRow::from(job);
        self.with_conn(move |conn| {
            diesel::insert_into(story_jobs::table)
                .values(&row)
                .execute(conn)?;
            Ok(())
        })
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_job(&self, job_id: &str) -> BranchtaleResult<Option<StoryJob>> {
        let job_id = job_id.to_string();
        let row = self
            .with_conn(move |conn| {
                story_jobs::table
                    .find(job_id)
                    .select(StoryJobRow::as_select())
                    .first(conn)
                    .optional()
                    .map_err(DatabaseError::from)
            })
            .await?;

        Ok(row.map(StoryJob::try_from).transpose()?)
    }

    #[instrument(skip(self, job), fields(job_id = %job.job_id(), to = %job.status()))]
    async fn transition_job(&self, job: &StoryJob, from: JobStatus) -> BranchtaleResult<()> {
        if !from.can_transition_to(*job.status()) {
            return Err(JobError::new(JobErrorKind::IllegalTransition {
                from: from.to_string(),
                to: job.status().to_string(),
            })
            .into());
        }

        let job_id = job.job_id().clone();
        let changes = UpdateStoryJobRow::from(job);
        let outcome = {
            let job_id = job_id.clone();
            self.with_conn(move |conn| {
                // Only a row still in `from` is updated
                let updated = diesel::update(
                    story_jobs::table
                        .filter(story_jobs::job_id.eq(&job_id))
                        .filter(story_jobs::status.eq(from.as_ref())),
                )
                .set(&changes)
                .execute(conn)?;

                if updated == 1 {
                    return Ok(TransitionOutcome::Applied);
                }

                let found: Option<String> = story_jobs::table
                    .find(&job_id)
                    .select(story_jobs::status)
                    .first(conn)
                    .optional()?;
                Ok(match found {
                    Some(status) => TransitionOutcome::Stale(status),
                    None => TransitionOutcome::Missing,
                })
            })
            .await?
        };

        match outcome {
            TransitionOutcome::Applied => Ok(()),
            TransitionOutcome::Missing => {
                Err(StoryError::new(StoryErrorKind::JobNotFound(job_id)).into())
            }
            TransitionOutcome::Stale(found) => Err(JobError::new(JobErrorKind::Conflict {
                job_id,
                expected: from.to_string(),
                found,
            })
            .into()),
        }
    }

    #[instrument(skip(self))]
    async fn list_jobs(&self, session_id: &str) -> BranchtaleResult<Vec<StoryJob>> {
        let session_id = session_id.to_string();
        let rows = self
            .with_conn(move |conn| {
                story_jobs::table
                    .filter(story_jobs::session_id.eq(session_id))
                    .order(story_jobs::created_at.asc())
                    .select(StoryJobRow::as_select())
                    .load(conn)
                    .map_err(DatabaseError::from)
            })
            .await?;

        let jobs = rows
            .into_iter()
            .map(StoryJob::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(jobs)
    }

    #[instrument(skip(self, story), fields(title = %story.title(), nodes = story.node_count()))]
    async fn save_story_tree(
        &self,
        session_id: &str,
        story: &ValidatedStory,
    ) -> BranchtaleResult<(Story, TreeSummary)> {
        let new_story = NewStoryRow {
            title: story.title().clone(),
            session_id: Some(session_id.to_string()),
            created_at: Utc::now(),
        };
        let story = story.clone();

        let (row, summary) = self
            .with_conn(move |conn| {
                conn.transaction::<_, diesel::result::Error, _>(|conn| {
                    let row: StoryRow = diesel::insert_into(stories::table)
                        .values(&new_story)
                        .returning(StoryRow::as_returning())
                        .get_result(conn)?;

                    let mut sink = PgNodeSink { conn };
                    let summary = build_tree(&mut sink, row.id, &story)?;
                    Ok((row, summary))
                })
                .map_err(DatabaseError::from)
            })
            .await?;

        tracing::info!(
            story_id = row.id,
            nodes = summary.node_count(),
            "Story tree persisted"
        );
        Ok((Story::from(row), summary))
    }

    #[instrument(skip(self))]
    async fn get_story(&self, story_id: i32) -> BranchtaleResult<Option<Story>> {
        let row = self
            .with_conn(move |conn| {
                stories::table
                    .find(story_id)
                    .select(StoryRow::as_select())
                    .first(conn)
                    .optional()
                    .map_err(DatabaseError::from)
            })
            .await?;
        Ok(row.map(Story::from))
    }

    #[instrument(skip(self))]
    async fn list_story_nodes(&self, story_id: i32) -> BranchtaleResult<Vec<StoryNode>> {
        let rows = self
            .with_conn(move |conn| {
                story_nodes::table
                    .filter(story_nodes::story_id.eq(story_id))
                    .order(story_nodes::id.asc())
                    .select(StoryNodeRow::as_select())
                    .load(conn)
                    .map_err(DatabaseError::from)
            })
            .await?;

        let nodes = rows
            .into_iter()
            .map(StoryNode::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(nodes)
    }
}
