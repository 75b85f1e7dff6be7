//! Story generation job lifecycle.

use branchtale_error::{JobError, JobErrorKind};
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Closed set of job states.
///
/// `pending → processing → completed | failed`; terminal states never change.
///
/// # Examples
///
/// ```
/// use branchtale_core::JobStatus;
/// use std::str::FromStr;
///
/// assert_eq!(JobStatus::Processing.to_string(), "processing");
/// assert_eq!(JobStatus::from_str("failed").unwrap(), JobStatus::Failed);
/// assert!(JobStatus::Pending.can_transition_to(JobStatus::Processing));
/// assert!(!JobStatus::Completed.can_transition_to(JobStatus::Failed));
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JobStatus {
    /// Accepted, background work not started
    Pending,
    /// Background work is calling the provider and building the tree
    Processing,
    /// Story persisted
    Completed,
    /// Generation failed, error recorded
    Failed,
}

impl JobStatus {
    /// Whether no further transitions are allowed.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether `self → next` is an edge of the lifecycle.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Processing, Self::Completed)
                | (Self::Processing, Self::Failed)
        )
    }
}

/// Tracked lifecycle of one generation request.
///
/// Status only moves through [`StoryJob::start`], [`StoryJob::complete`] and
/// [`StoryJob::fail`]. The builder exists for stores rehydrating rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into))]
pub struct StoryJob {
    /// Public job identifier (UUIDv4)
    job_id: String,
    /// Session that submitted the job
    session_id: String,
    /// Requested theme
    theme: String,
    /// Current state
    status: JobStatus,
    /// Generated story, set on completion
    #[builder(default)]
    story_id: Option<i32>,
    /// Failure text, set on failure
    #[builder(default)]
    error: Option<String>,
    /// Submission time
    #[builder(default = "Utc::now()")]
    created_at: DateTime<Utc>,
    /// Time the job reached a terminal state
    #[builder(default)]
    completed_at: Option<DateTime<Utc>>,
}

impl StoryJob {
    /// Create a pending job with a fresh identifier.
    pub fn pending(session_id: impl Into<String>, theme: impl Into<String>) -> Self {
        Self {
            job_id: uuid::Uuid::new_v4().to_string(),
            session_id: session_id.into(),
            theme: theme.into(),
            status: JobStatus::Pending,
            story_id: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Create a builder.
    pub fn builder() -> StoryJobBuilder {
        StoryJobBuilder::default()
    }

    /// `pending → processing`.
    pub fn start(&mut self) -> Result<(), JobError> {
        self.advance(JobStatus::Processing)
    }

    /// `processing → completed`, recording the story and completion time.
    pub fn complete(&mut self, story_id: i32) -> Result<(), JobError> {
        self.advance(JobStatus::Completed)?;
        self.story_id = Some(story_id);
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// `processing → failed`, recording the error text and completion time.
    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), JobError> {
        self.advance(JobStatus::Failed)?;
        self.error = Some(error.into());
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    #[track_caller]
    fn advance(&mut self, next: JobStatus) -> Result<(), JobError> {
        if !self.status.can_transition_to(next) {
            return Err(JobError::new(JobErrorKind::IllegalTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            }));
        }
        self.status = next;
        Ok(())
    }
}
