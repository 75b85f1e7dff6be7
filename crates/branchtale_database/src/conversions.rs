//! Conversions between domain types and database rows.

use crate::{NewStoryNodeRow, StoryJobRow, StoryNodeRow, StoryRow, UpdateStoryJobRow};
use branchtale_core::{JobStatus, NewStoryNode, Story, StoryJob, StoryNode, StoryOption};
use branchtale_error::{DatabaseError, DatabaseErrorKind};

impl From<StoryRow> for Story {
    fn from(row: StoryRow) -> Self {
        Story {
            id: row.id,
            title: row.title,
            session_id: row.session_id,
            created_at: row.created_at,
        }
    }
}

impl From<&NewStoryNode> for NewStoryNodeRow {
    fn from(node: &NewStoryNode) -> Self {
        NewStoryNodeRow {
            story_id: node.story_id,
            content: node.content.clone(),
            is_root: node.is_root,
            is_ending: node.is_ending,
            is_winning_ending: node.is_winning_ending,
            options: serde_json::Value::Array(Vec::new()),
        }
    }
}

impl TryFrom<StoryNodeRow> for StoryNode {
    type Error = DatabaseError;

    fn try_from(row: StoryNodeRow) -> Result<Self, Self::Error> {
        let options: Vec<StoryOption> = serde_json::from_value(row.options).map_err(|e| {
            DatabaseError::new(DatabaseErrorKind::Serialization(format!(
                "options of node {}: {}",
                row.id, e
            )))
        })?;

        Ok(StoryNode {
            id: row.id,
            story_id: row.story_id,
            content: row.content,
            is_root: row.is_root,
            is_ending: row.is_ending,
            is_winning_ending: row.is_winning_ending,
            options,
        })
    }
}

impl From<&StoryJob> for StoryJobRow {
    fn from(job: &StoryJob) -> Self {
        StoryJobRow {
            job_id: job.job_id().clone(),
            session_id: job.session_id().clone(),
            theme: job.theme().clone(),
            status: job.status().to_string(),
            story_id: *job.story_id(),
            error: job.error().clone(),
            created_at: *job.created_at(),
            completed_at: *job.completed_at(),
        }
    }
}

impl From<&StoryJob> for UpdateStoryJobRow {
    fn from(job: &StoryJob) -> Self {
        UpdateStoryJobRow {
            status: job.status().to_string(),
            story_id: *job.story_id(),
            error: job.error().clone(),
            completed_at: *job.completed_at(),
        }
    }
}

impl TryFrom<StoryJobRow> for StoryJob {
    type Error = DatabaseError;

    fn try_from(row: StoryJobRow) -> Result<Self, Self::Error> {
        let status: JobStatus = row.status.parse().map_err(|_| {
            DatabaseError::new(DatabaseErrorKind::Serialization(format!(
                "unknown job status '{}' for job {}",
                row.status, row.job_id
            )))
        })?;

        StoryJob::builder()
            .job_id(row.job_id)
            .session_id(row.session_id)
            .theme(row.theme)
            .status(status)
            .story_id(row.story_id)
            .error(row.error)
            .created_at(row.created_at)
            .completed_at(row.completed_at)
            .build()
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Serialization(e.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_node_row_options_roundtrip_shape() {
        let row = StoryNodeRow {
            id: 3,
            story_id: 1,
            content: "A fork".to_string(),
            is_root: true,
            is_ending: false,
            is_winning_ending: false,
            options: json!([{"text": "Left", "node_id": 4}, {"text": "Right", "node_id": 9}]),
        };
        let node = StoryNode::try_from(row).unwrap();
        assert_eq!(node.options.len(), 2);
        assert_eq!(node.options[1], StoryOption::new("Right", 9));
    }

    #[test]
    fn test_malformed_options_are_rejected() {
        let row = StoryNodeRow {
            id: 3,
            story_id: 1,
            content: "A fork".to_string(),
            is_root: false,
            is_ending: false,
            is_winning_ending: false,
            options: json!({"text": "not a list"}),
        };
        let err = StoryNode::try_from(row).unwrap_err();
        assert!(matches!(err.kind, DatabaseErrorKind::Serialization(_)));
    }

    #[test]
    fn test_new_node_starts_without_options() {
        let node = NewStoryNode {
            story_id: 2,
            content: "Start".to_string(),
            is_root: true,
            is_ending: false,
            is_winning_ending: false,
        };
        let row = NewStoryNodeRow::from(&node);
        assert_eq!(row.options, json!([]));
        assert!(row.is_root);
    }

    #[test]
    fn test_job_row_conversion() {
        let mut job = StoryJob::pending("session", "dragons");
        job.start().unwrap();
        job.fail("provider down").unwrap();

        let row = StoryJobRow::from(&job);
        assert_eq!(row.status, "failed");
        assert_eq!(row.error.as_deref(), Some("provider down"));

        let back = StoryJob::try_from(row).unwrap();
        assert_eq!(back, job);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let row = StoryJobRow {
            job_id: "j".to_string(),
            session_id: "s".to_string(),
            theme: "t".to_string(),
            status: "running".to_string(),
            story_id: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        };
        assert!(StoryJob::try_from(row).is_err());
    }
}
