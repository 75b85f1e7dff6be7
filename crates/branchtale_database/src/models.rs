//! Diesel models for story tables.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Database row for stories table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::stories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StoryRow {
    pub id: i32,
    pub title: String,
    pub session_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for stories table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::stories)]
pub struct NewStoryRow {
    pub title: String,
    pub session_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Database row for story_nodes table.
///
/// `options` holds a JSON array of `{"text", "node_id"}` objects.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Associations)]
#[diesel(belongs_to(StoryRow, foreign_key = story_id))]
#[diesel(table_name = crate::schema::story_nodes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StoryNodeRow {
    pub id: i32,
    pub story_id: i32,
    pub content: String,
    pub is_root: bool,
    pub is_ending: bool,
    pub is_winning_ending: bool,
    pub options: serde_json::Value,
}

/// Insertable struct for story_nodes table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::story_nodes)]
pub struct NewStoryNodeRow {
    pub story_id: i32,
    pub content: String,
    pub is_root: bool,
    pub is_ending: bool,
    pub is_winning_ending: bool,
    pub options: serde_json::Value,
}

/// Database row for story_jobs table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::story_jobs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StoryJobRow {
    pub job_id: String,
    pub session_id: String,
    pub theme: String,
    pub status: String,
    pub story_id: Option<i32>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Changeset applied when a job changes state.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = crate::schema::story_jobs)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateStoryJobRow {
    pub status: String,
    pub story_id: Option<i32>,
    pub error: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}
