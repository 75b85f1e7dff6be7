//! PostgreSQL persistence for Branchtale.
//!
//! Provides [`PostgresStoryRepository`], a diesel implementation of
//! `StoryRepository` over an r2d2 connection pool. A story and all of its
//! nodes are written in one transaction, so a failed save leaves nothing
//! behind.
//!
//! Schema migrations are not managed here; [`schema`] documents the tables the
//! repository expects.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod connection;
mod conversions;
mod models;
mod repository;
#[allow(missing_docs)]
pub mod schema;

pub use connection::{database_url_from_env, establish_pool, PgPool};
pub use models::{
    NewStoryNodeRow, NewStoryRow, StoryJobRow, StoryNodeRow, StoryRow, UpdateStoryJobRow,
};
pub use repository::PostgresStoryRepository;

use branchtale_error::DatabaseError;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
