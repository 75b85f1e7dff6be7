//! Database connection utilities.

use crate::DatabaseResult;
use branchtale_error::{DatabaseError, DatabaseErrorKind};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

/// Shared pool of PostgreSQL connections.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Read a connection string from the environment variable `var`.
///
/// # Errors
///
/// Returns a connection error if the variable is not set.
pub fn database_url_from_env(var: &str) -> DatabaseResult<String> {
    std::env::var(var).map_err(|_| {
        DatabaseError::new(DatabaseErrorKind::Connection(format!(
            "{} environment variable not set",
            var
        )))
    })
}

/// Build a connection pool holding at most `max_size` connections.
///
/// The pool opens its first connection eagerly, so an unreachable database is
/// reported here rather than on first use.
#[tracing::instrument(skip(database_url))]
pub fn establish_pool(database_url: &str, max_size: u32) -> DatabaseResult<PgPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(max_size.max(1))
        .build(manager)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Pool(e.to_string())))?;
    tracing::debug!("Connection pool ready");
    Ok(pool)
}
