//! Persistent stores
//!
//! Async facades over the SQLite pool. Each operation runs its blocking
//! SQLite work on the blocking thread pool, so awaiting callers never stall
//! other in-flight requests on the async runtime.

mod entries;
mod users;

pub use entries::EntryStore;
pub use users::UserStore;

use thiserror::Error;

use crate::db::{Database, DbError, DbResult};

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    /// Raw insert hit the one-entry-per-user-per-day constraint.
    #[error("an entry already exists for user {user_id} on {date}")]
    DuplicateEntry { user_id: i64, date: String },

    /// Insert hit the unique email constraint.
    #[error("a user already exists with email {email}")]
    DuplicateEmail { email: String },

    /// The storage backend failed; callers may retry or report.
    #[error(transparent)]
    Db(#[from] DbError),

    /// The blocking worker was cancelled or panicked.
    #[error("storage worker terminated: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Run a closure against a pooled connection on the blocking thread pool
async fn with_conn<T, F>(db: &Database, f: F) -> StoreResult<T>
where
    F: FnOnce(&rusqlite::Connection) -> DbResult<T> + Send + 'static,
    T: Send + 'static,
{
    let db = db.clone();
    let result = tokio::task::spawn_blocking(move || {
        let conn = db.get_conn()?;
        f(&conn)
    })
    .await??;
    Ok(result)
}

/// True when the error is a SQLite unique-constraint failure
fn is_constraint_violation(err: &DbError) -> bool {
    matches!(
        err,
        DbError::Sqlite(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
