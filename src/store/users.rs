//! User store
//!
//! Async facade over user rows. Kept deliberately small; credentials and
//! sessions are out of scope for this service.

use tracing::debug;

use crate::db::Database;
use crate::models::User;

use super::{is_constraint_violation, with_conn, StoreError, StoreResult};

/// User storage
#[derive(Clone)]
pub struct UserStore {
    db: Database,
}

impl UserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a new user. Fails with [`StoreError::DuplicateEmail`] if the
    /// email is already registered.
    pub async fn create(&self, email: String) -> StoreResult<User> {
        debug!(%email, "creating user");
        let reported = email.clone();

        match with_conn(&self.db, move |conn| User::insert(conn, &email)).await {
            Err(StoreError::Db(ref e)) if is_constraint_violation(e) => {
                Err(StoreError::DuplicateEmail { email: reported })
            }
            other => other,
        }
    }

    /// Get a user by ID
    pub async fn get_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        with_conn(&self.db, move |conn| User::get_by_id(conn, id)).await
    }

    /// Get a user by email
    pub async fn get_by_email(&self, email: String) -> StoreResult<Option<User>> {
        with_conn(&self.db, move |conn| User::get_by_email(conn, &email)).await
    }

    /// Fetch the user for the email, inserting it first if missing
    pub async fn get_or_create(&self, email: String) -> StoreResult<User> {
        with_conn(&self.db, move |conn| User::get_or_create(conn, &email)).await
    }

    /// List all users
    pub async fn list(&self) -> StoreResult<Vec<User>> {
        with_conn(&self.db, User::list).await
    }
}
