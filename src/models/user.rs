//! User model
//!
//! Owners of daily entries. Authentication lives outside this service; a
//! user here is just a stable id and a unique email.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

use super::timestamp_now;

/// A tracked user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            email: row.get("email")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new user. Fails on a duplicate email.
    pub fn insert(conn: &Connection, email: &str) -> DbResult<Self> {
        let now = timestamp_now();
        conn.execute(
            "INSERT INTO users (email, created_at, updated_at) VALUES (?1, ?2, ?2)",
            params![email, now],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a user by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a user by email
    pub fn get_by_email(conn: &Connection, email: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users WHERE email = ?1")?;

        let result = stmt.query_row([email], Self::from_row);
        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert the user if missing, then fetch it.
    ///
    /// A single conditional write; concurrent callers with the same email
    /// both land on the one row.
    pub fn get_or_create(conn: &Connection, email: &str) -> DbResult<Self> {
        let now = timestamp_now();
        conn.execute(
            "INSERT INTO users (email, created_at, updated_at) VALUES (?1, ?2, ?2)
             ON CONFLICT(email) DO NOTHING",
            params![email, now],
        )?;

        Self::get_by_email(conn, email)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// List all users, ordered by email
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users ORDER BY email")?;
        let users = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }
}
