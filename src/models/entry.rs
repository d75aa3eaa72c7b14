//! Daily entry model
//!
//! One row per user per calendar day: morning body weight and total calorie
//! intake. Weight is carried as a decimal string so stored values round-trip
//! exactly; it only becomes a float inside the analytics engine.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

use super::timestamp_now;

/// A daily weight/calorie observation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub user_id: i64,
    pub date: String, // ISO date: "2025-01-09"
    pub weight: String, // decimal string, two places
    pub calories: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating or upserting an entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEntry {
    pub user_id: i64,
    pub date: String,
    pub weight: String,
    pub calories: i64,
}

/// Data for updating an entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryUpdate {
    pub date: Option<String>,
    pub weight: Option<String>,
    pub calories: Option<i64>,
}

impl Entry {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            weight: row.get("weight")?,
            calories: row.get("calories")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new entry. Fails if the user already has one for the date.
    pub fn insert(conn: &Connection, data: &NewEntry) -> DbResult<Self> {
        let now = timestamp_now();
        conn.execute(
            r#"
            INSERT INTO entries (user_id, date, weight, calories, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
            params![data.user_id, data.date, data.weight, data.calories, now],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Insert the entry, or fold it into the existing row for the same
    /// (user, date), refreshing `updated_at`.
    ///
    /// A single conditional write: two concurrent upserts cannot both
    /// observe "not found" and race each other into a duplicate row.
    pub fn upsert(conn: &Connection, data: &NewEntry) -> DbResult<Self> {
        let now = timestamp_now();
        conn.execute(
            r#"
            INSERT INTO entries (user_id, date, weight, calories, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            ON CONFLICT(user_id, date) DO UPDATE SET
                weight = excluded.weight,
                calories = excluded.calories,
                updated_at = excluded.updated_at
            "#,
            params![data.user_id, data.date, data.weight, data.calories, now],
        )?;

        Self::get_by_user_and_date(conn, data.user_id, &data.date)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get an entry by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM entries WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get the entry for a user's calendar day
    pub fn get_by_user_and_date(
        conn: &Connection,
        user_id: i64,
        date: &str,
    ) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM entries WHERE user_id = ?1 AND date = ?2")?;

        let result = stmt.query_row(params![user_id, date], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List a user's entries, newest date first
    pub fn list_by_user(
        conn: &Connection,
        user_id: i64,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM entries WHERE user_id = ?1 ORDER BY date DESC LIMIT ?2 OFFSET ?3",
        )?;

        // LIMIT -1 means unlimited in SQLite
        let entries = stmt
            .query_map(
                params![user_id, limit.unwrap_or(-1), offset.unwrap_or(0)],
                Self::from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// List a user's entries with start <= date <= end, newest date first
    pub fn list_by_user_in_range(
        conn: &Connection,
        user_id: i64,
        start: &str,
        end: &str,
    ) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM entries
             WHERE user_id = ?1 AND date >= ?2 AND date <= ?3
             ORDER BY date DESC",
        )?;

        let entries = stmt
            .query_map(params![user_id, start, end], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Update an entry in place, refreshing `updated_at`
    pub fn update(conn: &Connection, id: i64, data: &EntryUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref date) = data.date {
            updates.push(format!("date = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(date.clone()));
        }
        if let Some(ref weight) = data.weight {
            updates.push(format!("weight = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(weight.clone()));
        }
        if let Some(calories) = data.calories {
            updates.push(format!("calories = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(calories));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        params_vec.push(Box::new(timestamp_now()));
        updates.push(format!("updated_at = ?{}", params_vec.len()));

        let sql = format!(
            "UPDATE entries SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Delete an entry
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM entries WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
