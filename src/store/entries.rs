//! Entry store
//!
//! Persists per-user daily entries and enforces the one-entry-per-user-per-day
//! invariant. `upsert` is the normal write path; `create` is the strict
//! variant that rejects an already-logged date.

use tracing::debug;

use crate::db::Database;
use crate::models::{Entry, EntryUpdate, NewEntry};

use super::{is_constraint_violation, with_conn, StoreError, StoreResult};

/// Per-user daily entry storage
#[derive(Clone)]
pub struct EntryStore {
    db: Database,
}

impl EntryStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a new entry. Fails with [`StoreError::DuplicateEntry`] if the
    /// user already has one for the date.
    pub async fn create(&self, data: NewEntry) -> StoreResult<Entry> {
        let user_id = data.user_id;
        let date = data.date.clone();
        debug!(user_id, %date, "creating entry");

        match with_conn(&self.db, move |conn| Entry::insert(conn, &data)).await {
            Err(StoreError::Db(ref e)) if is_constraint_violation(e) => {
                Err(StoreError::DuplicateEntry { user_id, date })
            }
            other => other,
        }
    }

    /// Insert or update the entry for (user, date) in one atomic write
    pub async fn upsert(&self, data: NewEntry) -> StoreResult<Entry> {
        debug!(user_id = data.user_id, date = %data.date, "upserting entry");
        with_conn(&self.db, move |conn| Entry::upsert(conn, &data)).await
    }

    /// Get an entry by ID
    pub async fn get_by_id(&self, id: i64) -> StoreResult<Option<Entry>> {
        with_conn(&self.db, move |conn| Entry::get_by_id(conn, id)).await
    }

    /// Get the entry for a user's calendar day
    pub async fn get_by_user_and_date(
        &self,
        user_id: i64,
        date: String,
    ) -> StoreResult<Option<Entry>> {
        with_conn(&self.db, move |conn| {
            Entry::get_by_user_and_date(conn, user_id, &date)
        })
        .await
    }

    /// A user's entries, newest date first, paginated
    pub async fn get_by_user(
        &self,
        user_id: i64,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> StoreResult<Vec<Entry>> {
        with_conn(&self.db, move |conn| {
            Entry::list_by_user(conn, user_id, limit, offset)
        })
        .await
    }

    /// Entries with start <= date <= end (both inclusive), newest date first
    pub async fn get_by_user_in_range(
        &self,
        user_id: i64,
        start: String,
        end: String,
    ) -> StoreResult<Vec<Entry>> {
        with_conn(&self.db, move |conn| {
            Entry::list_by_user_in_range(conn, user_id, &start, &end)
        })
        .await
    }

    /// Update fields in place; `None` if the id is unknown
    pub async fn update(&self, id: i64, data: EntryUpdate) -> StoreResult<Option<Entry>> {
        debug!(id, "updating entry");
        with_conn(&self.db, move |conn| Entry::update(conn, id, &data)).await
    }

    /// True if a row was removed
    pub async fn delete(&self, id: i64) -> StoreResult<bool> {
        debug!(id, "deleting entry");
        with_conn(&self.db, move |conn| Entry::delete(conn, id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;
    use crate::models::User;

    fn new_entry(user_id: i64, date: &str, weight: &str, calories: i64) -> NewEntry {
        NewEntry {
            user_id,
            date: date.to_string(),
            weight: weight.to_string(),
            calories,
        }
    }

    /// Fresh store over a temp-file database with one seeded user.
    /// The TempDir must stay alive for the duration of the test.
    fn test_store() -> (tempfile::TempDir, EntryStore, i64) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("entries.db")).unwrap();
        let user_id = {
            let conn = db.get_conn().unwrap();
            migrations::run_migrations(&conn).unwrap();
            User::get_or_create(&conn, "test@example.com").unwrap().id
        };
        (dir, EntryStore::new(db), user_id)
    }

    #[tokio::test]
    async fn upsert_creates_then_merges() {
        let (_dir, store, user_id) = test_store();

        let first = store
            .upsert(new_entry(user_id, "2024-06-01", "185.00", 2200))
            .await
            .unwrap();

        let second = store
            .upsert(new_entry(user_id, "2024-06-01", "186.50", 2350))
            .await
            .unwrap();

        // Same row, new values, refreshed updated_at
        assert_eq!(second.id, first.id);
        assert_eq!(second.weight, "186.50");
        assert_eq!(second.calories, 2350);
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at > first.updated_at);

        let all = store.get_by_user(user_id, None, None).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn create_rejects_duplicate_date() {
        let (_dir, store, user_id) = test_store();

        store
            .create(new_entry(user_id, "2024-06-01", "185.00", 2200))
            .await
            .unwrap();

        let err = store
            .create(new_entry(user_id, "2024-06-01", "184.00", 2100))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEntry { .. }));

        // Same date for a different user is fine
        let other = {
            let conn = store.db.get_conn().unwrap();
            User::get_or_create(&conn, "other@example.com").unwrap().id
        };
        store
            .create(new_entry(other, "2024-06-01", "150.00", 1800))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn range_query_is_inclusive_and_scoped_to_user() {
        let (_dir, store, user_id) = test_store();
        let other = {
            let conn = store.db.get_conn().unwrap();
            User::get_or_create(&conn, "other@example.com").unwrap().id
        };

        for date in ["2024-06-01", "2024-06-05", "2024-06-10", "2024-06-15"] {
            store
                .upsert(new_entry(user_id, date, "185.00", 2200))
                .await
                .unwrap();
        }
        store
            .upsert(new_entry(other, "2024-06-05", "150.00", 1800))
            .await
            .unwrap();

        let entries = store
            .get_by_user_in_range(user_id, "2024-06-05".to_string(), "2024-06-10".to_string())
            .await
            .unwrap();

        let dates: Vec<&str> = entries.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, ["2024-06-10", "2024-06-05"]);
        assert!(entries.iter().all(|e| e.user_id == user_id));
    }

    #[tokio::test]
    async fn list_paginates_newest_first() {
        let (_dir, store, user_id) = test_store();

        for date in [
            "2024-06-01",
            "2024-06-02",
            "2024-06-03",
            "2024-06-04",
            "2024-06-05",
        ] {
            store
                .upsert(new_entry(user_id, date, "185.00", 2200))
                .await
                .unwrap();
        }

        let page1 = store.get_by_user(user_id, Some(2), Some(0)).await.unwrap();
        let page2 = store.get_by_user(user_id, Some(2), Some(2)).await.unwrap();

        let dates1: Vec<&str> = page1.iter().map(|e| e.date.as_str()).collect();
        let dates2: Vec<&str> = page2.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates1, ["2024-06-05", "2024-06-04"]);
        assert_eq!(dates2, ["2024-06-03", "2024-06-02"]);
    }

    #[tokio::test]
    async fn update_refreshes_updated_at() {
        let (_dir, store, user_id) = test_store();

        let entry = store
            .create(new_entry(user_id, "2024-06-01", "185.00", 2200))
            .await
            .unwrap();

        let updated = store
            .update(
                entry.id,
                EntryUpdate {
                    calories: Some(2500),
                    ..EntryUpdate::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.calories, 2500);
        assert_eq!(updated.weight, "185.00");
        assert!(updated.updated_at > entry.updated_at);
    }

    #[tokio::test]
    async fn update_unknown_id_returns_none() {
        let (_dir, store, _user_id) = test_store();

        let result = store
            .update(
                9999,
                EntryUpdate {
                    calories: Some(2500),
                    ..EntryUpdate::default()
                },
            )
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_was_removed() {
        let (_dir, store, user_id) = test_store();

        let entry = store
            .create(new_entry(user_id, "2024-06-01", "185.00", 2200))
            .await
            .unwrap();

        assert!(store.delete(entry.id).await.unwrap());
        assert!(!store.delete(entry.id).await.unwrap());
        assert!(store.get_by_id(entry.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_by_user_and_date_finds_the_day() {
        let (_dir, store, user_id) = test_store();

        store
            .upsert(new_entry(user_id, "2024-06-01", "185.00", 2200))
            .await
            .unwrap();

        let found = store
            .get_by_user_and_date(user_id, "2024-06-01".to_string())
            .await
            .unwrap();
        assert!(found.is_some());

        let missing = store
            .get_by_user_and_date(user_id, "2024-06-02".to_string())
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
