//! Entry tools
//!
//! Validated operations for logging and querying daily entries.

use crate::models::{Entry, EntryUpdate, NewEntry};
use crate::store::EntryStore;

use super::{validation, ServiceResult};

/// Log (insert-or-replace) the entry for a user's calendar day
pub async fn log_entry(
    store: &EntryStore,
    user_id: i64,
    date: &str,
    weight: f64,
    calories: i64,
) -> ServiceResult<Entry> {
    let date = validation::parse_date(date)?;
    let weight = validation::normalize_weight(weight)?;
    let calories = validation::validate_calories(calories)?;

    let entry = store
        .upsert(NewEntry {
            user_id,
            date: date.to_string(),
            weight,
            calories,
        })
        .await?;
    Ok(entry)
}

/// Get an entry by ID
pub async fn get_entry(store: &EntryStore, id: i64) -> ServiceResult<Option<Entry>> {
    Ok(store.get_by_id(id).await?)
}

/// List a user's entries, newest first
pub async fn list_entries(
    store: &EntryStore,
    user_id: i64,
    limit: Option<i64>,
    offset: Option<i64>,
) -> ServiceResult<Vec<Entry>> {
    let limit = limit.unwrap_or(50).clamp(1, 200);
    let offset = offset.unwrap_or(0).max(0);

    Ok(store.get_by_user(user_id, Some(limit), Some(offset)).await?)
}

/// List a user's entries between two dates, inclusive, newest first
pub async fn list_entries_in_range(
    store: &EntryStore,
    user_id: i64,
    start: &str,
    end: &str,
) -> ServiceResult<Vec<Entry>> {
    let start = validation::parse_date(start)?;
    let end = validation::parse_date(end)?;

    Ok(store
        .get_by_user_in_range(user_id, start.to_string(), end.to_string())
        .await?)
}

/// Update an entry's fields; `None` if the id is unknown
pub async fn update_entry(
    store: &EntryStore,
    id: i64,
    date: Option<&str>,
    weight: Option<f64>,
    calories: Option<i64>,
) -> ServiceResult<Option<Entry>> {
    let data = EntryUpdate {
        date: date
            .map(validation::parse_date)
            .transpose()?
            .map(|d| d.to_string()),
        weight: weight.map(validation::normalize_weight).transpose()?,
        calories: calories.map(validation::validate_calories).transpose()?,
    };

    Ok(store.update(id, data).await?)
}

/// Delete an entry; true if a row was removed
pub async fn delete_entry(store: &EntryStore, id: i64) -> ServiceResult<bool> {
    Ok(store.delete(id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{migrations, Database};
    use crate::models::User;
    use crate::tools::{ServiceError, ValidationError};

    fn test_store() -> (tempfile::TempDir, EntryStore, i64) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("tools.db")).unwrap();
        let user_id = {
            let conn = db.get_conn().unwrap();
            migrations::run_migrations(&conn).unwrap();
            User::get_or_create(&conn, "test@example.com").unwrap().id
        };
        (dir, EntryStore::new(db), user_id)
    }

    #[tokio::test]
    async fn log_entry_normalizes_weight() {
        let (_dir, store, user_id) = test_store();

        let entry = log_entry(&store, user_id, "2024-06-01", 185.456, 2200)
            .await
            .unwrap();
        assert_eq!(entry.weight, "185.46");
        assert_eq!(entry.calories, 2200);
    }

    #[tokio::test]
    async fn log_entry_rejects_malformed_input() {
        let (_dir, store, user_id) = test_store();

        let err = log_entry(&store, user_id, "06/01/2024", 185.0, 2200)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::InvalidDate(_))
        ));

        let err = log_entry(&store, user_id, "2024-06-01", -185.0, 2200)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::InvalidWeight(_))
        ));

        let err = log_entry(&store, user_id, "2024-06-01", 185.0, 0)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::InvalidCalories(_))
        ));
    }

    #[tokio::test]
    async fn update_entry_validates_each_provided_field() {
        let (_dir, store, user_id) = test_store();

        let entry = log_entry(&store, user_id, "2024-06-01", 185.0, 2200)
            .await
            .unwrap();

        let updated = update_entry(&store, entry.id, None, Some(184.2), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.weight, "184.20");
        assert_eq!(updated.calories, 2200);

        let err = update_entry(&store, entry.id, Some("bad-date"), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
