//! TDEE statistics service
//!
//! Resolves the analysis window, pulls the user's entries from the store,
//! and hands them to the analytics engine. Too little data is a normal
//! outcome here, not an error.

use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;

use crate::analytics::{calculate_tdee_with, TdeeEstimate, TdeeParams};
use crate::config::StatsConfig;
use crate::store::EntryStore;

use super::{validation, ServiceResult};

/// Outcome of a TDEE stats request.
///
/// Serializes to either the estimate shape or the insufficient-data shape;
/// the two have disjoint fields, so clients can tell them apart.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TdeeReport {
    Estimate(TdeeEstimate),
    InsufficientData {
        #[serde(rename = "minimumRequired")]
        minimum_required: usize,
        #[serde(rename = "windowDays")]
        window_days: u32,
    },
}

/// Computes TDEE statistics over a rolling window of a user's entries
#[derive(Clone)]
pub struct StatsService {
    store: EntryStore,
    config: StatsConfig,
}

impl StatsService {
    /// Configuration is injected here; the service keeps no global state.
    pub fn new(store: EntryStore, config: StatsConfig) -> Self {
        Self { store, config }
    }

    /// Stats over `[today - window, today]`, window defaulting from config
    pub async fn tdee_stats(
        &self,
        user_id: i64,
        window_days: Option<i64>,
    ) -> ServiceResult<TdeeReport> {
        self.tdee_stats_as_of(user_id, Utc::now().date_naive(), window_days)
            .await
    }

    /// As [`Self::tdee_stats`], with an explicit reference day (UTC calendar
    /// date, so the window never shifts with the host timezone)
    pub async fn tdee_stats_as_of(
        &self,
        user_id: i64,
        today: NaiveDate,
        window_days: Option<i64>,
    ) -> ServiceResult<TdeeReport> {
        let window = match window_days {
            Some(raw) => validation::validate_window_days(raw)?,
            None => self.config.default_window_days,
        };

        let start = today - Duration::days(i64::from(window));
        let entries = self
            .store
            .get_by_user_in_range(user_id, start.to_string(), today.to_string())
            .await?;

        let params = TdeeParams {
            maintaining_threshold: self.config.maintaining_threshold,
            ..TdeeParams::default()
        };

        debug!(
            user_id,
            window,
            entries = entries.len(),
            "computing TDEE stats"
        );

        match calculate_tdee_with(&params, &entries) {
            Some(estimate) => Ok(TdeeReport::Estimate(estimate)),
            None => Ok(TdeeReport::InsufficientData {
                minimum_required: params.min_data_points,
                window_days: window,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{migrations, Database};
    use crate::models::User;
    use crate::tools::entries::log_entry;
    use crate::tools::ServiceError;

    fn test_service() -> (tempfile::TempDir, EntryStore, StatsService, i64) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("stats.db")).unwrap();
        let user_id = {
            let conn = db.get_conn().unwrap();
            migrations::run_migrations(&conn).unwrap();
            User::get_or_create(&conn, "test@example.com").unwrap().id
        };
        let store = EntryStore::new(db);
        let service = StatsService::new(store.clone(), StatsConfig::default());
        (dir, store, service, user_id)
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn too_few_entries_reports_insufficient_data() {
        let (_dir, store, service, user_id) = test_service();

        log_entry(&store, user_id, "2024-06-10", 185.0, 2200)
            .await
            .unwrap();
        log_entry(&store, user_id, "2024-06-11", 185.1, 2200)
            .await
            .unwrap();

        let report = service
            .tdee_stats_as_of(user_id, date("2024-06-12"), None)
            .await
            .unwrap();

        match report {
            TdeeReport::InsufficientData {
                minimum_required,
                window_days,
            } => {
                assert_eq!(minimum_required, 3);
                assert_eq!(window_days, 28);
            }
            TdeeReport::Estimate(_) => panic!("expected insufficient data"),
        }
    }

    #[tokio::test]
    async fn insufficient_data_reports_the_window_used() {
        let (_dir, _store, service, user_id) = test_service();

        let report = service
            .tdee_stats_as_of(user_id, date("2024-06-12"), Some(7))
            .await
            .unwrap();

        match report {
            TdeeReport::InsufficientData { window_days, .. } => assert_eq!(window_days, 7),
            TdeeReport::Estimate(_) => panic!("expected insufficient data"),
        }
    }

    #[tokio::test]
    async fn stats_over_a_steady_week() {
        let (_dir, store, service, user_id) = test_service();

        for day in 1..=7 {
            log_entry(&store, user_id, &format!("2024-06-{day:02}"), 185.0, 2200)
                .await
                .unwrap();
        }

        let report = service
            .tdee_stats_as_of(user_id, date("2024-06-07"), None)
            .await
            .unwrap();

        match report {
            TdeeReport::Estimate(estimate) => {
                assert_eq!(estimate.current_tdee, 2200);
                assert_eq!(estimate.data_points, 7);
            }
            TdeeReport::InsufficientData { .. } => panic!("expected an estimate"),
        }
    }

    #[tokio::test]
    async fn entries_outside_the_window_are_excluded() {
        let (_dir, store, service, user_id) = test_service();

        // A stale outlier well before the window
        log_entry(&store, user_id, "2024-01-01", 250.0, 4000)
            .await
            .unwrap();
        for day in 10..=14 {
            log_entry(&store, user_id, &format!("2024-06-{day}"), 185.0, 2200)
                .await
                .unwrap();
        }

        let report = service
            .tdee_stats_as_of(user_id, date("2024-06-14"), Some(28))
            .await
            .unwrap();

        match report {
            TdeeReport::Estimate(estimate) => {
                assert_eq!(estimate.data_points, 5);
                assert!((estimate.weekly_average_weight - 185.0).abs() < f64::EPSILON);
            }
            TdeeReport::InsufficientData { .. } => panic!("expected an estimate"),
        }
    }

    #[tokio::test]
    async fn window_override_must_be_positive() {
        let (_dir, _store, service, user_id) = test_service();

        let err = service
            .tdee_stats_as_of(user_id, date("2024-06-12"), Some(0))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
