//! Status tool
//!
//! Runtime status for the service: database connectivity, schema version,
//! and build metadata.

use serde::Serialize;

use crate::build_info::BuildInfo;
use crate::db::{migrations, Database};

/// Health/status report for the running service
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub status: &'static str, // "ok" | "degraded"
    pub timestamp: String,
    pub database: &'static str, // "connected" | "disconnected"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<i32>,
    pub build: BuildInfo,
}

/// Check database connectivity and report build metadata.
///
/// Never fails; a broken database shows up as a degraded report.
pub async fn status_report(db: &Database) -> StatusReport {
    let check = {
        let db = db.clone();
        tokio::task::spawn_blocking(move || -> Result<i32, String> {
            let conn = db.get_conn().map_err(|e| e.to_string())?;
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .map_err(|e| e.to_string())?;
            migrations::get_schema_version(&conn).map_err(|e| e.to_string())
        })
        .await
        .unwrap_or_else(|e| Err(e.to_string()))
    };

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    match check {
        Ok(version) => StatusReport {
            status: "ok",
            timestamp,
            database: "connected",
            database_error: None,
            schema_version: Some(version),
            build: BuildInfo::current(),
        },
        Err(error) => StatusReport {
            status: "degraded",
            timestamp,
            database: "disconnected",
            database_error: Some(error),
            schema_version: None,
            build: BuildInfo::current(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn healthy_database_reports_ok() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("status.db")).unwrap();
        {
            let conn = db.get_conn().unwrap();
            migrations::run_migrations(&conn).unwrap();
        }

        let report = status_report(&db).await;
        assert_eq!(report.status, "ok");
        assert_eq!(report.database, "connected");
        assert_eq!(report.schema_version, Some(1));
        assert!(report.database_error.is_none());
    }
}
