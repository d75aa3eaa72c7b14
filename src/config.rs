//! Runtime configuration
//!
//! Settings are resolved from the environment once at startup and passed
//! explicitly into the components that need them; nothing reads globals
//! after that.

use std::path::PathBuf;

use tracing::warn;

/// Tuning knobs for the stats service
#[derive(Debug, Clone, Copy)]
pub struct StatsConfig {
    /// Analysis window when the caller does not override it (days).
    pub default_window_days: u32,
    /// Daily weight-change band treated as maintaining (lbs/day).
    /// 0.02 lbs/day is ~0.14 lbs/week, below typical scale noise.
    pub maintaining_threshold: f64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            default_window_days: 28,
            maintaining_threshold: 0.02,
        }
    }
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub stats: StatsConfig,
}

impl Config {
    /// Read configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable
    pub fn from_env() -> Self {
        let database_path = std::env::var("TDEE_TRACKER_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_database_path());

        let mut stats = StatsConfig::default();

        if let Ok(raw) = std::env::var("TDEE_TRACKER_WINDOW_DAYS") {
            match raw.parse::<u32>() {
                Ok(days) if days > 0 => stats.default_window_days = days,
                _ => warn!("ignoring invalid TDEE_TRACKER_WINDOW_DAYS: {raw}"),
            }
        }

        if let Ok(raw) = std::env::var("TDEE_TRACKER_MAINTAIN_THRESHOLD") {
            match raw.parse::<f64>() {
                Ok(threshold) if threshold > 0.0 => stats.maintaining_threshold = threshold,
                _ => warn!("ignoring invalid TDEE_TRACKER_MAINTAIN_THRESHOLD: {raw}"),
            }
        }

        Self {
            database_path,
            stats,
        }
    }
}

/// Default database location: data/ under the project root when running from
/// target/, otherwise next to the executable
fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to the project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(parent) = path.parent() {
            if let Some(grandparent) = parent.parent() {
                path = grandparent.to_path_buf();
            }
        }
    }

    path.push("data");
    path.push("tdee-tracker.db");
    path
}
