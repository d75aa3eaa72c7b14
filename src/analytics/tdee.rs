//! TDEE (Total Daily Energy Expenditure) estimation
//!
//! Derives an empirical TDEE from a run of daily (weight, calories) entries:
//! average intake, plus the energy equivalent of the observed weight-change
//! rate. The weight-change rate is the least-squares slope of weight against
//! day index.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Entry;

// === Constants ===

/// Energy equivalent of one pound of body mass (kcal).
pub const CALORIES_PER_POUND: f64 = 3500.0;

/// Daily weight-change band treated as maintaining (lbs/day, ~0.14 lbs/week).
pub const MAINTAINING_THRESHOLD: f64 = 0.02;

/// Minimum entries required for an estimate.
pub const MIN_DATA_POINTS: usize = 3;

// === Data Structures ===

/// Direction of the weight trend over the analysis window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightTrend {
    Gaining,
    Losing,
    Maintaining,
}

impl WeightTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightTrend::Gaining => "gaining",
            WeightTrend::Losing => "losing",
            WeightTrend::Maintaining => "maintaining",
        }
    }
}

/// TDEE estimate over one analysis window.
///
/// Field names on the wire follow the stats API contract.
#[derive(Debug, Clone, Serialize)]
pub struct TdeeEstimate {
    /// Estimated maintenance intake, kcal/day.
    #[serde(rename = "currentTDEE")]
    pub current_tdee: i64,
    /// Mean weight over the window, rounded to two decimals.
    #[serde(rename = "weeklyAverageWeight")]
    pub weekly_average_weight: f64,
    /// Mean intake over the window, rounded to the nearest kcal.
    #[serde(rename = "weeklyAverageCalories")]
    pub weekly_average_calories: i64,
    #[serde(rename = "weightTrend")]
    pub weight_trend: WeightTrend,
    /// Entries that contributed to the estimate.
    #[serde(rename = "dataPoints")]
    pub data_points: usize,
}

/// Tuning parameters for [`calculate_tdee_with`]
#[derive(Debug, Clone, Copy)]
pub struct TdeeParams {
    pub calories_per_pound: f64,
    pub maintaining_threshold: f64,
    pub min_data_points: usize,
}

impl Default for TdeeParams {
    fn default() -> Self {
        Self {
            calories_per_pound: CALORIES_PER_POUND,
            maintaining_threshold: MAINTAINING_THRESHOLD,
            min_data_points: MIN_DATA_POINTS,
        }
    }
}

// === Calculation Functions ===

/// Least-squares slope of (x, y) pairs: change in y per unit x.
///
/// Fewer than two points, or all x identical, yields 0.
pub fn linear_regression_slope(points: &[(f64, f64)]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let n = points.len() as f64;

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;
    for (x, y) in points {
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }

    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return 0.0;
    }

    (n * sum_xy - sum_x * sum_y) / denominator
}

/// [`calculate_tdee_with`] using the default parameters
pub fn calculate_tdee(entries: &[Entry]) -> Option<TdeeEstimate> {
    calculate_tdee_with(&TdeeParams::default(), entries)
}

/// Estimate TDEE from a window of daily entries.
///
/// Input order does not matter; entries are sorted by date internally. The
/// x axis is calendar-day offset from the earliest entry (pure `NaiveDate`
/// arithmetic, so no DST or wall-clock skew). Returns `None` when fewer than
/// `min_data_points` usable entries are present; never fails otherwise.
pub fn calculate_tdee_with(params: &TdeeParams, entries: &[Entry]) -> Option<TdeeEstimate> {
    // Rows are validated before they are stored; anything unreadable here is
    // skipped rather than poisoning the regression.
    let mut observations: Vec<(NaiveDate, f64, i64)> = entries
        .iter()
        .filter_map(|entry| {
            let date = NaiveDate::parse_from_str(&entry.date, "%Y-%m-%d").ok()?;
            let weight: f64 = entry.weight.parse().ok()?;
            Some((date, weight, entry.calories))
        })
        .collect();

    if observations.len() < params.min_data_points {
        return None;
    }

    observations.sort_by_key(|(date, _, _)| *date);
    let base_date = observations[0].0;

    let mut points = Vec::with_capacity(observations.len());
    let mut total_weight = 0.0;
    let mut total_calories = 0.0;
    for (date, weight, calories) in &observations {
        let day_index = (*date - base_date).num_days() as f64;
        points.push((day_index, *weight));
        total_weight += weight;
        total_calories += *calories as f64;
    }

    let count = observations.len() as f64;
    let avg_weight = total_weight / count;
    let avg_calories = total_calories / count;

    // lbs/day; positive means gaining
    let daily_weight_change = linear_regression_slope(&points);

    // Energy balance: weightChange (lbs/day) = (intake - TDEE) / kcal-per-lb,
    // so TDEE = intake - weightChange * kcal-per-lb.
    let current_tdee =
        (avg_calories - daily_weight_change * params.calories_per_pound).round() as i64;

    let weight_trend = if daily_weight_change > params.maintaining_threshold {
        WeightTrend::Gaining
    } else if daily_weight_change < -params.maintaining_threshold {
        WeightTrend::Losing
    } else {
        WeightTrend::Maintaining
    };

    Some(TdeeEstimate {
        current_tdee,
        weekly_average_weight: (avg_weight * 100.0).round() / 100.0,
        weekly_average_calories: avg_calories.round() as i64,
        weight_trend,
        data_points: observations.len(),
    })
}

// === Unit Tests ===
