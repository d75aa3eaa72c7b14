//! Input validation
//!
//! Shapes are checked here, before anything reaches the stores or the
//! analytics engine. The engine itself assumes well-formed rows.

use chrono::NaiveDate;
use thiserror::Error;

/// Weight ceiling implied by the two-decimal storage format
const MAX_WEIGHT_LBS: f64 = 1000.0;

/// Validation error types
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("date must be in YYYY-MM-DD format: {0}")]
    InvalidDate(String),

    #[error("weight must be a positive number under 1000: {0}")]
    InvalidWeight(f64),

    #[error("calories must be a positive integer: {0}")]
    InvalidCalories(i64),

    #[error("window_days must be a positive integer: {0}")]
    InvalidWindowDays(i64),

    #[error("invalid email address: {0}")]
    InvalidEmail(String),
}

/// Parse a strict YYYY-MM-DD calendar date
pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))?;

    // chrono accepts unpadded fields; require the canonical form
    if date.format("%Y-%m-%d").to_string() != raw {
        return Err(ValidationError::InvalidDate(raw.to_string()));
    }

    Ok(date)
}

/// Validate a weight reading and normalize it to a two-decimal string
pub fn normalize_weight(raw: f64) -> Result<String, ValidationError> {
    if !raw.is_finite() || raw <= 0.0 || raw >= MAX_WEIGHT_LBS {
        return Err(ValidationError::InvalidWeight(raw));
    }
    Ok(format!("{:.2}", raw))
}

/// Validate a calorie count
pub fn validate_calories(raw: i64) -> Result<i64, ValidationError> {
    if raw <= 0 {
        return Err(ValidationError::InvalidCalories(raw));
    }
    Ok(raw)
}

/// Validate an analysis window length in days
pub fn validate_window_days(raw: i64) -> Result<u32, ValidationError> {
    u32::try_from(raw)
        .ok()
        .filter(|&days| days > 0)
        .ok_or(ValidationError::InvalidWindowDays(raw))
}

/// Minimal email shape check; real address verification is not this
/// service's job
pub fn validate_email(raw: &str) -> Result<&str, ValidationError> {
    let trimmed = raw.trim();
    let well_formed = trimmed
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());

    if !well_formed {
        return Err(ValidationError::InvalidEmail(raw.to_string()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_canonical_dates_only() {
        assert!(parse_date("2024-06-01").is_ok());
        assert!(parse_date("2024-6-1").is_err());
        assert!(parse_date("2024-06-01T00:00:00").is_err());
        assert!(parse_date("06/01/2024").is_err());
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn weight_is_normalized_to_two_decimals() {
        assert_eq!(normalize_weight(185.0).unwrap(), "185.00");
        assert_eq!(normalize_weight(185.456).unwrap(), "185.46");
        assert_eq!(normalize_weight(0.5).unwrap(), "0.50");
    }

    #[test]
    fn out_of_domain_weights_are_rejected() {
        assert!(normalize_weight(0.0).is_err());
        assert!(normalize_weight(-150.0).is_err());
        assert!(normalize_weight(1000.0).is_err());
        assert!(normalize_weight(f64::NAN).is_err());
        assert!(normalize_weight(f64::INFINITY).is_err());
    }

    #[test]
    fn calories_must_be_positive() {
        assert_eq!(validate_calories(2200).unwrap(), 2200);
        assert!(validate_calories(0).is_err());
        assert!(validate_calories(-100).is_err());
    }

    #[test]
    fn window_days_must_be_positive() {
        assert_eq!(validate_window_days(28).unwrap(), 28);
        assert_eq!(validate_window_days(1).unwrap(), 1);
        assert!(validate_window_days(0).is_err());
        assert!(validate_window_days(-7).is_err());
    }

    #[test]
    fn email_shape_check() {
        assert_eq!(validate_email("a@example.com").unwrap(), "a@example.com");
        assert_eq!(validate_email("  a@b  ").unwrap(), "a@b");
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("").is_err());
    }
}
