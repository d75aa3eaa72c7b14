//! Analytics module
//!
//! Pure weight-trend and TDEE computations; no I/O, safe to call from
//! anywhere.

pub mod tdee;

pub use tdee::{
    calculate_tdee, calculate_tdee_with, linear_regression_slope, TdeeEstimate, TdeeParams,
    WeightTrend,
};
