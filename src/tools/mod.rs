//! Service layer
//!
//! Validated operations over the stores, shared by the MCP surface and the
//! seed utility.

pub mod entries;
pub mod stats;
pub mod status;
pub mod users;
pub mod validation;

use thiserror::Error;

use crate::store::StoreError;

pub use validation::ValidationError;

/// Errors surfaced by service operations
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed input, rejected before it reaches the stores or the engine.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage-level failure or constraint violation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
