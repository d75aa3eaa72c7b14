//! Data models
//!
//! Rust structs representing database entities.

mod entry;
mod user;

pub use entry::{Entry, EntryUpdate, NewEntry};
pub use user::User;

/// Current UTC timestamp with microsecond precision.
///
/// Generated in Rust rather than via SQL defaults so that back-to-back
/// writes to the same row still get strictly increasing `updated_at` values.
pub(crate) fn timestamp_now() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}
