//! Error handling utilities for repositories

use feed_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    // lock timeouts and serialization failures are worth a retry
    if let Some(code) = e.as_database_error().and_then(|d| d.code()) {
        if matches!(code.as_ref(), "40001" | "40P01" | "55P03") {
            return DomainError::Conflict(e.to_string());
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Map a unique violation to `on_unique`, anything else as usual
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    map_db_error(e)
}

/// Page offset for 1-based pages
pub fn offset(page: u32, limit: u32) -> i64 {
    (i64::from(page.max(1)) - 1) * i64::from(limit)
}
