//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use feed_common::AppError;
use feed_core::DomainError;
use std::fmt;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation or wrapped storage failure
    Domain(DomainError),

    /// Application error (auth, configuration, etc.)
    App(AppError),

    /// Validation error
    Validation(String),

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// The wrapped domain error, if any
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(AppError::Domain(e)) => Some(e),
            _ => None,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => e.status_code(),
            Self::App(e) => e.status_code(),
            Self::Validation(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use feed_core::Snowflake;

    #[test]
    fn test_domain_error_keeps_its_code() {
        let err = ServiceError::from(DomainError::DepthExceeded { max: 3 });
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "DEPTH_EXCEEDED");
        assert!(matches!(err.as_domain(), Some(DomainError::DepthExceeded { .. })));

        let err = ServiceError::from(DomainError::Unauthorized);
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn test_validation_error() {
        let err = ServiceError::validation("Title too short");
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_internal_error() {
        let err = ServiceError::internal("post vanished");
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_app_error_keeps_its_code() {
        let err = ServiceError::from(AppError::InvalidToken);
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.error_code(), "INVALID_TOKEN");

        let err = ServiceError::from(AppError::Domain(DomainError::PostNotFound(Snowflake::new(9))));
        assert!(matches!(err.as_domain(), Some(DomainError::PostNotFound(_))));
    }
}
