//! Domain errors - error types for the feed domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Guild not found: {0}")]
    GuildNotFound(Snowflake),

    #[error("Post not found: {0}")]
    PostNotFound(Snowflake),

    #[error("Reply not found: {0}")]
    ReplyNotFound(Snowflake),

    #[error("Post {0} has no poll")]
    PollNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Reply nesting exceeds the maximum depth of {max}")]
    DepthExceeded { max: u32 },

    #[error("Only question posts can have an accepted answer")]
    NotAQuestion,

    // =========================================================================
    // Authentication / Authorization Errors
    // =========================================================================
    #[error("Authentication required")]
    Unauthorized,

    #[error("Missing capability: {capability}")]
    Forbidden { capability: &'static str },

    #[error("Not an active member of this guild")]
    NotMember,

    #[error("Only the post author can do this")]
    NotPostAuthor,

    // =========================================================================
    // State Conflicts
    // =========================================================================
    #[error("Post is closed")]
    PostClosed,

    #[error("Already voted on this poll")]
    AlreadyVoted,

    #[error("Poll has expired")]
    PollClosed,

    #[error("An answer has already been accepted")]
    AnswerAlreadyAccepted,

    #[error("Concurrent modification, retry: {0}")]
    Conflict(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Shorthand for a validation failure
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::GuildNotFound(_) => "UNKNOWN_GUILD",
            Self::PostNotFound(_) => "UNKNOWN_POST",
            Self::ReplyNotFound(_) => "UNKNOWN_REPLY",
            Self::PollNotFound(_) => "UNKNOWN_POLL",

            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::DepthExceeded { .. } => "DEPTH_EXCEEDED",
            Self::NotAQuestion => "NOT_A_QUESTION",

            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden { .. } => "MISSING_PRIVILEGE",
            Self::NotMember => "NOT_MEMBER",
            Self::NotPostAuthor => "NOT_POST_AUTHOR",

            Self::PostClosed => "POST_CLOSED",
            Self::AlreadyVoted => "ALREADY_VOTED",
            Self::PollClosed => "POLL_CLOSED",
            Self::AnswerAlreadyAccepted => "ANSWER_ALREADY_ACCEPTED",
            Self::Conflict(_) => "CONFLICT",

            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::GuildNotFound(_)
                | Self::PostNotFound(_)
                | Self::ReplyNotFound(_)
                | Self::PollNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::DepthExceeded { .. } | Self::NotAQuestion
        )
    }

    /// Check if the caller is not authenticated
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Check if the caller is authenticated but not allowed
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::Forbidden { .. } | Self::NotMember | Self::NotPostAuthor
        )
    }

    /// Check if this is a state conflict
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::PostClosed
                | Self::AlreadyVoted
                | Self::PollClosed
                | Self::AnswerAlreadyAccepted
                | Self::Conflict(_)
        )
    }

    /// Whether repeating the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        if self.is_not_found() {
            404
        } else if self.is_unauthorized() {
            401
        } else if self.is_authorization() {
            403
        } else if self.is_validation() {
            400
        } else if self.is_conflict() {
            409
        } else {
            500
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(DomainError::PostNotFound(Snowflake::new(1)).code(), "UNKNOWN_POST");
        assert_eq!(DomainError::DepthExceeded { max: 3 }.code(), "DEPTH_EXCEEDED");
        assert_eq!(
            DomainError::Forbidden { capability: "canPinUnpin" }.code(),
            "MISSING_PRIVILEGE"
        );
    }

    #[test]
    fn test_categories() {
        assert!(DomainError::ReplyNotFound(Snowflake::new(1)).is_not_found());
        assert!(DomainError::Unauthorized.is_unauthorized());
        assert!(!DomainError::Unauthorized.is_authorization());
        assert!(DomainError::NotMember.is_authorization());
        assert!(DomainError::DepthExceeded { max: 3 }.is_validation());
        assert!(DomainError::PostClosed.is_conflict());
        assert!(DomainError::AnswerAlreadyAccepted.is_conflict());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(DomainError::Unauthorized.status_code(), 401);
        assert_eq!(DomainError::Forbidden { capability: "canDelete" }.status_code(), 403);
        assert_eq!(DomainError::GuildNotFound(Snowflake::new(1)).status_code(), 404);
        assert_eq!(DomainError::validation("title").status_code(), 400);
        assert_eq!(DomainError::AlreadyVoted.status_code(), 409);
        assert_eq!(DomainError::DatabaseError("down".into()).status_code(), 500);
    }

    #[test]
    fn test_only_conflict_is_retryable() {
        assert!(DomainError::Conflict("vote row changed".into()).is_retryable());
        assert!(!DomainError::AlreadyVoted.is_retryable());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            DomainError::DepthExceeded { max: 3 }.to_string(),
            "Reply nesting exceeds the maximum depth of 3"
        );
        assert_eq!(
            DomainError::Forbidden { capability: "canDelete" }.to_string(),
            "Missing capability: canDelete"
        );
    }
}
