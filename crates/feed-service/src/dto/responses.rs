//! Response DTOs for API endpoints

use chrono::{DateTime, Utc};
use feed_core::{Author, ChoiceMode, PostTag, Snowflake};
use serde::Serialize;

// ============================================================================
// Generic Responses
// ============================================================================

/// One page of a list plus the total match count
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse<T> {
    pub data: Vec<T>,
    pub total: i64,
}

// ============================================================================
// Post Responses
// ============================================================================

/// A post as seen by one viewer
#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    pub author: Author,
    pub title: String,
    pub body: String,
    pub tag: PostTag,
    pub created_at: DateTime<Utc>,
    /// `null` while the score is withheld from this viewer
    pub upvote_count: Option<i64>,
    pub score_hidden: bool,
    pub has_voted: bool,
    pub reply_count: i64,
    pub is_pinned: bool,
    pub pinned_at: Option<DateTime<Utc>>,
    pub is_closed: bool,
    pub accepted_reply_id: Option<Snowflake>,
    pub is_bookmarked: bool,
    pub poll: Option<PollResponse>,
}

// ============================================================================
// Reply Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ReplyResponse {
    pub id: Snowflake,
    pub post_id: Snowflake,
    pub parent_reply_id: Option<Snowflake>,
    pub author: Author,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub upvote_count: Option<i64>,
    pub score_hidden: bool,
    pub has_voted: bool,
    pub is_accepted: bool,
    pub child_count: i64,
    pub depth: u32,
}

// ============================================================================
// Vote / Poll Responses
// ============================================================================

/// Authoritative state after an upvote toggle
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VoteResponse {
    pub voted: bool,
    pub new_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PollResponse {
    pub post_id: Snowflake,
    pub choice_mode: ChoiceMode,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_expired: bool,
    pub has_voted: bool,
    pub results_visible: bool,
    /// Unique voters
    pub total_votes: i64,
    pub options: Vec<PollOptionResponse>,
}

/// Counts are `null` until results are visible
#[derive(Debug, Clone, Serialize)]
pub struct PollOptionResponse {
    pub id: Snowflake,
    pub text: String,
    pub vote_count: Option<i64>,
    pub percentage: Option<u32>,
    pub has_voted: bool,
}

// ============================================================================
// Bookmark Responses
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BookmarkResponse {
    pub post_id: Snowflake,
    pub bookmarked: bool,
}

/// Bookmarked post ids in insertion order
#[derive(Debug, Clone, Serialize)]
pub struct BookmarkListResponse {
    pub post_ids: Vec<Snowflake>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each backing store
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub redis: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, redis_healthy: bool) -> Self {
        let all_healthy = database_healthy && redis_healthy;
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
                redis: if redis_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
