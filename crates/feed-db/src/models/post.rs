//! Post database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the posts table
#[derive(Debug, Clone, FromRow)]
pub struct PostModel {
    pub id: i64,
    pub guild_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub author_role: String,
    pub author_reputation: i32,
    pub title: String,
    pub body: String,
    pub tag: String,
    pub created_at: DateTime<Utc>,
    pub upvote_count: i64,
    pub reply_count: i64,
    pub is_pinned: bool,
    pub pinned_at: Option<DateTime<Utc>>,
    pub is_closed: bool,
    pub accepted_reply_id: Option<i64>,
}

/// Column list shared by every post query
pub const POST_COLUMNS: &str = "id, guild_id, author_id, author_name, author_role, \
    author_reputation, title, body, tag, created_at, upvote_count, reply_count, \
    is_pinned, pinned_at, is_closed, accepted_reply_id";
