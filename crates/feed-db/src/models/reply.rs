//! Reply database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the replies table
#[derive(Debug, Clone, FromRow)]
pub struct ReplyModel {
    pub id: i64,
    pub post_id: i64,
    pub parent_reply_id: Option<i64>,
    pub author_id: i64,
    pub author_name: String,
    pub author_role: String,
    pub author_reputation: i32,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub upvote_count: i64,
    pub child_count: i64,
    pub depth: i16,
}

pub const REPLY_COLUMNS: &str = "id, post_id, parent_reply_id, author_id, author_name, \
    author_role, author_reputation, body, created_at, upvote_count, child_count, depth";
