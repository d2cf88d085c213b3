//! Poll database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the polls table
#[derive(Debug, Clone, FromRow)]
pub struct PollModel {
    pub post_id: i64,
    pub choice_mode: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub total_voters: i64,
    pub created_at: DateTime<Utc>,
}

/// Database model for the poll_options table
#[derive(Debug, Clone, FromRow)]
pub struct PollOptionModel {
    pub id: i64,
    pub post_id: i64,
    pub position: i32,
    pub text: String,
    pub vote_count: i64,
}

/// One row of poll_votes
#[derive(Debug, Clone, FromRow)]
pub struct PollSelectionModel {
    pub post_id: i64,
    pub option_id: i64,
}
