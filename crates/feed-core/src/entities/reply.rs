//! Reply entity - a node in a post's reply forest

use chrono::{DateTime, Utc};

use super::Author;
use crate::error::DomainError;
use crate::value_objects::Snowflake;

pub const REPLY_BODY_MAX_CHARS: usize = 2000;

/// Maximum nesting depth. Top-level replies have depth 1.
pub const MAX_REPLY_DEPTH: u32 = 3;

/// Reply entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub id: Snowflake,
    pub post_id: Snowflake,
    pub parent_reply_id: Option<Snowflake>,
    pub author: Author,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub upvote_count: i64,
    pub child_count: i64,
    pub depth: u32,
}

impl Reply {
    /// Create a top-level reply
    pub fn new(
        id: Snowflake,
        post_id: Snowflake,
        author: Author,
        body: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            post_id,
            parent_reply_id: None,
            author,
            body,
            created_at,
            upvote_count: 0,
            child_count: 0,
            depth: 1,
        }
    }

    /// Create a reply nested under `parent_id`
    ///
    /// `ancestor_count` is the length of the parent's ancestry chain,
    /// the parent included.
    pub fn new_nested(
        id: Snowflake,
        post_id: Snowflake,
        parent_id: Snowflake,
        ancestor_count: usize,
        author: Author,
        body: String,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let depth = Self::depth_below(ancestor_count)?;
        Ok(Self {
            parent_reply_id: Some(parent_id),
            depth,
            ..Self::new(id, post_id, author, body, created_at)
        })
    }

    /// Depth of a new reply whose parent chain has `ancestor_count` nodes
    pub fn depth_below(ancestor_count: usize) -> Result<u32, DomainError> {
        let depth = u32::try_from(ancestor_count)
            .unwrap_or(u32::MAX)
            .saturating_add(1);
        if depth > MAX_REPLY_DEPTH {
            return Err(DomainError::DepthExceeded {
                max: MAX_REPLY_DEPTH,
            });
        }
        Ok(depth)
    }

    /// Trim and length-check a reply body
    pub fn validate_body(body: &str) -> Result<String, DomainError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(DomainError::validation("Reply body cannot be empty"));
        }
        if body.chars().count() > REPLY_BODY_MAX_CHARS {
            return Err(DomainError::validation(format!(
                "Reply body cannot exceed {REPLY_BODY_MAX_CHARS} characters"
            )));
        }
        Ok(body.to_string())
    }

    #[inline]
    pub fn is_top_level(&self) -> bool {
        self.parent_reply_id.is_none()
    }

    /// Whether another reply may be nested under this one
    #[inline]
    pub fn accepts_children(&self) -> bool {
        self.depth < MAX_REPLY_DEPTH
    }
}
