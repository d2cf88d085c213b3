//! Post entity - a top-level discussion thread in a guild feed

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{MemberRole, Snowflake};

pub const TITLE_MIN_CHARS: usize = 5;
pub const TITLE_MAX_CHARS: usize = 200;
pub const BODY_MIN_CHARS: usize = 10;
pub const BODY_MAX_CHARS: usize = 5000;

/// Post category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PostTag {
    #[default]
    Discussion,
    Question,
    Insight,
    JobRelated,
}

impl PostTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Discussion => "discussion",
            Self::Question => "question",
            Self::Insight => "insight",
            Self::JobRelated => "job_related",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "discussion" => Some(Self::Discussion),
            "question" => Some(Self::Question),
            "insight" => Some(Self::Insight),
            "job_related" => Some(Self::JobRelated),
            _ => None,
        }
    }
}

/// Snapshot of the author taken when the post or reply was written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: Snowflake,
    pub display_name: String,
    pub role: MemberRole,
    pub reputation: i32,
}

/// Post entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    pub author: Author,
    pub title: String,
    pub body: String,
    pub tag: PostTag,
    pub created_at: DateTime<Utc>,
    pub upvote_count: i64,
    pub reply_count: i64,
    pub is_pinned: bool,
    pub pinned_at: Option<DateTime<Utc>>,
    pub is_closed: bool,
    pub accepted_reply_id: Option<Snowflake>,
}

impl Post {
    /// Create a new post. Title and body must already be validated.
    pub fn new(
        id: Snowflake,
        guild_id: Snowflake,
        author: Author,
        title: String,
        body: String,
        tag: PostTag,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            guild_id,
            author,
            title,
            body,
            tag,
            created_at,
            upvote_count: 0,
            reply_count: 0,
            is_pinned: false,
            pinned_at: None,
            is_closed: false,
            accepted_reply_id: None,
        }
    }

    /// Trim and length-check a title
    pub fn validate_title(title: &str) -> Result<String, DomainError> {
        let title = title.trim();
        let len = title.chars().count();
        if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&len) {
            return Err(DomainError::validation(format!(
                "Title must be between {TITLE_MIN_CHARS} and {TITLE_MAX_CHARS} characters"
            )));
        }
        Ok(title.to_string())
    }

    /// Trim and length-check a body
    pub fn validate_body(body: &str) -> Result<String, DomainError> {
        let body = body.trim();
        let len = body.chars().count();
        if !(BODY_MIN_CHARS..=BODY_MAX_CHARS).contains(&len) {
            return Err(DomainError::validation(format!(
                "Body must be between {BODY_MIN_CHARS} and {BODY_MAX_CHARS} characters"
            )));
        }
        Ok(body.to_string())
    }

    #[inline]
    pub fn is_question(&self) -> bool {
        self.tag == PostTag::Question
    }

    #[inline]
    pub fn is_author(&self, user_id: Snowflake) -> bool {
        self.author.id == user_id
    }

    /// Fails with `PostClosed` when the post no longer accepts replies
    pub fn ensure_open(&self) -> Result<(), DomainError> {
        if self.is_closed {
            return Err(DomainError::PostClosed);
        }
        Ok(())
    }

    /// Check whether an answer can be accepted on this post
    pub fn ensure_can_accept(&self) -> Result<(), DomainError> {
        if !self.is_question() {
            return Err(DomainError::NotAQuestion);
        }
        if self.accepted_reply_id.is_some() {
            return Err(DomainError::AnswerAlreadyAccepted);
        }
        Ok(())
    }

    /// Mark a reply as the accepted answer
    pub fn accept_answer(&mut self, reply_id: Snowflake) -> Result<(), DomainError> {
        self.ensure_can_accept()?;
        self.accepted_reply_id = Some(reply_id);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn author(id: i64) -> Author {
        Author {
            id: Snowflake::new(id),
            display_name: format!("user{id}"),
            role: MemberRole::Member,
            reputation: 0,
        }
    }

    pub fn post(id: i64, created_at: DateTime<Utc>) -> Post {
        Post::new(
            Snowflake::new(id),
            Snowflake::new(1),
            author(100),
            "A reasonable title".to_string(),
            "A body that is long enough".to_string(),
            PostTag::Discussion,
            created_at,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_post_defaults() {
        let post = fixtures::post(1, Utc::now());
        assert_eq!(post.upvote_count, 0);
        assert_eq!(post.reply_count, 0);
        assert!(!post.is_pinned);
        assert!(!post.is_closed);
        assert!(post.accepted_reply_id.is_none());
    }

    #[test]
    fn test_title_bounds_count_characters() {
        assert!(Post::validate_title("abcd").is_err());
        assert_eq!(Post::validate_title("  abcde  ").unwrap(), "abcde");
        assert!(Post::validate_title(&"é".repeat(200)).is_ok());
        assert!(Post::validate_title(&"a".repeat(201)).is_err());
        // whitespace padding does not count toward the minimum
        assert!(Post::validate_title("  ab  ").is_err());
    }

    #[test]
    fn test_body_bounds() {
        assert!(Post::validate_body("too short").is_err());
        assert!(Post::validate_body("exactly 10").is_ok());
        assert!(Post::validate_body(&"x".repeat(5001)).is_err());
    }

    #[test]
    fn test_accept_answer_only_once_on_questions() {
        let mut post = fixtures::post(1, Utc::now());
        assert!(matches!(
            post.accept_answer(Snowflake::new(5)),
            Err(DomainError::NotAQuestion)
        ));

        post.tag = PostTag::Question;
        post.accept_answer(Snowflake::new(5)).unwrap();
        assert!(matches!(
            post.accept_answer(Snowflake::new(6)),
            Err(DomainError::AnswerAlreadyAccepted)
        ));
        assert_eq!(post.accepted_reply_id, Some(Snowflake::new(5)));
    }

    #[test]
    fn test_closed_post_rejects() {
        let mut post = fixtures::post(1, Utc::now());
        assert!(post.ensure_open().is_ok());
        post.is_closed = true;
        assert!(matches!(post.ensure_open(), Err(DomainError::PostClosed)));
    }

    #[test]
    fn test_tag_parse() {
        assert_eq!(PostTag::parse("job_related"), Some(PostTag::JobRelated));
        assert_eq!(PostTag::parse(PostTag::Question.as_str()), Some(PostTag::Question));
        assert_eq!(PostTag::parse("news"), None);
    }
}
