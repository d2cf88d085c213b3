//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate`. The limits here
//! give fast 400s; the services re-check the trimmed values.

use feed_core::{
    ChoiceMode, ModerationAction, PostTag, Snowflake, SortMode, TimeWindow, VoteTarget,
    VoteTargetKind,
};
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Post Requests
// ============================================================================

/// Create post request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 5, max = 200, message = "Title must be 5-200 characters"))]
    pub title: String,

    #[validate(length(min = 10, max = 5000, message = "Body must be 10-5000 characters"))]
    pub body: String,

    #[serde(default)]
    pub tag: PostTag,

    #[validate(nested)]
    pub poll: Option<CreatePollRequest>,
}

/// Poll attached to a new post
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePollRequest {
    #[validate(length(min = 2, max = 6, message = "A poll needs 2-6 options"))]
    pub options: Vec<String>,

    #[serde(default)]
    pub choice_mode: ChoiceMode,

    /// No expiry when absent
    #[validate(range(min = 1, max = 8760, message = "Expiry must be 1-8760 hours"))]
    pub expires_in_hours: Option<u32>,
}

/// Post list query string
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListPostsQuery {
    #[serde(default)]
    pub sort: SortMode,

    pub tag: Option<PostTag>,

    /// Only consulted by the `top` sort
    #[serde(default)]
    pub window: TimeWindow,

    #[validate(range(min = 1, message = "Page starts at 1"))]
    pub page: Option<u32>,

    #[validate(range(min = 1, message = "Limit must be positive"))]
    pub limit: Option<u32>,

    /// Restrict to the caller's bookmarks
    #[serde(default)]
    pub bookmarked: bool,
}

// ============================================================================
// Reply Requests
// ============================================================================

/// Create reply request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReplyRequest {
    #[validate(length(min = 1, max = 2000, message = "Reply must be 1-2000 characters"))]
    pub body: String,

    /// Top-level reply when absent
    pub parent_reply_id: Option<Snowflake>,
}

/// Reply ordering; only newest-first exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplySort {
    #[default]
    New,
}

/// Reply list query string
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListRepliesQuery {
    /// Children of this reply; top-level replies when absent
    pub parent_reply_id: Option<Snowflake>,

    #[serde(default)]
    pub sort: ReplySort,

    #[validate(range(min = 1, message = "Page starts at 1"))]
    pub page: Option<u32>,

    #[validate(range(min = 1, message = "Limit must be positive"))]
    pub limit: Option<u32>,
}

// ============================================================================
// Vote Requests
// ============================================================================

/// Upvote toggle request
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct VoteRequest {
    pub target_type: VoteTargetKind,
    pub target_id: Snowflake,
}

impl VoteRequest {
    pub fn target(&self) -> VoteTarget {
        VoteTarget::new(self.target_type, self.target_id)
    }
}

/// Poll ballot
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CastPollVoteRequest {
    #[validate(length(min = 1, max = 6, message = "Select 1-6 options"))]
    pub option_ids: Vec<Snowflake>,
}

// ============================================================================
// Moderation Requests
// ============================================================================

#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct AcceptAnswerRequest {
    pub reply_id: Snowflake,
}

#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct ModeratePostRequest {
    pub action: ModerationAction,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_request(title: &str, body: &str) -> CreatePostRequest {
        CreatePostRequest {
            title: title.to_string(),
            body: body.to_string(),
            tag: PostTag::Discussion,
            poll: None,
        }
    }

    #[test]
    fn test_create_post_validation() {
        assert!(post_request("Is remote OK?", "Asking for the whole team.")
            .validate()
            .is_ok());
        assert!(post_request("Hey", "Asking for the whole team.")
            .validate()
            .is_err());
        assert!(post_request("Is remote OK?", "Short").validate().is_err());
    }

    #[test]
    fn test_nested_poll_validation() {
        let mut request = post_request("Lunch options", "Where should we go on Friday?");
        request.poll = Some(CreatePollRequest {
            options: vec!["Tacos".to_string()],
            choice_mode: ChoiceMode::Single,
            expires_in_hours: None,
        });
        assert!(request.validate().is_err());

        request.poll = Some(CreatePollRequest {
            options: vec!["Tacos".to_string(), "Ramen".to_string()],
            choice_mode: ChoiceMode::Multiple,
            expires_in_hours: Some(0),
        });
        assert!(request.validate().is_err());

        if let Some(poll) = request.poll.as_mut() {
            poll.expires_in_hours = Some(24);
        }
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_post_deserializes_defaults() {
        let request: CreatePostRequest = serde_json::from_str(
            r#"{"title":"Is remote OK?","body":"Asking for the whole team.","poll":{"options":["Yes","No"]}}"#,
        )
        .unwrap();
        assert_eq!(request.tag, PostTag::Discussion);
        let poll = request.poll.unwrap();
        assert_eq!(poll.choice_mode, ChoiceMode::Single);
        assert_eq!(poll.expires_in_hours, None);
    }

    #[test]
    fn test_vote_request_target() {
        let request: VoteRequest =
            serde_json::from_str(r#"{"target_type":"reply","target_id":"42"}"#).unwrap();
        assert_eq!(request.target(), VoteTarget::Reply(Snowflake::new(42)));
    }

    #[test]
    fn test_reply_and_ballot_validation() {
        let empty = CreateReplyRequest {
            body: String::new(),
            parent_reply_id: None,
        };
        assert!(empty.validate().is_err());

        let ballot = CastPollVoteRequest { option_ids: vec![] };
        assert!(ballot.validate().is_err());
    }

    #[test]
    fn test_list_query_defaults() {
        let query = ListPostsQuery::default();
        assert_eq!(query.sort, SortMode::Hot);
        assert!(!query.bookmarked);
        assert!(query.validate().is_ok());

        let zero_page = ListPostsQuery {
            page: Some(0),
            ..Default::default()
        };
        assert!(zero_page.validate().is_err());
    }

    #[test]
    fn test_moderation_action_parsing() {
        let request: ModeratePostRequest = serde_json::from_str(r#"{"action":"pin"}"#).unwrap();
        assert_eq!(request.action, ModerationAction::Pin);
        assert!(serde_json::from_str::<ModeratePostRequest>(r#"{"action":"ban"}"#).is_err());
    }
}
