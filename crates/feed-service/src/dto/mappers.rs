//! Entity to DTO mappers
//!
//! Posts and replies are rendered per viewer, so the `*View` helper
//! structs carry the viewer-specific state next to the entity.

use feed_core::{OptionResult, PollResults, Post, Reply, VoteOutcome};

use super::responses::{
    PollOptionResponse, PollResponse, PostResponse, ReplyResponse, VoteResponse,
};

// ============================================================================
// Helper Structs
// ============================================================================

/// A post plus what one viewer knows about it
#[derive(Debug, Clone)]
pub struct PostView {
    pub post: Post,
    pub upvote_count: Option<i64>,
    pub score_hidden: bool,
    pub has_voted: bool,
    pub is_bookmarked: bool,
    pub poll: Option<PollResults>,
}

/// A reply plus what one viewer knows about it
#[derive(Debug, Clone)]
pub struct ReplyView {
    pub reply: Reply,
    pub upvote_count: Option<i64>,
    pub score_hidden: bool,
    pub has_voted: bool,
    pub is_accepted: bool,
}

// ============================================================================
// Post / Reply Mappers
// ============================================================================

impl From<PostView> for PostResponse {
    fn from(view: PostView) -> Self {
        let post = view.post;
        Self {
            id: post.id,
            guild_id: post.guild_id,
            author: post.author,
            title: post.title,
            body: post.body,
            tag: post.tag,
            created_at: post.created_at,
            upvote_count: view.upvote_count,
            score_hidden: view.score_hidden,
            has_voted: view.has_voted,
            reply_count: post.reply_count,
            is_pinned: post.is_pinned,
            pinned_at: post.pinned_at,
            is_closed: post.is_closed,
            accepted_reply_id: post.accepted_reply_id,
            is_bookmarked: view.is_bookmarked,
            poll: view.poll.map(PollResponse::from),
        }
    }
}

impl From<ReplyView> for ReplyResponse {
    fn from(view: ReplyView) -> Self {
        let reply = view.reply;
        Self {
            id: reply.id,
            post_id: reply.post_id,
            parent_reply_id: reply.parent_reply_id,
            author: reply.author,
            body: reply.body,
            created_at: reply.created_at,
            upvote_count: view.upvote_count,
            score_hidden: view.score_hidden,
            has_voted: view.has_voted,
            is_accepted: view.is_accepted,
            child_count: reply.child_count,
            depth: reply.depth,
        }
    }
}

// ============================================================================
// Vote / Poll Mappers
// ============================================================================

impl From<VoteOutcome> for VoteResponse {
    fn from(outcome: VoteOutcome) -> Self {
        Self {
            voted: outcome.voted,
            new_count: outcome.new_count,
        }
    }
}

impl From<PollResults> for PollResponse {
    fn from(results: PollResults) -> Self {
        Self {
            post_id: results.post_id,
            choice_mode: results.choice_mode,
            expires_at: results.expires_at,
            is_expired: results.is_expired,
            has_voted: results.has_voted,
            results_visible: results.results_visible,
            total_votes: results.total_votes,
            options: results
                .options
                .into_iter()
                .map(PollOptionResponse::from)
                .collect(),
        }
    }
}

impl From<OptionResult> for PollOptionResponse {
    fn from(option: OptionResult) -> Self {
        Self {
            id: option.id,
            text: option.text,
            vote_count: option.vote_count,
            percentage: option.percentage,
            has_voted: option.has_voted,
        }
    }
}
