//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Every counter change happens inside the
//! implementation, atomically with the row change that causes it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

use crate::entities::{GuildSettings, MemberRecord, Poll, Post, Reply, VoteOutcome};
use crate::error::DomainError;
use crate::ranking::{HotDecay, Page, PostQuery};
use crate::value_objects::{Snowflake, VoteTarget};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Post Repository
// ============================================================================

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find post by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>>;

    /// Find several posts; unknown ids are skipped
    async fn find_many(&self, ids: &[Snowflake]) -> RepoResult<Vec<Post>>;

    /// Filtered, ranked and paginated post list
    async fn list(
        &self,
        query: &PostQuery,
        now: DateTime<Utc>,
        decay: HotDecay,
    ) -> RepoResult<Page<Post>>;

    /// Insert a post together with its optional poll
    async fn create(&self, post: &Post, poll: Option<&Poll>) -> RepoResult<()>;

    /// Pin or unpin. Pinning an already pinned post keeps `pinned_at`.
    async fn set_pinned(&self, id: Snowflake, pinned: bool, now: DateTime<Utc>)
        -> RepoResult<Post>;

    /// Close or reopen
    async fn set_closed(&self, id: Snowflake, closed: bool) -> RepoResult<Post>;

    /// Set `accepted_reply_id` only if it is still unset
    ///
    /// Fails with `AnswerAlreadyAccepted` when another answer won.
    async fn accept_answer(&self, post_id: Snowflake, reply_id: Snowflake) -> RepoResult<Post>;

    /// Hard delete with cascade to replies, votes and the poll
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Reply Repository
// ============================================================================

#[async_trait]
pub trait ReplyRepository: Send + Sync {
    /// Find reply by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Reply>>;

    /// `id` followed by its ancestors, top-level reply last
    async fn ancestry(&self, id: Snowflake) -> RepoResult<Vec<Snowflake>>;

    /// One level of the tree, newest first
    async fn list_children(
        &self,
        post_id: Snowflake,
        parent_reply_id: Option<Snowflake>,
        page: u32,
        limit: u32,
    ) -> RepoResult<Page<Reply>>;

    /// Insert a reply, bump the post's `reply_count` and the parent's
    /// `child_count`. Fails with `PostClosed` if the post is closed.
    ///
    /// Returns the post's new reply count.
    async fn create(&self, reply: &Reply) -> RepoResult<i64>;
}

// ============================================================================
// Vote Repository
// ============================================================================

#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// Toggle the caller's upvote and return the authoritative state
    async fn toggle(&self, user_id: Snowflake, target: VoteTarget) -> RepoResult<VoteOutcome>;

    /// Which of `targets` the user has upvoted
    async fn voted_targets(
        &self,
        user_id: Snowflake,
        targets: &[VoteTarget],
    ) -> RepoResult<HashSet<VoteTarget>>;
}

// ============================================================================
// Poll Repository
// ============================================================================

#[async_trait]
pub trait PollRepository: Send + Sync {
    /// Find the poll attached to a post
    async fn find_by_post(&self, post_id: Snowflake) -> RepoResult<Option<Poll>>;

    /// Polls attached to any of `post_ids`
    async fn find_by_posts(&self, post_ids: &[Snowflake]) -> RepoResult<Vec<Poll>>;

    /// Options the user selected, keyed by post id; posts without a
    /// ballot are absent
    async fn selections(
        &self,
        user_id: Snowflake,
        post_ids: &[Snowflake],
    ) -> RepoResult<HashMap<Snowflake, Vec<Snowflake>>>;

    /// Record a validated ballot. Fails with `AlreadyVoted` if the user
    /// already has one.
    async fn cast(
        &self,
        post_id: Snowflake,
        user_id: Snowflake,
        option_ids: &[Snowflake],
    ) -> RepoResult<Poll>;
}

// ============================================================================
// Guild Access Repository
// ============================================================================

/// Read-only view of the externally owned guild directory
#[async_trait]
pub trait GuildAccessRepository: Send + Sync {
    async fn find_guild(&self, guild_id: Snowflake) -> RepoResult<Option<GuildSettings>>;

    async fn find_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<MemberRecord>>;
}

// ============================================================================
// Bookmark Index
// ============================================================================

#[async_trait]
pub trait BookmarkIndex: Send + Sync {
    /// Flip membership and return the new state
    async fn toggle(&self, user_id: Snowflake, post_id: Snowflake) -> RepoResult<bool>;

    /// Which of `post_ids` the user has bookmarked
    async fn contains_any(
        &self,
        user_id: Snowflake,
        post_ids: &[Snowflake],
    ) -> RepoResult<HashSet<Snowflake>>;

    /// All bookmarked posts in insertion order
    async fn list(&self, user_id: Snowflake) -> RepoResult<Vec<Snowflake>>;

    /// Forget a deleted post for every user
    async fn remove_post(&self, post_id: Snowflake) -> RepoResult<()>;
}
