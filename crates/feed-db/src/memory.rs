//! In-memory store implementing every repository trait
//!
//! Backs the service and router tests. One mutex guards
//! the whole state, so each trait call is atomic in the same way a
//! PostgreSQL transaction is.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use feed_core::entities::{GuildSettings, MemberRecord, Poll, Post, Reply, VoteOutcome};
use feed_core::ranking::{rank, HotDecay, Page, PostQuery};
use feed_core::traits::{
    GuildAccessRepository, PollRepository, PostRepository, RepoResult, ReplyRepository,
    VoteRepository,
};
use feed_core::tree::ReplyForest;
use feed_core::value_objects::{Snowflake, VoteTarget};
use feed_core::DomainError;

#[derive(Debug, Default)]
struct State {
    guilds: HashMap<Snowflake, GuildSettings>,
    members: HashMap<(Snowflake, Snowflake), MemberRecord>,
    posts: HashMap<Snowflake, Post>,
    replies: ReplyForest,
    // (user, target)
    votes: HashSet<(Snowflake, VoteTarget)>,
    polls: HashMap<Snowflake, Poll>,
    // (post, user) -> selected options
    ballots: HashMap<(Snowflake, Snowflake), Vec<Snowflake>>,
}

/// Shared in-memory feed storage; clones share state
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a guild in the directory
    pub fn add_guild(&self, id: Snowflake, public_read: bool) {
        self.state
            .lock()
            .guilds
            .insert(id, GuildSettings { id, public_read });
    }

    /// Register or replace a membership record
    pub fn add_member(&self, record: MemberRecord) {
        self.state
            .lock()
            .members
            .insert((record.guild_id, record.user_id), record);
    }

    pub fn post_count(&self) -> usize {
        self.state.lock().posts.len()
    }

    pub fn reply_count(&self) -> usize {
        self.state.lock().replies.len()
    }

    /// Number of ledger rows for a target
    pub fn vote_rows(&self, target: VoteTarget) -> usize {
        self.state
            .lock()
            .votes
            .iter()
            .filter(|(_, t)| *t == target)
            .count()
    }
}

// ============================================================================
// Posts
// ============================================================================

#[async_trait]
impl PostRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>> {
        Ok(self.state.lock().posts.get(&id).cloned())
    }

    async fn find_many(&self, ids: &[Snowflake]) -> RepoResult<Vec<Post>> {
        let state = self.state.lock();
        Ok(ids
            .iter()
            .filter_map(|id| state.posts.get(id).cloned())
            .collect())
    }

    async fn list(
        &self,
        query: &PostQuery,
        now: DateTime<Utc>,
        decay: HotDecay,
    ) -> RepoResult<Page<Post>> {
        let state = self.state.lock();
        let posts = state
            .posts
            .values()
            .filter(|p| p.guild_id == query.guild_id)
            .cloned();
        Ok(rank(posts, query, now, decay))
    }

    async fn create(&self, post: &Post, poll: Option<&Poll>) -> RepoResult<()> {
        let mut state = self.state.lock();
        if state.posts.contains_key(&post.id) {
            return Err(DomainError::Conflict(format!("post {} exists", post.id)));
        }
        state.posts.insert(post.id, post.clone());
        if let Some(poll) = poll {
            state.polls.insert(post.id, poll.clone());
        }
        Ok(())
    }

    async fn set_pinned(
        &self,
        id: Snowflake,
        pinned: bool,
        now: DateTime<Utc>,
    ) -> RepoResult<Post> {
        let mut state = self.state.lock();
        let post = state
            .posts
            .get_mut(&id)
            .ok_or(DomainError::PostNotFound(id))?;

        post.is_pinned = pinned;
        post.pinned_at = if pinned {
            Some(post.pinned_at.unwrap_or(now))
        } else {
            None
        };
        Ok(post.clone())
    }

    async fn set_closed(&self, id: Snowflake, closed: bool) -> RepoResult<Post> {
        let mut state = self.state.lock();
        let post = state
            .posts
            .get_mut(&id)
            .ok_or(DomainError::PostNotFound(id))?;

        post.is_closed = closed;
        Ok(post.clone())
    }

    async fn accept_answer(&self, post_id: Snowflake, reply_id: Snowflake) -> RepoResult<Post> {
        let mut state = self.state.lock();
        let post = state
            .posts
            .get_mut(&post_id)
            .ok_or(DomainError::PostNotFound(post_id))?;

        if post.accepted_reply_id.is_some() {
            return Err(DomainError::AnswerAlreadyAccepted);
        }
        post.accepted_reply_id = Some(reply_id);
        Ok(post.clone())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut state = self.state.lock();
        if state.posts.remove(&id).is_none() {
            return Err(DomainError::PostNotFound(id));
        }

        let removed: HashSet<Snowflake> = state.replies.remove_post(id).into_iter().collect();
        state.votes.retain(|(_, target)| match target {
            VoteTarget::Post(post_id) => *post_id != id,
            VoteTarget::Reply(reply_id) => !removed.contains(reply_id),
        });
        state.polls.remove(&id);
        state.ballots.retain(|(post_id, _), _| *post_id != id);
        Ok(())
    }
}

// ============================================================================
// Replies
// ============================================================================

#[async_trait]
impl ReplyRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Reply>> {
        Ok(self.state.lock().replies.get(id).cloned())
    }

    async fn ancestry(&self, id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        Ok(self.state.lock().replies.ancestry(id))
    }

    async fn list_children(
        &self,
        post_id: Snowflake,
        parent_reply_id: Option<Snowflake>,
        page: u32,
        limit: u32,
    ) -> RepoResult<Page<Reply>> {
        Ok(self
            .state
            .lock()
            .replies
            .children(post_id, parent_reply_id, page, limit))
    }

    async fn create(&self, reply: &Reply) -> RepoResult<i64> {
        let mut state = self.state.lock();

        let post = state
            .posts
            .get(&reply.post_id)
            .ok_or(DomainError::PostNotFound(reply.post_id))?;
        post.ensure_open()?;

        if let Some(parent_id) = reply.parent_reply_id {
            match state.replies.get(parent_id) {
                Some(parent) if parent.post_id == reply.post_id => {}
                _ => return Err(DomainError::ReplyNotFound(parent_id)),
            }
        }

        state.replies.insert(reply.clone());
        let post = state
            .posts
            .get_mut(&reply.post_id)
            .ok_or(DomainError::PostNotFound(reply.post_id))?;
        post.reply_count += 1;
        Ok(post.reply_count)
    }
}

// ============================================================================
// Votes
// ============================================================================

#[async_trait]
impl VoteRepository for MemoryStore {
    async fn toggle(&self, user_id: Snowflake, target: VoteTarget) -> RepoResult<VoteOutcome> {
        let mut state = self.state.lock();
        let state = &mut *state;

        let counter = match target {
            VoteTarget::Post(id) => {
                &mut state
                    .posts
                    .get_mut(&id)
                    .ok_or(DomainError::PostNotFound(id))?
                    .upvote_count
            }
            VoteTarget::Reply(id) => {
                &mut state
                    .replies
                    .get_mut(id)
                    .ok_or(DomainError::ReplyNotFound(id))?
                    .upvote_count
            }
        };

        let key = (user_id, target);
        let voted = if state.votes.remove(&key) {
            *counter -= 1;
            false
        } else {
            state.votes.insert(key);
            *counter += 1;
            true
        };

        Ok(VoteOutcome {
            voted,
            new_count: *counter,
        })
    }

    async fn voted_targets(
        &self,
        user_id: Snowflake,
        targets: &[VoteTarget],
    ) -> RepoResult<HashSet<VoteTarget>> {
        let state = self.state.lock();
        Ok(targets
            .iter()
            .copied()
            .filter(|t| state.votes.contains(&(user_id, *t)))
            .collect())
    }
}

// ============================================================================
// Polls
// ============================================================================

#[async_trait]
impl PollRepository for MemoryStore {
    async fn find_by_post(&self, post_id: Snowflake) -> RepoResult<Option<Poll>> {
        Ok(self.state.lock().polls.get(&post_id).cloned())
    }

    async fn find_by_posts(&self, post_ids: &[Snowflake]) -> RepoResult<Vec<Poll>> {
        let state = self.state.lock();
        Ok(post_ids
            .iter()
            .filter_map(|id| state.polls.get(id).cloned())
            .collect())
    }

    async fn selections(
        &self,
        user_id: Snowflake,
        post_ids: &[Snowflake],
    ) -> RepoResult<HashMap<Snowflake, Vec<Snowflake>>> {
        let state = self.state.lock();
        Ok(post_ids
            .iter()
            .filter_map(|post_id| {
                state
                    .ballots
                    .get(&(*post_id, user_id))
                    .map(|options| (*post_id, options.clone()))
            })
            .collect())
    }

    async fn cast(
        &self,
        post_id: Snowflake,
        user_id: Snowflake,
        option_ids: &[Snowflake],
    ) -> RepoResult<Poll> {
        let mut state = self.state.lock();
        let state = &mut *state;

        let poll = state
            .polls
            .get_mut(&post_id)
            .ok_or(DomainError::PollNotFound(post_id))?;

        if poll.is_expired(Utc::now()) {
            return Err(DomainError::PollClosed);
        }
        if state.ballots.contains_key(&(post_id, user_id)) {
            return Err(DomainError::AlreadyVoted);
        }
        if option_ids.iter().any(|id| poll.option(*id).is_none()) {
            return Err(DomainError::validation("option does not belong to this poll"));
        }

        poll.record_ballot(option_ids);
        state.ballots.insert((post_id, user_id), option_ids.to_vec());
        Ok(poll.clone())
    }
}

// ============================================================================
// Guild directory
// ============================================================================

#[async_trait]
impl GuildAccessRepository for MemoryStore {
    async fn find_guild(&self, guild_id: Snowflake) -> RepoResult<Option<GuildSettings>> {
        Ok(self.state.lock().guilds.get(&guild_id).cloned())
    }

    async fn find_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<MemberRecord>> {
        Ok(self.state.lock().members.get(&(guild_id, user_id)).cloned())
    }
}
