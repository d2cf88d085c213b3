//! Vote service - upvote toggles on posts and replies

use feed_core::{DomainError, FeedContext, VoteTarget};
use tracing::{info, instrument};

use crate::dto::VoteResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::post::PostService;

/// Vote service
pub struct VoteService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> VoteService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Flip the caller's upvote on `target`
    ///
    /// Closed posts and their replies can still be voted on. The returned
    /// count is authoritative and is what optimistic clients reconcile to.
    #[instrument(skip(self, feed), fields(guild_id = %feed.guild_id))]
    pub async fn toggle(&self, feed: &FeedContext, target: VoteTarget) -> ServiceResult<VoteResponse> {
        let viewer = feed.require_member()?;
        let posts = PostService::new(self.ctx);

        match target {
            VoteTarget::Post(post_id) => {
                posts.find_in_guild(feed.guild_id, post_id).await?;
            }
            VoteTarget::Reply(reply_id) => {
                let reply = self
                    .ctx
                    .reply_repo()
                    .find_by_id(reply_id)
                    .await?
                    .ok_or(DomainError::ReplyNotFound(reply_id))?;
                posts
                    .find_in_guild(feed.guild_id, reply.post_id)
                    .await
                    .map_err(|_| ServiceError::from(DomainError::ReplyNotFound(reply_id)))?;
            }
        }

        let outcome = self.ctx.vote_repo().toggle(viewer.user_id, target).await?;

        info!(
            user_id = %viewer.user_id,
            target = %target,
            voted = outcome.voted,
            new_count = outcome.new_count,
            "Vote toggled"
        );

        Ok(VoteResponse::from(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::fixture;
    use feed_core::{MemberRole, Membership, PostTag, Snowflake};

    #[tokio::test]
    async fn test_toggle_twice_restores_state() {
        let fx = fixture();
        let author = fx.member(10, MemberRole::Member, Membership::Active);
        let voter = fx.member(11, MemberRole::Member, Membership::Active);
        let post = fx
            .create_post(&fx.context(Some(author)).await, "Vote on me", PostTag::Insight)
            .await;

        let feed = fx.context(Some(voter)).await;
        let votes = VoteService::new(&fx.ctx);
        let target = VoteTarget::Post(post.id);

        let first = votes.toggle(&feed, target).await.unwrap();
        assert!(first.voted);
        assert_eq!(first.new_count, 1);

        let second = votes.toggle(&feed, target).await.unwrap();
        assert!(!second.voted);
        assert_eq!(second.new_count, 0);
        assert_eq!(fx.store.vote_rows(target), 0);
    }

    #[tokio::test]
    async fn test_vote_needs_active_membership() {
        let fx = fixture();
        let author = fx.member(10, MemberRole::Member, Membership::Active);
        let suspended = fx.member(12, MemberRole::Member, Membership::Suspended);
        let post = fx
            .create_post(&fx.context(Some(author)).await, "Vote on me", PostTag::Insight)
            .await;

        let err = VoteService::new(&fx.ctx)
            .toggle(&fx.context(Some(suspended)).await, VoteTarget::Post(post.id))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[tokio::test]
    async fn test_unknown_reply_target() {
        let fx = fixture();
        let voter = fx.member(11, MemberRole::Member, Membership::Active);

        let err = VoteService::new(&fx.ctx)
            .toggle(&fx.context(Some(voter)).await, VoteTarget::Reply(Snowflake::new(999)))
            .await
            .unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::ReplyNotFound(_))));
    }
}
