//! Moderation service
//!
//! Pin, close and delete transitions plus accepted answers. Every action
//! is gated by exactly one capability; accepting is also open to the
//! question's author.

use chrono::Utc;
use feed_core::{DomainError, FeedContext, ModerationAction, Snowflake};
use tracing::{debug, info, instrument, warn};

use crate::dto::PostResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::post::PostService;
use super::reply::ReplyService;

/// Moderation service
pub struct ModerationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ModerationService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Apply a moderation action
    ///
    /// Returns the updated post, or `None` once it is deleted. Actions that
    /// would not change anything (pinning a pinned post) succeed without
    /// a write.
    #[instrument(skip(self, feed), fields(guild_id = %feed.guild_id))]
    pub async fn moderate(
        &self,
        feed: &FeedContext,
        post_id: Snowflake,
        action: ModerationAction,
    ) -> ServiceResult<Option<PostResponse>> {
        let viewer = feed.require(action.required_capability())?;
        let posts = PostService::new(self.ctx);
        let mut post = posts.find_in_guild(feed.guild_id, post_id).await?;

        if action.is_terminal() {
            self.ctx.post_repo().delete(post_id).await?;
            if let Err(e) = self.ctx.bookmarks().remove_post(post_id).await {
                // stale ids are filtered out when bookmarks are listed
                warn!(post_id = %post_id, error = %e, "Failed to drop bookmarks of deleted post");
            }
            info!(post_id = %post_id, moderator_id = %viewer.user_id, "Post deleted");
            return Ok(None);
        }

        let now = Utc::now();
        if !post.apply_moderation(action, now) {
            debug!(post_id = %post_id, action = action.as_str(), "Moderation action changes nothing");
            return posts.render_one(feed, post).await.map(Some);
        }

        let updated = if matches!(action, ModerationAction::Pin | ModerationAction::Unpin) {
            self.ctx
                .post_repo()
                .set_pinned(post_id, post.is_pinned, now)
                .await?
        } else {
            self.ctx
                .post_repo()
                .set_closed(post_id, post.is_closed)
                .await?
        };

        info!(
            post_id = %post_id,
            moderator_id = %viewer.user_id,
            action = action.as_str(),
            "Post moderated"
        );

        posts.render_one(feed, updated).await.map(Some)
    }

    /// Mark a reply as the accepted answer of a question
    ///
    /// Only the first acceptance wins; there is no reassignment.
    #[instrument(skip(self, feed), fields(guild_id = %feed.guild_id))]
    pub async fn accept_answer(
        &self,
        feed: &FeedContext,
        post_id: Snowflake,
        reply_id: Snowflake,
    ) -> ServiceResult<PostResponse> {
        let viewer = feed.require_member()?;
        let posts = PostService::new(self.ctx);
        let post = posts.find_in_guild(feed.guild_id, post_id).await?;

        if !post.is_author(viewer.user_id) && !feed.privileges.can_accept_on_behalf() {
            return Err(DomainError::NotPostAuthor.into());
        }
        post.ensure_can_accept()?;
        ReplyService::new(self.ctx)
            .find_in_post(post_id, reply_id)
            .await?;

        let updated = self.ctx.post_repo().accept_answer(post_id, reply_id).await?;

        info!(
            post_id = %post_id,
            reply_id = %reply_id,
            accepted_by = %viewer.user_id,
            "Answer accepted"
        );

        posts.render_one(feed, updated).await
    }
}
