//! Bookmark service

use feed_core::{FeedContext, Snowflake};
use std::collections::HashSet;
use tracing::{info, instrument};

use crate::dto::{BookmarkListResponse, BookmarkResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::post::PostService;

/// Bookmark service
pub struct BookmarkService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BookmarkService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Flip the caller's bookmark on a post
    #[instrument(skip(self, feed), fields(guild_id = %feed.guild_id))]
    pub async fn toggle(
        &self,
        feed: &FeedContext,
        post_id: Snowflake,
    ) -> ServiceResult<BookmarkResponse> {
        let viewer = feed.require_member()?;
        PostService::new(self.ctx)
            .find_in_guild(feed.guild_id, post_id)
            .await?;

        let bookmarked = self.ctx.bookmarks().toggle(viewer.user_id, post_id).await?;

        info!(user_id = %viewer.user_id, post_id = %post_id, bookmarked, "Bookmark toggled");

        Ok(BookmarkResponse {
            post_id,
            bookmarked,
        })
    }

    /// The caller's bookmarks in this guild, in insertion order
    ///
    /// The index is global per user; ids of other guilds and of posts
    /// that no longer exist are dropped here.
    #[instrument(skip(self, feed), fields(guild_id = %feed.guild_id))]
    pub async fn list(&self, feed: &FeedContext) -> ServiceResult<BookmarkListResponse> {
        feed.ensure_can_read()?;
        let viewer = feed.require_viewer()?;

        let ids = self.ctx.bookmarks().list(viewer.user_id).await?;
        let in_guild: HashSet<Snowflake> = self
            .ctx
            .post_repo()
            .find_many(&ids)
            .await?
            .into_iter()
            .filter(|post| post.guild_id == feed.guild_id)
            .map(|post| post.id)
            .collect();

        Ok(BookmarkListResponse {
            post_ids: ids.into_iter().filter(|id| in_guild.contains(id)).collect(),
        })
    }
}
