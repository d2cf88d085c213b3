//! Feed facade - the operation surface keyed by guild
//!
//! Each call resolves the caller's [`FeedContext`] once and hands it to
//! the service that owns the operation. Transport layers talk to this
//! type only.

use feed_core::{FeedContext, Snowflake};
use tracing::instrument;

use crate::dto::{
    AcceptAnswerRequest, BookmarkListResponse, BookmarkResponse, CastPollVoteRequest,
    CreatePostRequest, CreateReplyRequest, ListPostsQuery, ListRepliesQuery, ModeratePostRequest,
    PageResponse, PollResponse, PostResponse, ReplyResponse, VoteRequest, VoteResponse,
};

use super::access::AccessService;
use super::bookmark::BookmarkService;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::moderation::ModerationService;
use super::poll::PollService;
use super::post::PostService;
use super::reply::ReplyService;
use super::vote::VoteService;

/// Feed facade
pub struct FeedFacade<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FeedFacade<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    async fn context(
        &self,
        guild_id: Snowflake,
        user_id: Option<Snowflake>,
    ) -> ServiceResult<FeedContext> {
        AccessService::new(self.ctx).resolve(guild_id, user_id).await
    }

    // === Reads (anonymous allowed in public guilds) ===

    #[instrument(skip(self, query))]
    pub async fn list_posts(
        &self,
        guild_id: Snowflake,
        user_id: Option<Snowflake>,
        query: ListPostsQuery,
    ) -> ServiceResult<PageResponse<PostResponse>> {
        let feed = self.context(guild_id, user_id).await?;
        PostService::new(self.ctx).list(&feed, query).await
    }

    #[instrument(skip(self))]
    pub async fn get_post(
        &self,
        guild_id: Snowflake,
        user_id: Option<Snowflake>,
        post_id: Snowflake,
    ) -> ServiceResult<PostResponse> {
        let feed = self.context(guild_id, user_id).await?;
        PostService::new(self.ctx).get(&feed, post_id).await
    }

    #[instrument(skip(self, query))]
    pub async fn get_replies(
        &self,
        guild_id: Snowflake,
        user_id: Option<Snowflake>,
        post_id: Snowflake,
        query: ListRepliesQuery,
    ) -> ServiceResult<PageResponse<ReplyResponse>> {
        let feed = self.context(guild_id, user_id).await?;
        ReplyService::new(self.ctx).list(&feed, post_id, query).await
    }

    // === Mutations ===

    #[instrument(skip(self, request))]
    pub async fn create_post(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        request: CreatePostRequest,
    ) -> ServiceResult<PostResponse> {
        let feed = self.context(guild_id, Some(user_id)).await?;
        PostService::new(self.ctx).create(&feed, request).await
    }

    #[instrument(skip(self, request))]
    pub async fn create_reply(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        post_id: Snowflake,
        request: CreateReplyRequest,
    ) -> ServiceResult<ReplyResponse> {
        let feed = self.context(guild_id, Some(user_id)).await?;
        ReplyService::new(self.ctx).create(&feed, post_id, request).await
    }

    #[instrument(skip(self))]
    pub async fn vote(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        request: VoteRequest,
    ) -> ServiceResult<VoteResponse> {
        let feed = self.context(guild_id, Some(user_id)).await?;
        VoteService::new(self.ctx).toggle(&feed, request.target()).await
    }

    #[instrument(skip(self, request))]
    pub async fn cast_poll_vote(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        post_id: Snowflake,
        request: CastPollVoteRequest,
    ) -> ServiceResult<PollResponse> {
        let feed = self.context(guild_id, Some(user_id)).await?;
        PollService::new(self.ctx).cast(&feed, post_id, request).await
    }

    #[instrument(skip(self))]
    pub async fn accept_answer(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        post_id: Snowflake,
        request: AcceptAnswerRequest,
    ) -> ServiceResult<PostResponse> {
        let feed = self.context(guild_id, Some(user_id)).await?;
        ModerationService::new(self.ctx)
            .accept_answer(&feed, post_id, request.reply_id)
            .await
    }

    /// `None` after a delete
    #[instrument(skip(self))]
    pub async fn moderate_post(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        post_id: Snowflake,
        request: ModeratePostRequest,
    ) -> ServiceResult<Option<PostResponse>> {
        let feed = self.context(guild_id, Some(user_id)).await?;
        ModerationService::new(self.ctx)
            .moderate(&feed, post_id, request.action)
            .await
    }

    #[instrument(skip(self))]
    pub async fn toggle_bookmark(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        post_id: Snowflake,
    ) -> ServiceResult<BookmarkResponse> {
        let feed = self.context(guild_id, Some(user_id)).await?;
        BookmarkService::new(self.ctx).toggle(&feed, post_id).await
    }

    #[instrument(skip(self))]
    pub async fn list_bookmarks(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<BookmarkListResponse> {
        let feed = self.context(guild_id, Some(user_id)).await?;
        BookmarkService::new(self.ctx).list(&feed).await
    }
}
