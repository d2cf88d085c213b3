//! Reply service
//!
//! Lazily loaded reply tree: one level per request, newest first.

use chrono::Utc;
use feed_core::{DomainError, FeedContext, FeedPrivileges, Reply, Snowflake, VoteTarget};
use std::collections::HashSet;
use tracing::{info, instrument};

use crate::dto::{CreateReplyRequest, ListRepliesQuery, PageResponse, ReplyResponse, ReplyView};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::post::PostService;

/// Reply service
pub struct ReplyService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReplyService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Direct children of a reply, or the top-level replies of a post
    #[instrument(skip(self, feed), fields(guild_id = %feed.guild_id))]
    pub async fn list(
        &self,
        feed: &FeedContext,
        post_id: Snowflake,
        query: ListRepliesQuery,
    ) -> ServiceResult<PageResponse<ReplyResponse>> {
        feed.ensure_can_read()?;

        let post = PostService::new(self.ctx)
            .find_in_guild(feed.guild_id, post_id)
            .await?;
        if let Some(parent_id) = query.parent_reply_id {
            self.find_in_post(post_id, parent_id).await?;
        }

        let page = self
            .ctx
            .reply_repo()
            .list_children(
                post_id,
                query.parent_reply_id,
                query.page.unwrap_or(1).max(1),
                self.ctx.page_size(query.limit),
            )
            .await?;

        let voted = match feed.user_id() {
            Some(user_id) => {
                let targets: Vec<VoteTarget> =
                    page.data.iter().map(|r| VoteTarget::Reply(r.id)).collect();
                self.ctx.vote_repo().voted_targets(user_id, &targets).await?
            }
            None => HashSet::new(),
        };

        let now = Utc::now();
        let hiding = self.ctx.score_hiding();
        let page = page.map(|reply| {
            ReplyResponse::from(ReplyView {
                upvote_count: hiding.visible_count(
                    reply.upvote_count,
                    reply.created_at,
                    now,
                    feed.privileges,
                ),
                score_hidden: hiding.is_hidden(reply.created_at, now),
                has_voted: voted.contains(&VoteTarget::Reply(reply.id)),
                is_accepted: post.accepted_reply_id == Some(reply.id),
                reply,
            })
        });

        Ok(PageResponse {
            data: page.data,
            total: page.total,
        })
    }

    /// Reply to a post or to another reply
    #[instrument(skip(self, feed, request), fields(guild_id = %feed.guild_id))]
    pub async fn create(
        &self,
        feed: &FeedContext,
        post_id: Snowflake,
        request: CreateReplyRequest,
    ) -> ServiceResult<ReplyResponse> {
        feed.require(FeedPrivileges::POST)?;
        let author = feed.author()?;
        let body = Reply::validate_body(&request.body)?;

        let post = PostService::new(self.ctx)
            .find_in_guild(feed.guild_id, post_id)
            .await?;
        post.ensure_open()?;

        let id = self.ctx.generate_id();
        let now = Utc::now();
        let reply = match request.parent_reply_id {
            Some(parent_id) => {
                self.find_in_post(post_id, parent_id).await?;
                let ancestry = self.ctx.reply_repo().ancestry(parent_id).await?;
                Reply::new_nested(id, post_id, parent_id, ancestry.len(), author, body, now)?
            }
            None => Reply::new(id, post_id, author, body, now),
        };

        // the store re-checks `is_closed` atomically with the insert
        let reply_count = self.ctx.reply_repo().create(&reply).await?;

        info!(
            reply_id = %reply.id,
            post_id = %post_id,
            depth = reply.depth,
            reply_count,
            "Reply created"
        );

        let hiding = self.ctx.score_hiding();
        Ok(ReplyResponse::from(ReplyView {
            upvote_count: hiding.visible_count(0, now, now, feed.privileges),
            score_hidden: hiding.is_hidden(now, now),
            has_voted: false,
            is_accepted: false,
            reply,
        }))
    }

    /// Load a reply, treating replies of other posts as missing
    pub(crate) async fn find_in_post(
        &self,
        post_id: Snowflake,
        reply_id: Snowflake,
    ) -> ServiceResult<Reply> {
        self.ctx
            .reply_repo()
            .find_by_id(reply_id)
            .await?
            .filter(|reply| reply.post_id == post_id)
            .ok_or(ServiceError::from(DomainError::ReplyNotFound(reply_id)))
    }
}
