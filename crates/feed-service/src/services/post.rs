//! Post service
//!
//! Ranked listing, detail and creation. Also renders posts for a viewer
//! (vote, bookmark and poll state) on behalf of the other services.

use chrono::Utc;
use feed_core::{
    DomainError, FeedContext, FeedPrivileges, Poll, Post, PostQuery, Snowflake, VoteTarget,
    POLL_MAX_EXPIRY_HOURS,
};
use std::collections::{HashMap, HashSet};
use tracing::{info, instrument, warn};

use crate::dto::{CreatePostRequest, ListPostsQuery, PageResponse, PostResponse, PostView};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Post service
pub struct PostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Ranked, filtered and paginated posts of the viewer's guild
    #[instrument(skip(self, feed), fields(guild_id = %feed.guild_id))]
    pub async fn list(
        &self,
        feed: &FeedContext,
        query: ListPostsQuery,
    ) -> ServiceResult<PageResponse<PostResponse>> {
        feed.ensure_can_read()?;

        let only_ids = if query.bookmarked {
            let viewer = feed.require_viewer()?;
            Some(self.ctx.bookmarks().list(viewer.user_id).await?)
        } else {
            None
        };

        let post_query = PostQuery {
            guild_id: feed.guild_id,
            sort: query.sort,
            tag: query.tag,
            window: query.window,
            page: query.page.unwrap_or(1).max(1),
            limit: self.ctx.page_size(query.limit),
            only_ids,
        };

        let page = self
            .ctx
            .post_repo()
            .list(&post_query, Utc::now(), self.ctx.hot_decay())
            .await?;

        Ok(PageResponse {
            data: self.render(feed, page.data).await?,
            total: page.total,
        })
    }

    /// Post detail
    #[instrument(skip(self, feed), fields(guild_id = %feed.guild_id))]
    pub async fn get(&self, feed: &FeedContext, post_id: Snowflake) -> ServiceResult<PostResponse> {
        feed.ensure_can_read()?;
        let post = self.find_in_guild(feed.guild_id, post_id).await?;
        self.render_one(feed, post).await
    }

    /// Create a post with an optional poll
    #[instrument(skip(self, feed, request), fields(guild_id = %feed.guild_id))]
    pub async fn create(
        &self,
        feed: &FeedContext,
        request: CreatePostRequest,
    ) -> ServiceResult<PostResponse> {
        feed.require(FeedPrivileges::POST)?;
        let author = feed.author()?;

        let title = Post::validate_title(&request.title)?;
        let body = Post::validate_body(&request.body)?;

        let now = Utc::now();
        let post = Post::new(
            self.ctx.generate_id(),
            feed.guild_id,
            author,
            title,
            body,
            request.tag,
            now,
        );

        let poll = match request.poll {
            Some(poll) => {
                if poll
                    .expires_in_hours
                    .is_some_and(|h| !(1..=POLL_MAX_EXPIRY_HOURS).contains(&h))
                {
                    return Err(ServiceError::validation(format!(
                        "Poll expiry must be between 1 and {POLL_MAX_EXPIRY_HOURS} hours"
                    )));
                }
                Some(Poll::new(
                    post.id,
                    poll.choice_mode,
                    &poll.options,
                    poll.expires_in_hours,
                    now,
                    || self.ctx.generate_id(),
                )?)
            }
            None => None,
        };

        self.ctx.post_repo().create(&post, poll.as_ref()).await?;

        info!(
            post_id = %post.id,
            guild_id = %post.guild_id,
            tag = post.tag.as_str(),
            has_poll = poll.is_some(),
            "Post created"
        );

        let hiding = self.ctx.score_hiding();
        Ok(PostResponse::from(PostView {
            upvote_count: hiding.visible_count(0, now, now, feed.privileges),
            score_hidden: hiding.is_hidden(now, now),
            has_voted: false,
            is_bookmarked: false,
            poll: poll.map(|poll| poll.results(&[], now)),
            post,
        }))
    }

    // === Helpers shared with the other services ===

    /// Load a post, treating posts of other guilds as missing
    pub(crate) async fn find_in_guild(
        &self,
        guild_id: Snowflake,
        post_id: Snowflake,
    ) -> ServiceResult<Post> {
        self.ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .filter(|post| post.guild_id == guild_id)
            .ok_or(ServiceError::from(DomainError::PostNotFound(post_id)))
    }

    pub(crate) async fn render_one(
        &self,
        feed: &FeedContext,
        post: Post,
    ) -> ServiceResult<PostResponse> {
        let id = post.id;
        self.render(feed, vec![post])
            .await?
            .pop()
            .ok_or_else(|| ServiceError::internal(format!("post {id} vanished while rendering")))
    }

    /// Attach the viewer's vote, bookmark and poll state
    pub(crate) async fn render(
        &self,
        feed: &FeedContext,
        posts: Vec<Post>,
    ) -> ServiceResult<Vec<PostResponse>> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Snowflake> = posts.iter().map(|post| post.id).collect();
        let user_id = feed.user_id();

        let (voted, bookmarked, polls, selections) = tokio::try_join!(
            self.voted(user_id, &ids),
            self.bookmarked(user_id, &ids),
            self.polls(&ids),
            self.selections(user_id, &ids),
        )?;

        let now = Utc::now();
        let hiding = self.ctx.score_hiding();

        Ok(posts
            .into_iter()
            .map(|post| {
                let selected = selections.get(&post.id).map(Vec::as_slice).unwrap_or(&[]);
                PostResponse::from(PostView {
                    upvote_count: hiding.visible_count(
                        post.upvote_count,
                        post.created_at,
                        now,
                        feed.privileges,
                    ),
                    score_hidden: hiding.is_hidden(post.created_at, now),
                    has_voted: voted.contains(&VoteTarget::Post(post.id)),
                    is_bookmarked: bookmarked.contains(&post.id),
                    poll: polls.get(&post.id).map(|poll| poll.results(selected, now)),
                    post,
                })
            })
            .collect())
    }

    async fn voted(
        &self,
        user_id: Option<Snowflake>,
        ids: &[Snowflake],
    ) -> ServiceResult<HashSet<VoteTarget>> {
        let Some(user_id) = user_id else {
            return Ok(HashSet::new());
        };
        let targets: Vec<VoteTarget> = ids.iter().copied().map(VoteTarget::Post).collect();
        Ok(self.ctx.vote_repo().voted_targets(user_id, &targets).await?)
    }

    /// Bookmarks are a soft dependency; a failing index renders as "none"
    async fn bookmarked(
        &self,
        user_id: Option<Snowflake>,
        ids: &[Snowflake],
    ) -> ServiceResult<HashSet<Snowflake>> {
        let Some(user_id) = user_id else {
            return Ok(HashSet::new());
        };
        match self.ctx.bookmarks().contains_any(user_id, ids).await {
            Ok(set) => Ok(set),
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Bookmark lookup failed, rendering without bookmarks");
                Ok(HashSet::new())
            }
        }
    }

    async fn polls(&self, ids: &[Snowflake]) -> ServiceResult<HashMap<Snowflake, Poll>> {
        let polls = self.ctx.poll_repo().find_by_posts(ids).await?;
        Ok(polls.into_iter().map(|poll| (poll.post_id, poll)).collect())
    }

    async fn selections(
        &self,
        user_id: Option<Snowflake>,
        ids: &[Snowflake],
    ) -> ServiceResult<HashMap<Snowflake, Vec<Snowflake>>> {
        let Some(user_id) = user_id else {
            return Ok(HashMap::new());
        };
        Ok(self.ctx.poll_repo().selections(user_id, ids).await?)
    }
}
