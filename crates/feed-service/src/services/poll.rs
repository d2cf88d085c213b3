//! Poll service - one ballot per user per poll

use chrono::Utc;
use feed_core::{DomainError, FeedContext, Snowflake};
use tracing::{info, instrument};

use crate::dto::{CastPollVoteRequest, PollResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::post::PostService;

/// Poll service
pub struct PollService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PollService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Cast the caller's only ballot on a post's poll
    ///
    /// Checks run in order: expiry, prior ballot, ballot shape. Closing
    /// the post does not close its poll.
    #[instrument(skip(self, feed, request), fields(guild_id = %feed.guild_id))]
    pub async fn cast(
        &self,
        feed: &FeedContext,
        post_id: Snowflake,
        request: CastPollVoteRequest,
    ) -> ServiceResult<PollResponse> {
        let viewer = feed.require_member()?;
        PostService::new(self.ctx)
            .find_in_guild(feed.guild_id, post_id)
            .await?;

        let poll = self
            .ctx
            .poll_repo()
            .find_by_post(post_id)
            .await?
            .ok_or(DomainError::PollNotFound(post_id))?;

        let now = Utc::now();
        if poll.is_expired(now) {
            return Err(DomainError::PollClosed.into());
        }
        let prior = self
            .ctx
            .poll_repo()
            .selections(viewer.user_id, &[post_id])
            .await?;
        if prior.contains_key(&post_id) {
            return Err(DomainError::AlreadyVoted.into());
        }
        poll.validate_ballot(&request.option_ids, now)?;

        // the store enforces the single ballot again under concurrency
        let updated = self
            .ctx
            .poll_repo()
            .cast(post_id, viewer.user_id, &request.option_ids)
            .await?;

        info!(
            post_id = %post_id,
            user_id = %viewer.user_id,
            selections = request.option_ids.len(),
            total_votes = updated.total_voters,
            "Poll vote cast"
        );

        Ok(PollResponse::from(updated.results(&request.option_ids, now)))
    }
}
