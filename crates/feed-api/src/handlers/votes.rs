//! Vote handlers
//!
//! Upvote toggles on posts and replies, and poll ballots.

use axum::{extract::State, Json};
use feed_service::dto::{CastPollVoteRequest, PollResponse, VoteRequest, VoteResponse};

use crate::extractors::{AuthUser, GuildPath, PostPath, SnowflakePath, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Toggle the caller's upvote
///
/// POST /guilds/{guild_id}/feed/votes
pub async fn vote(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(path): SnowflakePath<GuildPath>,
    ValidatedJson(request): ValidatedJson<VoteRequest>,
) -> ApiResult<Json<VoteResponse>> {
    let guild_id = path.guild_id()?;
    let outcome = state.feed().vote(guild_id, auth.user_id, request).await?;
    Ok(Json(outcome))
}

/// Cast a poll ballot; returns the poll with results
///
/// POST /guilds/{guild_id}/feed/posts/{post_id}/poll/votes
pub async fn cast_poll_vote(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(path): SnowflakePath<PostPath>,
    ValidatedJson(request): ValidatedJson<CastPollVoteRequest>,
) -> ApiResult<Json<PollResponse>> {
    let (guild_id, post_id) = path.ids()?;
    let poll = state
        .feed()
        .cast_poll_vote(guild_id, auth.user_id, post_id, request)
        .await?;
    Ok(Json(poll))
}
