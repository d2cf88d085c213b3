//! Moderation handlers

use axum::{extract::State, Json};
use feed_service::dto::{AcceptAnswerRequest, ModeratePostRequest, PostResponse};

use crate::extractors::{AuthUser, PostPath, SnowflakePath, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Accept a reply as the answer to a question
///
/// POST /guilds/{guild_id}/feed/posts/{post_id}/accept
pub async fn accept_answer(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(path): SnowflakePath<PostPath>,
    ValidatedJson(request): ValidatedJson<AcceptAnswerRequest>,
) -> ApiResult<Json<PostResponse>> {
    let (guild_id, post_id) = path.ids()?;
    let post = state
        .feed()
        .accept_answer(guild_id, auth.user_id, post_id, request)
        .await?;
    Ok(Json(post))
}

/// Pin, unpin, close, reopen or delete
///
/// POST /guilds/{guild_id}/feed/posts/{post_id}/moderation
///
/// Responds with `null` after a delete.
pub async fn moderate_post(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(path): SnowflakePath<PostPath>,
    ValidatedJson(request): ValidatedJson<ModeratePostRequest>,
) -> ApiResult<Json<Option<PostResponse>>> {
    let (guild_id, post_id) = path.ids()?;
    let post = state
        .feed()
        .moderate_post(guild_id, auth.user_id, post_id, request)
        .await?;
    Ok(Json(post))
}
