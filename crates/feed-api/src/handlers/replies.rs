//! Reply handlers

use axum::{extract::State, Json};
use feed_service::dto::{CreateReplyRequest, ListRepliesQuery, PageResponse, ReplyResponse};

use crate::extractors::{
    AuthUser, OptionalAuthUser, PostPath, SnowflakePath, ValidatedJson, ValidatedQuery,
};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// One level of the reply tree
///
/// GET /guilds/{guild_id}/feed/posts/{post_id}/replies?parent_reply_id&sort&page&limit
pub async fn get_replies(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    SnowflakePath(path): SnowflakePath<PostPath>,
    ValidatedQuery(query): ValidatedQuery<ListRepliesQuery>,
) -> ApiResult<Json<PageResponse<ReplyResponse>>> {
    let (guild_id, post_id) = path.ids()?;
    let replies = state
        .feed()
        .get_replies(guild_id, auth.user_id(), post_id, query)
        .await?;
    Ok(Json(replies))
}

/// POST /guilds/{guild_id}/feed/posts/{post_id}/replies
pub async fn create_reply(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(path): SnowflakePath<PostPath>,
    ValidatedJson(request): ValidatedJson<CreateReplyRequest>,
) -> ApiResult<Created<ReplyResponse>> {
    let (guild_id, post_id) = path.ids()?;
    let reply = state
        .feed()
        .create_reply(guild_id, auth.user_id, post_id, request)
        .await?;
    Ok(Created(reply))
}
