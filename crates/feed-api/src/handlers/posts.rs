//! Post handlers
//!
//! Listing, detail and creation of feed posts.

use axum::{extract::State, Json};
use feed_service::dto::{CreatePostRequest, ListPostsQuery, PageResponse, PostResponse};

use crate::extractors::{
    AuthUser, GuildPath, OptionalAuthUser, PostPath, SnowflakePath, ValidatedJson, ValidatedQuery,
};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Ranked post list
///
/// GET /guilds/{guild_id}/feed/posts?sort&tag&window&page&limit&bookmarked
pub async fn list_posts(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    SnowflakePath(path): SnowflakePath<GuildPath>,
    ValidatedQuery(query): ValidatedQuery<ListPostsQuery>,
) -> ApiResult<Json<PageResponse<PostResponse>>> {
    let guild_id = path.guild_id()?;
    let page = state
        .feed()
        .list_posts(guild_id, auth.user_id(), query)
        .await?;
    Ok(Json(page))
}

/// Create a post, optionally with a poll
///
/// POST /guilds/{guild_id}/feed/posts
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(path): SnowflakePath<GuildPath>,
    ValidatedJson(request): ValidatedJson<CreatePostRequest>,
) -> ApiResult<Created<PostResponse>> {
    let guild_id = path.guild_id()?;
    let post = state
        .feed()
        .create_post(guild_id, auth.user_id, request)
        .await?;
    Ok(Created(post))
}

/// Post detail
///
/// GET /guilds/{guild_id}/feed/posts/{post_id}
pub async fn get_post(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    SnowflakePath(path): SnowflakePath<PostPath>,
) -> ApiResult<Json<PostResponse>> {
    let (guild_id, post_id) = path.ids()?;
    let post = state
        .feed()
        .get_post(guild_id, auth.user_id(), post_id)
        .await?;
    Ok(Json(post))
}
