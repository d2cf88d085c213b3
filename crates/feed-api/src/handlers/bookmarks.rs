//! Bookmark handlers

use axum::{extract::State, Json};
use feed_service::dto::{BookmarkListResponse, BookmarkResponse};

use crate::extractors::{AuthUser, GuildPath, PostPath, SnowflakePath};
use crate::response::ApiResult;
use crate::state::AppState;

/// PUT /guilds/{guild_id}/feed/posts/{post_id}/bookmark
pub async fn toggle_bookmark(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(path): SnowflakePath<PostPath>,
) -> ApiResult<Json<BookmarkResponse>> {
    let (guild_id, post_id) = path.ids()?;
    let bookmark = state
        .feed()
        .toggle_bookmark(guild_id, auth.user_id, post_id)
        .await?;
    Ok(Json(bookmark))
}

/// Caller's bookmarked post ids in this guild, oldest bookmark first
///
/// GET /guilds/{guild_id}/feed/bookmarks
pub async fn list_bookmarks(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(path): SnowflakePath<GuildPath>,
) -> ApiResult<Json<BookmarkListResponse>> {
    let guild_id = path.guild_id()?;
    let bookmarks = state.feed().list_bookmarks(guild_id, auth.user_id).await?;
    Ok(Json(bookmarks))
}
