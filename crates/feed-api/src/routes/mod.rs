//! Route definitions
//!
//! Feed routes are mounted under /api/v1; health probes sit at the root.

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{bookmarks, health, moderation, posts, replies, votes};
use crate::state::AppState;

/// Feed API routes (health probes are mounted separately)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", feed_routes())
}

/// Health check routes, kept outside the rate limiter
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn feed_routes() -> Router<AppState> {
    Router::new()
        // Posts
        .route(
            "/guilds/:guild_id/feed/posts",
            get(posts::list_posts).post(posts::create_post),
        )
        .route("/guilds/:guild_id/feed/posts/:post_id", get(posts::get_post))
        // Replies
        .route(
            "/guilds/:guild_id/feed/posts/:post_id/replies",
            get(replies::get_replies).post(replies::create_reply),
        )
        // Votes
        .route("/guilds/:guild_id/feed/votes", post(votes::vote))
        .route(
            "/guilds/:guild_id/feed/posts/:post_id/poll/votes",
            post(votes::cast_poll_vote),
        )
        // Moderation
        .route(
            "/guilds/:guild_id/feed/posts/:post_id/accept",
            post(moderation::accept_answer),
        )
        .route(
            "/guilds/:guild_id/feed/posts/:post_id/moderation",
            post(moderation::moderate_post),
        )
        // Bookmarks
        .route(
            "/guilds/:guild_id/feed/posts/:post_id/bookmark",
            put(bookmarks::toggle_bookmark),
        )
        .route(
            "/guilds/:guild_id/feed/bookmarks",
            get(bookmarks::list_bookmarks),
        )
}
