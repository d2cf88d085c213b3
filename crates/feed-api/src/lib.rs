//! # feed-api
//!
//! REST surface of the guild feed, built with Axum. Every route is keyed
//! by guild and delegates to [`feed_service::FeedFacade`].

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run};
pub use state::AppState;
