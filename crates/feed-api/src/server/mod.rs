//! Server setup and initialization
//!
//! Wires PostgreSQL, Redis and the services into an [`AppState`], builds
//! the router and serves it.

use std::sync::Arc;

use axum::Router;
use feed_cache::{RedisBookmarkIndex, RedisPool};
use feed_common::{AppConfig, AppError, JwtService};
use feed_core::SnowflakeGenerator;
use feed_db::{
    create_pool, run_migrations, DatabaseConfig, PgGuildAccessRepository, PgPollRepository,
    PgPostRepository, PgReplyRepository, PgVoteRepository,
};
use feed_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete application: rate-limited feed routes plus probes
pub fn create_app(state: AppState, config: &AppConfig) -> Result<Router, AppError> {
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    )?;
    let probes = apply_middleware(health_routes());

    Ok(api.merge(probes).with_state(state))
}

/// Connect the backends and assemble the service context
pub async fn create_app_state(config: &AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    info!("Connecting to Redis...");
    let redis_pool =
        RedisPool::from_config(&config.redis).map_err(|e| AppError::Cache(e.to_string()))?;
    info!("Redis pool ready");

    let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry);
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    let service_context = ServiceContextBuilder::new()
        .post_repo(Arc::new(PgPostRepository::new(pool.clone())))
        .reply_repo(Arc::new(PgReplyRepository::new(pool.clone())))
        .vote_repo(Arc::new(PgVoteRepository::new(pool.clone())))
        .poll_repo(Arc::new(PgPollRepository::new(pool.clone())))
        .access_repo(Arc::new(PgGuildAccessRepository::new(pool.clone())))
        .bookmarks(Arc::new(RedisBookmarkIndex::new(redis_pool.clone())))
        .snowflake_generator(snowflake_generator)
        .feed_config(config.feed.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, jwt_service).with_backends(pool, redis_pool))
}

/// Serve until the listener fails
pub async fn run_server(app: Router, address: &str) -> Result<(), AppError> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {address}: {e}")))?;

    info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let state = create_app_state(&config).await?;
    let app = create_app(state, &config)?;
    run_server(app, &config.api.address()).await
}
