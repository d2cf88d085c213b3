//! Service context - dependency container for services
//!
//! Holds the repositories, the bookmark index, the id generator and the
//! feed tuning knobs shared by every service.

use std::sync::Arc;

use feed_common::FeedConfig;
use feed_core::traits::{
    BookmarkIndex, GuildAccessRepository, PollRepository, PostRepository, ReplyRepository,
    VoteRepository,
};
use feed_core::{HotDecay, ScoreHiding, Snowflake, SnowflakeGenerator};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Storage is reached only through the `feed-core` traits, so the same
/// services run on PostgreSQL/Redis in production and on the in-memory
/// stores under test.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    post_repo: Arc<dyn PostRepository>,
    reply_repo: Arc<dyn ReplyRepository>,
    vote_repo: Arc<dyn VoteRepository>,
    poll_repo: Arc<dyn PollRepository>,
    access_repo: Arc<dyn GuildAccessRepository>,

    // Cache stores
    bookmarks: Arc<dyn BookmarkIndex>,

    snowflake_generator: Arc<SnowflakeGenerator>,
    feed_config: FeedConfig,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        post_repo: Arc<dyn PostRepository>,
        reply_repo: Arc<dyn ReplyRepository>,
        vote_repo: Arc<dyn VoteRepository>,
        poll_repo: Arc<dyn PollRepository>,
        access_repo: Arc<dyn GuildAccessRepository>,
        bookmarks: Arc<dyn BookmarkIndex>,
        snowflake_generator: Arc<SnowflakeGenerator>,
        feed_config: FeedConfig,
    ) -> Self {
        Self {
            post_repo,
            reply_repo,
            vote_repo,
            poll_repo,
            access_repo,
            bookmarks,
            snowflake_generator,
            feed_config,
        }
    }

    // === Repositories ===

    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    pub fn reply_repo(&self) -> &dyn ReplyRepository {
        self.reply_repo.as_ref()
    }

    pub fn vote_repo(&self) -> &dyn VoteRepository {
        self.vote_repo.as_ref()
    }

    pub fn poll_repo(&self) -> &dyn PollRepository {
        self.poll_repo.as_ref()
    }

    /// Read-only guild directory
    pub fn access_repo(&self) -> &dyn GuildAccessRepository {
        self.access_repo.as_ref()
    }

    // === Cache Stores ===

    pub fn bookmarks(&self) -> &dyn BookmarkIndex {
        self.bookmarks.as_ref()
    }

    // === Feed settings ===

    pub fn feed_config(&self) -> &FeedConfig {
        &self.feed_config
    }

    /// Hot decay constants from configuration
    pub fn hot_decay(&self) -> HotDecay {
        HotDecay {
            gravity: self.feed_config.hot_gravity,
            age_offset_hours: self.feed_config.hot_age_offset_hours,
        }
    }

    pub fn score_hiding(&self) -> ScoreHiding {
        ScoreHiding::new(self.feed_config.score_hide_minutes)
    }

    /// Clamp a requested page size
    pub fn page_size(&self, requested: Option<u32>) -> u32 {
        self.feed_config.page_size(requested)
    }

    // === Ids ===

    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("bookmarks", &"BookmarkIndex")
            .field("worker_id", &self.snowflake_generator.worker_id())
            .field("feed_config", &self.feed_config)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    post_repo: Option<Arc<dyn PostRepository>>,
    reply_repo: Option<Arc<dyn ReplyRepository>>,
    vote_repo: Option<Arc<dyn VoteRepository>>,
    poll_repo: Option<Arc<dyn PollRepository>>,
    access_repo: Option<Arc<dyn GuildAccessRepository>>,
    bookmarks: Option<Arc<dyn BookmarkIndex>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    feed_config: FeedConfig,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            post_repo: None,
            reply_repo: None,
            vote_repo: None,
            poll_repo: None,
            access_repo: None,
            bookmarks: None,
            snowflake_generator: None,
            feed_config: FeedConfig::default(),
        }
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn reply_repo(mut self, repo: Arc<dyn ReplyRepository>) -> Self {
        self.reply_repo = Some(repo);
        self
    }

    pub fn vote_repo(mut self, repo: Arc<dyn VoteRepository>) -> Self {
        self.vote_repo = Some(repo);
        self
    }

    pub fn poll_repo(mut self, repo: Arc<dyn PollRepository>) -> Self {
        self.poll_repo = Some(repo);
        self
    }

    pub fn access_repo(mut self, repo: Arc<dyn GuildAccessRepository>) -> Self {
        self.access_repo = Some(repo);
        self
    }

    pub fn bookmarks(mut self, index: Arc<dyn BookmarkIndex>) -> Self {
        self.bookmarks = Some(index);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn feed_config(mut self, config: FeedConfig) -> Self {
        self.feed_config = config;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.post_repo
                .ok_or_else(|| ServiceError::validation("post_repo is required"))?,
            self.reply_repo
                .ok_or_else(|| ServiceError::validation("reply_repo is required"))?,
            self.vote_repo
                .ok_or_else(|| ServiceError::validation("vote_repo is required"))?,
            self.poll_repo
                .ok_or_else(|| ServiceError::validation("poll_repo is required"))?,
            self.access_repo
                .ok_or_else(|| ServiceError::validation("access_repo is required"))?,
            self.bookmarks
                .ok_or_else(|| ServiceError::validation("bookmarks is required"))?,
            self.snowflake_generator
                .ok_or_else(|| ServiceError::validation("snowflake_generator is required"))?,
            self.feed_config,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
