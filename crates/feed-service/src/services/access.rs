//! Access service
//!
//! Turns `(guild_id, user_id?)` into a [`FeedContext`] by reading the
//! externally owned guild directory once per request. Every other service
//! consumes the context and never looks at roles.

use feed_core::{DomainError, FeedContext, Snowflake, Viewer};
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Access service
pub struct AccessService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccessService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve the caller's context in a guild
    ///
    /// An authenticated user without a membership record becomes an
    /// outsider: known identity, no capabilities.
    #[instrument(skip(self))]
    pub async fn resolve(
        &self,
        guild_id: Snowflake,
        user_id: Option<Snowflake>,
    ) -> ServiceResult<FeedContext> {
        let guild = self
            .ctx
            .access_repo()
            .find_guild(guild_id)
            .await?
            .ok_or(DomainError::GuildNotFound(guild_id))?;

        let viewer = match user_id {
            Some(user_id) => Some(
                self.ctx
                    .access_repo()
                    .find_member(guild_id, user_id)
                    .await?
                    .map(Viewer::from)
                    .unwrap_or_else(|| Viewer::outsider(user_id)),
            ),
            None => None,
        };

        let context = FeedContext::new(&guild, viewer);
        debug!(
            guild_id = %guild_id,
            user_id = ?user_id,
            privileges = %context.privileges,
            "Feed context resolved"
        );
        Ok(context)
    }
}
