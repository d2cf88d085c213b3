//! PostgreSQL implementation of GuildAccessRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use feed_core::entities::{GuildSettings, MemberRecord};
use feed_core::traits::{GuildAccessRepository, RepoResult};
use feed_core::value_objects::Snowflake;

use crate::models::{GuildMemberModel, GuildModel};

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgGuildAccessRepository {
    pool: PgPool,
}

impl PgGuildAccessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GuildAccessRepository for PgGuildAccessRepository {
    #[instrument(skip(self))]
    async fn find_guild(&self, guild_id: Snowflake) -> RepoResult<Option<GuildSettings>> {
        let result = sqlx::query_as::<_, GuildModel>(
            r#"
            SELECT id, public_read FROM guilds WHERE id = $1
            "#,
        )
        .bind(guild_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(GuildSettings::from))
    }

    #[instrument(skip(self))]
    async fn find_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<MemberRecord>> {
        let result = sqlx::query_as::<_, GuildMemberModel>(
            r#"
            SELECT guild_id, user_id, display_name, role, status, reputation
            FROM guild_members
            WHERE guild_id = $1 AND user_id = $2
            "#,
        )
        .bind(guild_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(MemberRecord::from))
    }
}
