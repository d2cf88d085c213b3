//! PostgreSQL implementation of VoteRepository
//!
//! A toggle locks the target row first, so concurrent toggles on the same
//! target serialize and the cached `upvote_count` always equals the number
//! of ledger rows.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashSet;
use tracing::instrument;

use feed_core::entities::VoteOutcome;
use feed_core::traits::{RepoResult, VoteRepository};
use feed_core::value_objects::{Snowflake, VoteTarget, VoteTargetKind};
use feed_core::DomainError;

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgVoteRepository {
    pool: PgPool,
}

impl PgVoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lock the target row and return the id of its owning post
    async fn lock_target(
        tx: &mut Transaction<'_, Postgres>,
        target: VoteTarget,
    ) -> RepoResult<Snowflake> {
        let (sql, missing) = match target {
            VoteTarget::Post(id) => (
                "SELECT id FROM posts WHERE id = $1 FOR UPDATE",
                DomainError::PostNotFound(id),
            ),
            VoteTarget::Reply(id) => (
                "SELECT post_id FROM replies WHERE id = $1 FOR UPDATE",
                DomainError::ReplyNotFound(id),
            ),
        };

        let post_id: Option<i64> = sqlx::query_scalar(sql)
            .bind(target.id().into_inner())
            .fetch_optional(&mut **tx)
            .await
            .map_err(map_db_error)?;

        post_id.map(Snowflake::new).ok_or(missing)
    }
}

fn counter_update(kind: VoteTargetKind) -> &'static str {
    match kind {
        VoteTargetKind::Post => {
            "UPDATE posts SET upvote_count = upvote_count + $2 WHERE id = $1 RETURNING upvote_count"
        }
        VoteTargetKind::Reply => {
            "UPDATE replies SET upvote_count = upvote_count + $2 WHERE id = $1 RETURNING upvote_count"
        }
    }
}

#[async_trait]
impl VoteRepository for PgVoteRepository {
    #[instrument(skip(self), fields(target = %target))]
    async fn toggle(&self, user_id: Snowflake, target: VoteTarget) -> RepoResult<VoteOutcome> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let post_id = Self::lock_target(&mut tx, target).await?;
        let kind = target.kind().as_str();

        let removed = sqlx::query(
            r#"
            DELETE FROM votes
            WHERE user_id = $1 AND target_type = $2 AND target_id = $3
            "#,
        )
        .bind(user_id.into_inner())
        .bind(kind)
        .bind(target.id().into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        let voted = removed == 0;
        if voted {
            sqlx::query(
                r#"
                INSERT INTO votes (user_id, target_type, target_id, post_id)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(user_id.into_inner())
            .bind(kind)
            .bind(target.id().into_inner())
            .bind(post_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        let delta: i64 = if voted { 1 } else { -1 };
        let new_count: i64 = sqlx::query_scalar(counter_update(target.kind()))
            .bind(target.id().into_inner())
            .bind(delta)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(VoteOutcome { voted, new_count })
    }

    #[instrument(skip(self, targets), fields(count = targets.len()))]
    async fn voted_targets(
        &self,
        user_id: Snowflake,
        targets: &[VoteTarget],
    ) -> RepoResult<HashSet<VoteTarget>> {
        if targets.is_empty() {
            return Ok(HashSet::new());
        }
        let ids: Vec<i64> = targets.iter().map(|t| t.id().into_inner()).collect();

        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT target_type, target_id FROM votes
            WHERE user_id = $1 AND target_id = ANY($2)
            "#,
        )
        .bind(user_id.into_inner())
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let wanted: HashSet<VoteTarget> = targets.iter().copied().collect();
        Ok(rows
            .into_iter()
            .filter_map(|(kind, id)| {
                VoteTargetKind::parse(&kind).map(|k| VoteTarget::new(k, Snowflake::new(id)))
            })
            .filter(|t| wanted.contains(t))
            .collect())
    }
}
