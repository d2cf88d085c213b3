//! PostgreSQL implementation of ReplyRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use feed_core::entities::{Reply, MAX_REPLY_DEPTH};
use feed_core::ranking::Page;
use feed_core::traits::{RepoResult, ReplyRepository};
use feed_core::value_objects::Snowflake;
use feed_core::DomainError;

use crate::models::{ReplyModel, REPLY_COLUMNS};

use super::error::{map_db_error, offset};

#[derive(Clone)]
pub struct PgReplyRepository {
    pool: PgPool,
}

impl PgReplyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReplyRepository for PgReplyRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Reply>> {
        let sql = format!("SELECT {REPLY_COLUMNS} FROM replies WHERE id = $1");
        let result = sqlx::query_as::<_, ReplyModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(Reply::from))
    }

    #[instrument(skip(self))]
    async fn ancestry(&self, id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        // the hop guard stops a corrupted parent cycle from looping forever
        let rows: Vec<i64> = sqlx::query_scalar(
            r#"
            WITH RECURSIVE chain(id, parent_reply_id, hops) AS (
                SELECT id, parent_reply_id, 0
                FROM replies
                WHERE id = $1
                UNION ALL
                SELECT r.id, r.parent_reply_id, c.hops + 1
                FROM replies r
                JOIN chain c ON r.id = c.parent_reply_id
                WHERE c.hops < $2
            )
            SELECT id FROM chain ORDER BY hops
            "#,
        )
        .bind(id.into_inner())
        .bind(i32::try_from(MAX_REPLY_DEPTH).unwrap_or(i32::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Snowflake::new).collect())
    }

    #[instrument(skip(self))]
    async fn list_children(
        &self,
        post_id: Snowflake,
        parent_reply_id: Option<Snowflake>,
        page: u32,
        limit: u32,
    ) -> RepoResult<Page<Reply>> {
        let parent = parent_reply_id.map(Snowflake::into_inner);

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM replies
            WHERE post_id = $1 AND parent_reply_id IS NOT DISTINCT FROM $2
            "#,
        )
        .bind(post_id.into_inner())
        .bind(parent)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        if total == 0 {
            return Ok(Page::empty());
        }

        let sql = format!(
            r#"
            SELECT {REPLY_COLUMNS} FROM replies
            WHERE post_id = $1 AND parent_reply_id IS NOT DISTINCT FROM $2
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#
        );
        let rows = sqlx::query_as::<_, ReplyModel>(&sql)
            .bind(post_id.into_inner())
            .bind(parent)
            .bind(i64::from(limit))
            .bind(offset(page, limit))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(Page {
            data: rows.into_iter().map(Reply::from).collect(),
            total,
        })
    }

    #[instrument(skip(self, reply), fields(reply_id = %reply.id, post_id = %reply.post_id))]
    async fn create(&self, reply: &Reply) -> RepoResult<i64> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Locks the post row, so close and reply creation serialize
        let reply_count: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE posts SET reply_count = reply_count + 1
            WHERE id = $1 AND is_closed = FALSE
            RETURNING reply_count
            "#,
        )
        .bind(reply.post_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let Some(reply_count) = reply_count else {
            let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM posts WHERE id = $1")
                .bind(reply.post_id.into_inner())
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_db_error)?;

            return Err(match exists {
                Some(_) => DomainError::PostClosed,
                None => DomainError::PostNotFound(reply.post_id),
            });
        };

        if let Some(parent_id) = reply.parent_reply_id {
            let result = sqlx::query(
                r#"
                UPDATE replies SET child_count = child_count + 1
                WHERE id = $1 AND post_id = $2
                "#,
            )
            .bind(parent_id.into_inner())
            .bind(reply.post_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

            if result.rows_affected() == 0 {
                return Err(DomainError::ReplyNotFound(parent_id));
            }
        }

        sqlx::query(
            r#"
            INSERT INTO replies (id, post_id, parent_reply_id, author_id, author_name,
                                 author_role, author_reputation, body, created_at, depth)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(reply.id.into_inner())
        .bind(reply.post_id.into_inner())
        .bind(reply.parent_reply_id.map(Snowflake::into_inner))
        .bind(reply.author.id.into_inner())
        .bind(&reply.author.display_name)
        .bind(reply.author.role.as_str())
        .bind(reply.author.reputation)
        .bind(&reply.body)
        .bind(reply.created_at)
        .bind(i16::try_from(reply.depth).unwrap_or(i16::MAX))
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(reply_count)
    }
}
