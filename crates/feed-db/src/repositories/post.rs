//! PostgreSQL implementation of PostRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use feed_core::entities::{Poll, Post};
use feed_core::ranking::{HotDecay, Page, PostQuery, SortMode};
use feed_core::traits::{PostRepository, RepoResult};
use feed_core::value_objects::Snowflake;
use feed_core::DomainError;

use crate::mappers::PostInsert;
use crate::models::{PostModel, POST_COLUMNS};

use super::error::{map_db_error, map_unique_violation, offset};

/// Filter shared by the page and count queries. $1 guild, $2 tag,
/// $3 window cutoff, $4 id allow-list.
const LIST_FILTER: &str = "guild_id = $1 \
    AND ($2::TEXT IS NULL OR tag = $2) \
    AND ($3::TIMESTAMPTZ IS NULL OR is_pinned OR created_at >= $3) \
    AND ($4::BIGINT[] IS NULL OR id = ANY($4))";

/// Hot score with $7 = now, $8 = age offset hours, $9 = gravity
const HOT_SCORE: &str = "SIGN(upvote_count::FLOAT8) \
    * LOG(GREATEST(ABS(upvote_count), 1)::FLOAT8) \
    / POWER(GREATEST(EXTRACT(EPOCH FROM ($7::TIMESTAMPTZ - created_at))::FLOAT8, 0) / 3600.0 \
        + $8::FLOAT8, $9::FLOAT8)";

/// ORDER BY for a sort mode; pinned rows are ordered by pin time only
fn order_by(sort: SortMode) -> String {
    let mode = match sort {
        SortMode::New => String::new(),
        SortMode::Top => "CASE WHEN is_pinned THEN 0 ELSE upvote_count END DESC, ".to_string(),
        SortMode::Hot => format!("CASE WHEN is_pinned THEN 0 ELSE {HOT_SCORE} END DESC, "),
    };
    format!("is_pinned DESC, pinned_at DESC NULLS LAST, {mode}created_at DESC, id DESC")
}

#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn require(id: Snowflake, found: Option<PostModel>) -> RepoResult<Post> {
        found.map(Post::from).ok_or(DomainError::PostNotFound(id))
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
        let result = sqlx::query_as::<_, PostModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(Post::from))
    }

    #[instrument(skip(self))]
    async fn find_many(&self, ids: &[Snowflake]) -> RepoResult<Vec<Post>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();

        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ANY($1)");
        let results = sqlx::query_as::<_, PostModel>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(results.into_iter().map(Post::from).collect())
    }

    #[instrument(skip(self, query), fields(guild_id = %query.guild_id, sort = query.sort.as_str()))]
    async fn list(
        &self,
        query: &PostQuery,
        now: DateTime<Utc>,
        decay: HotDecay,
    ) -> RepoResult<Page<Post>> {
        let guild_id = query.guild_id.into_inner();
        let tag = query.tag.map(|t| t.as_str());
        let cutoff = query.cutoff(now);
        let only_ids: Option<Vec<i64>> = query
            .only_ids
            .as_ref()
            .map(|ids| ids.iter().map(|id| id.into_inner()).collect());

        let count_sql = format!("SELECT COUNT(*) FROM posts WHERE {LIST_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(guild_id)
            .bind(tag)
            .bind(cutoff)
            .bind(only_ids.clone())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        if total == 0 {
            return Ok(Page::empty());
        }

        let page_sql = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE {LIST_FILTER} ORDER BY {} LIMIT $5 OFFSET $6",
            order_by(query.sort)
        );
        let mut page_query = sqlx::query_as::<_, PostModel>(&page_sql)
            .bind(guild_id)
            .bind(tag)
            .bind(cutoff)
            .bind(only_ids)
            .bind(i64::from(query.limit))
            .bind(offset(query.page, query.limit));
        if query.sort == SortMode::Hot {
            page_query = page_query
                .bind(now)
                .bind(decay.age_offset_hours)
                .bind(decay.gravity);
        }

        let rows = page_query
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(Page {
            data: rows.into_iter().map(Post::from).collect(),
            total,
        })
    }

    #[instrument(skip(self, post, poll), fields(post_id = %post.id))]
    async fn create(&self, post: &Post, poll: Option<&Poll>) -> RepoResult<()> {
        let insert = PostInsert::new(post);
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO posts (id, guild_id, author_id, author_name, author_role,
                               author_reputation, title, body, tag, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(insert.id)
        .bind(insert.guild_id)
        .bind(insert.author_id)
        .bind(insert.author_name)
        .bind(insert.author_role)
        .bind(insert.author_reputation)
        .bind(insert.title)
        .bind(insert.body)
        .bind(insert.tag)
        .bind(post.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            map_unique_violation(e, || DomainError::Conflict(format!("post {} exists", post.id)))
        })?;

        if let Some(poll) = poll {
            sqlx::query(
                r#"
                INSERT INTO polls (post_id, choice_mode, expires_at, created_at)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(insert.id)
            .bind(poll.choice_mode.as_str())
            .bind(poll.expires_at)
            .bind(poll.created_at)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

            for option in &poll.options {
                sqlx::query(
                    r#"
                    INSERT INTO poll_options (id, post_id, position, text)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(option.id.into_inner())
                .bind(insert.id)
                .bind(option.position)
                .bind(&option.text)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
            }
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_pinned(
        &self,
        id: Snowflake,
        pinned: bool,
        now: DateTime<Utc>,
    ) -> RepoResult<Post> {
        let sql = format!(
            r#"
            UPDATE posts
            SET is_pinned = $2,
                pinned_at = CASE WHEN $2 THEN COALESCE(pinned_at, $3) ELSE NULL END
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        );
        let result = sqlx::query_as::<_, PostModel>(&sql)
            .bind(id.into_inner())
            .bind(pinned)
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Self::require(id, result)
    }

    #[instrument(skip(self))]
    async fn set_closed(&self, id: Snowflake, closed: bool) -> RepoResult<Post> {
        let sql = format!("UPDATE posts SET is_closed = $2 WHERE id = $1 RETURNING {POST_COLUMNS}");
        let result = sqlx::query_as::<_, PostModel>(&sql)
            .bind(id.into_inner())
            .bind(closed)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Self::require(id, result)
    }

    #[instrument(skip(self))]
    async fn accept_answer(&self, post_id: Snowflake, reply_id: Snowflake) -> RepoResult<Post> {
        let sql = format!(
            r#"
            UPDATE posts
            SET accepted_reply_id = $2
            WHERE id = $1 AND accepted_reply_id IS NULL
            RETURNING {POST_COLUMNS}
            "#
        );
        let result = sqlx::query_as::<_, PostModel>(&sql)
            .bind(post_id.into_inner())
            .bind(reply_id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        match result {
            Some(model) => Ok(Post::from(model)),
            // lost the race, or the post is gone
            None => match self.find_by_id(post_id).await? {
                Some(_) => Err(DomainError::AnswerAlreadyAccepted),
                None => Err(DomainError::PostNotFound(post_id)),
            },
        }
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        // replies, votes and the poll go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::PostNotFound(id));
        }

        Ok(())
    }
}
