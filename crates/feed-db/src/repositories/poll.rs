//! PostgreSQL implementation of PollRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use tracing::instrument;

use feed_core::entities::Poll;
use feed_core::traits::{PollRepository, RepoResult};
use feed_core::value_objects::Snowflake;
use feed_core::DomainError;

use crate::mappers::poll_from_rows;
use crate::models::{PollModel, PollOptionModel, PollSelectionModel};

use super::error::map_db_error;

const POLL_COLUMNS: &str = "post_id, choice_mode, expires_at, total_voters, created_at";
const OPTION_COLUMNS: &str = "id, post_id, position, text, vote_count";

#[derive(Clone)]
pub struct PgPollRepository {
    pool: PgPool,
}

impl PgPollRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        post_id: Snowflake,
    ) -> RepoResult<Option<Poll>> {
        let poll_sql = format!("SELECT {POLL_COLUMNS} FROM polls WHERE post_id = $1");
        let Some(model) = sqlx::query_as::<_, PollModel>(&poll_sql)
            .bind(post_id.into_inner())
            .fetch_optional(&mut **tx)
            .await
            .map_err(map_db_error)?
        else {
            return Ok(None);
        };

        let option_sql = format!("SELECT {OPTION_COLUMNS} FROM poll_options WHERE post_id = $1");
        let options = sqlx::query_as::<_, PollOptionModel>(&option_sql)
            .bind(post_id.into_inner())
            .fetch_all(&mut **tx)
            .await
            .map_err(map_db_error)?;

        Ok(Some(poll_from_rows(model, &options)))
    }
}

#[async_trait]
impl PollRepository for PgPollRepository {
    #[instrument(skip(self))]
    async fn find_by_post(&self, post_id: Snowflake) -> RepoResult<Option<Poll>> {
        let polls = self.find_by_posts(&[post_id]).await?;
        Ok(polls.into_iter().next())
    }

    #[instrument(skip(self, post_ids), fields(count = post_ids.len()))]
    async fn find_by_posts(&self, post_ids: &[Snowflake]) -> RepoResult<Vec<Poll>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = post_ids.iter().map(|id| id.into_inner()).collect();

        let poll_sql = format!("SELECT {POLL_COLUMNS} FROM polls WHERE post_id = ANY($1)");
        let polls = sqlx::query_as::<_, PollModel>(&poll_sql)
            .bind(ids.clone())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        if polls.is_empty() {
            return Ok(Vec::new());
        }

        let option_sql =
            format!("SELECT {OPTION_COLUMNS} FROM poll_options WHERE post_id = ANY($1)");
        let options = sqlx::query_as::<_, PollOptionModel>(&option_sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(polls
            .into_iter()
            .map(|model| poll_from_rows(model, &options))
            .collect())
    }

    #[instrument(skip(self, post_ids), fields(count = post_ids.len()))]
    async fn selections(
        &self,
        user_id: Snowflake,
        post_ids: &[Snowflake],
    ) -> RepoResult<HashMap<Snowflake, Vec<Snowflake>>> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let ids: Vec<i64> = post_ids.iter().map(|id| id.into_inner()).collect();

        let rows = sqlx::query_as::<_, PollSelectionModel>(
            r#"
            SELECT post_id, option_id FROM poll_votes
            WHERE user_id = $1 AND post_id = ANY($2)
            ORDER BY post_id, option_id
            "#,
        )
        .bind(user_id.into_inner())
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut selections: HashMap<Snowflake, Vec<Snowflake>> = HashMap::new();
        for row in rows {
            selections
                .entry(Snowflake::new(row.post_id))
                .or_default()
                .push(Snowflake::new(row.option_id));
        }
        Ok(selections)
    }

    #[instrument(skip(self, option_ids), fields(options = option_ids.len()))]
    async fn cast(
        &self,
        post_id: Snowflake,
        user_id: Snowflake,
        option_ids: &[Snowflake],
    ) -> RepoResult<Poll> {
        let ids: Vec<i64> = option_ids.iter().map(|id| id.into_inner()).collect();
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // The expiry check and the voter count bump happen in one statement
        let open: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE polls SET total_voters = total_voters + 1
            WHERE post_id = $1 AND (expires_at IS NULL OR expires_at > NOW())
            RETURNING total_voters
            "#,
        )
        .bind(post_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if open.is_none() {
            let exists: Option<i64> =
                sqlx::query_scalar("SELECT post_id FROM polls WHERE post_id = $1")
                    .bind(post_id.into_inner())
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(map_db_error)?;

            return Err(match exists {
                Some(_) => DomainError::PollClosed,
                None => DomainError::PollNotFound(post_id),
            });
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO poll_voters (post_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(post_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        if inserted == 0 {
            return Err(DomainError::AlreadyVoted);
        }

        sqlx::query(
            r#"
            INSERT INTO poll_votes (user_id, option_id, post_id)
            SELECT $1, option_id, $2 FROM UNNEST($3::BIGINT[]) AS option_id
            "#,
        )
        .bind(user_id.into_inner())
        .bind(post_id.into_inner())
        .bind(ids.clone())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let bumped = sqlx::query(
            r#"
            UPDATE poll_options SET vote_count = vote_count + 1
            WHERE post_id = $1 AND id = ANY($2)
            "#,
        )
        .bind(post_id.into_inner())
        .bind(ids)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        if bumped != option_ids.len() as u64 {
            return Err(DomainError::validation("option does not belong to this poll"));
        }

        let poll = Self::load_in_tx(&mut tx, post_id)
            .await?
            .ok_or(DomainError::PollNotFound(post_id))?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(poll)
    }
}
