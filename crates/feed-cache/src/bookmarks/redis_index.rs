//! Redis-backed bookmark index.
//!
//! Layout:
//! - `feed:bookmarks:user:{user_id}`: sorted set of post ids, scored by a
//!   per-user insertion counter so listing preserves insertion order
//! - `feed:bookmarks:post:{post_id}`: set of user ids, so deleting a post
//!   can find every bookmark that points at it
//! - `feed:bookmarks:seq:{user_id}`: the insertion counter
//!
//! Both mutations run as Lua scripts and are atomic.

use async_trait::async_trait;
use redis::{AsyncCommands, Script};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::instrument;

use feed_core::traits::{BookmarkIndex, RepoResult};
use feed_core::value_objects::Snowflake;

use crate::pool::{RedisPool, RedisPoolError};

/// Key prefix shared by every bookmark key
pub const BOOKMARK_PREFIX: &str = "feed:bookmarks:";

pub fn user_key(user_id: Snowflake) -> String {
    format!("{BOOKMARK_PREFIX}user:{user_id}")
}

pub fn post_key(post_id: Snowflake) -> String {
    format!("{BOOKMARK_PREFIX}post:{post_id}")
}

fn seq_key(user_id: Snowflake) -> String {
    format!("{BOOKMARK_PREFIX}seq:{user_id}")
}

// KEYS: user set, post reverse set, user counter. ARGV: post id, user id.
static TOGGLE: LazyLock<Script> = LazyLock::new(|| {
    Script::new(
        r"
        if redis.call('ZSCORE', KEYS[1], ARGV[1]) then
            redis.call('ZREM', KEYS[1], ARGV[1])
            redis.call('SREM', KEYS[2], ARGV[2])
            return 0
        end
        local seq = redis.call('INCR', KEYS[3])
        redis.call('ZADD', KEYS[1], seq, ARGV[1])
        redis.call('SADD', KEYS[2], ARGV[2])
        return 1
        ",
    )
});

// KEYS: post reverse set. ARGV: user key prefix, post id.
static REMOVE_POST: LazyLock<Script> = LazyLock::new(|| {
    Script::new(
        r"
        local users = redis.call('SMEMBERS', KEYS[1])
        for _, user in ipairs(users) do
            redis.call('ZREM', ARGV[1] .. user, ARGV[2])
        end
        redis.call('DEL', KEYS[1])
        return #users
        ",
    )
});

/// Bookmark index stored in Redis
#[derive(Debug, Clone)]
pub struct RedisBookmarkIndex {
    pool: RedisPool,
}

impl RedisBookmarkIndex {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookmarkIndex for RedisBookmarkIndex {
    #[instrument(skip(self))]
    async fn toggle(&self, user_id: Snowflake, post_id: Snowflake) -> RepoResult<bool> {
        let mut conn = self.pool.get().await?;
        let added: i32 = TOGGLE
            .key(user_key(user_id))
            .key(post_key(post_id))
            .key(seq_key(user_id))
            .arg(post_id.into_inner())
            .arg(user_id.into_inner())
            .invoke_async(&mut conn)
            .await
            .map_err(RedisPoolError::from)?;

        Ok(added == 1)
    }

    #[instrument(skip(self, post_ids), fields(count = post_ids.len()))]
    async fn contains_any(
        &self,
        user_id: Snowflake,
        post_ids: &[Snowflake],
    ) -> RepoResult<HashSet<Snowflake>> {
        if post_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let key = user_key(user_id);
        let mut pipe = redis::pipe();
        for post_id in post_ids {
            pipe.zscore(&key, post_id.into_inner());
        }

        let mut conn = self.pool.get().await?;
        let scores: Vec<Option<f64>> = pipe
            .query_async(&mut conn)
            .await
            .map_err(RedisPoolError::from)?;

        Ok(post_ids
            .iter()
            .zip(scores)
            .filter_map(|(id, score)| score.map(|_| *id))
            .collect())
    }

    #[instrument(skip(self))]
    async fn list(&self, user_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        let mut conn = self.pool.get().await?;
        let ids: Vec<i64> = conn
            .zrange(user_key(user_id), 0, -1)
            .await
            .map_err(RedisPoolError::from)?;

        Ok(ids.into_iter().map(Snowflake::new).collect())
    }

    #[instrument(skip(self))]
    async fn remove_post(&self, post_id: Snowflake) -> RepoResult<()> {
        let mut conn = self.pool.get().await?;
        let removed: i64 = REMOVE_POST
            .key(post_key(post_id))
            .arg(format!("{BOOKMARK_PREFIX}user:"))
            .arg(post_id.into_inner())
            .invoke_async(&mut conn)
            .await
            .map_err(RedisPoolError::from)?;

        tracing::debug!(post_id = %post_id, removed, "Bookmarks cleared for deleted post");
        Ok(())
    }
}
