//! # feed-cache
//!
//! Redis layer for the feed: a managed connection pool and the bookmark
//! index, plus an in-process index with the same contract.
//!
//! ## Example
//!
//! ```ignore
//! use feed_cache::{RedisBookmarkIndex, RedisPool, RedisPoolConfig};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let bookmarks = RedisBookmarkIndex::new(pool.clone());
//! let now_saved = bookmarks.toggle(user_id, post_id).await?;
//! ```

pub mod bookmarks;
pub mod pool;

pub use bookmarks::{MemoryBookmarkIndex, RedisBookmarkIndex};
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
