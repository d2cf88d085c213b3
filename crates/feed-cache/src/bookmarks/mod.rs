//! Per-user bookmark sets

mod memory_index;
mod redis_index;

pub use memory_index::MemoryBookmarkIndex;
pub use redis_index::{post_key, user_key, RedisBookmarkIndex, BOOKMARK_PREFIX};
