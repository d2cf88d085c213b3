//! In-process bookmark index

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;

use feed_core::traits::{BookmarkIndex, RepoResult};
use feed_core::value_objects::Snowflake;

/// Bookmark index held in memory, per user in insertion order
#[derive(Debug, Clone, Default)]
pub struct MemoryBookmarkIndex {
    sets: Arc<DashMap<Snowflake, Vec<Snowflake>>>,
}

impl MemoryBookmarkIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookmarkIndex for MemoryBookmarkIndex {
    async fn toggle(&self, user_id: Snowflake, post_id: Snowflake) -> RepoResult<bool> {
        let mut set = self.sets.entry(user_id).or_default();
        if let Some(pos) = set.iter().position(|id| *id == post_id) {
            set.remove(pos);
            Ok(false)
        } else {
            set.push(post_id);
            Ok(true)
        }
    }

    async fn contains_any(
        &self,
        user_id: Snowflake,
        post_ids: &[Snowflake],
    ) -> RepoResult<HashSet<Snowflake>> {
        let Some(set) = self.sets.get(&user_id) else {
            return Ok(HashSet::new());
        };
        Ok(post_ids
            .iter()
            .copied()
            .filter(|id| set.contains(id))
            .collect())
    }

    async fn list(&self, user_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        Ok(self
            .sets
            .get(&user_id)
            .map(|set| set.clone())
            .unwrap_or_default())
    }

    async fn remove_post(&self, post_id: Snowflake) -> RepoResult<()> {
        for mut set in self.sets.iter_mut() {
            set.retain(|id| *id != post_id);
        }
        Ok(())
    }
}
