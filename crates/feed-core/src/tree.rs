//! Reply forest stored as an arena keyed by id
//!
//! Parent links are ids, so loading one level is a filter over the arena
//! and never needs the whole tree materialized.

use std::collections::HashMap;

use crate::entities::Reply;
use crate::ranking::Page;
use crate::value_objects::Snowflake;

#[derive(Debug, Default, Clone)]
pub struct ReplyForest {
    nodes: HashMap<Snowflake, Reply>,
}

impl ReplyForest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: Snowflake) -> Option<&Reply> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: Snowflake) -> Option<&mut Reply> {
        self.nodes.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `id` followed by its ancestors up to the top-level reply
    ///
    /// Empty if `id` is unknown.
    pub fn ancestry(&self, id: Snowflake) -> Vec<Snowflake> {
        let mut chain = Vec::new();
        let mut cursor = self.nodes.get(&id);
        while let Some(reply) = cursor {
            // a corrupt parent loop must not hang the walk
            if chain.len() > self.nodes.len() {
                break;
            }
            chain.push(reply.id);
            cursor = reply.parent_reply_id.and_then(|p| self.nodes.get(&p));
        }
        chain
    }

    /// Add a reply and bump its parent's `child_count`
    pub fn insert(&mut self, reply: Reply) {
        if let Some(parent) = reply.parent_reply_id.and_then(|p| self.nodes.get_mut(&p)) {
            parent.child_count += 1;
        }
        self.nodes.insert(reply.id, reply);
    }

    /// Direct children of `parent` (top-level replies when `None`),
    /// newest first
    pub fn children(
        &self,
        post_id: Snowflake,
        parent: Option<Snowflake>,
        page: u32,
        limit: u32,
    ) -> Page<Reply> {
        let mut level: Vec<&Reply> = self
            .nodes
            .values()
            .filter(|r| r.post_id == post_id && r.parent_reply_id == parent)
            .collect();
        let total = level.len() as i64;

        level.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

        let offset = (page.max(1) as usize - 1) * limit as usize;
        let data = level
            .into_iter()
            .skip(offset)
            .take(limit as usize)
            .cloned()
            .collect();

        Page { data, total }
    }

    /// Drop every reply of a post, returning the removed ids
    pub fn remove_post(&mut self, post_id: Snowflake) -> Vec<Snowflake> {
        let ids: Vec<Snowflake> = self
            .nodes
            .values()
            .filter(|r| r.post_id == post_id)
            .map(|r| r.id)
            .collect();
        for id in &ids {
            self.nodes.remove(id);
        }
        ids
    }
}
