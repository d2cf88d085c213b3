//! Reply entity <-> model mapper

use feed_core::entities::{Author, Reply};
use feed_core::value_objects::{MemberRole, Snowflake};

use crate::models::ReplyModel;

impl From<ReplyModel> for Reply {
    fn from(model: ReplyModel) -> Self {
        Reply {
            id: Snowflake::new(model.id),
            post_id: Snowflake::new(model.post_id),
            parent_reply_id: model.parent_reply_id.map(Snowflake::new),
            author: Author {
                id: Snowflake::new(model.author_id),
                display_name: model.author_name,
                role: MemberRole::from_str_lossy(&model.author_role),
                reputation: model.author_reputation,
            },
            body: model.body,
            created_at: model.created_at,
            upvote_count: model.upvote_count,
            child_count: model.child_count,
            depth: u32::try_from(model.depth).unwrap_or(1),
        }
    }
}
