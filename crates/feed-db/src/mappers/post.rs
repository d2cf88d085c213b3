//! Post entity <-> model mapper

use feed_core::entities::{Author, Post, PostTag};
use feed_core::value_objects::{MemberRole, Snowflake};

use crate::models::PostModel;

impl From<PostModel> for Post {
    fn from(model: PostModel) -> Self {
        Post {
            id: Snowflake::new(model.id),
            guild_id: Snowflake::new(model.guild_id),
            author: Author {
                id: Snowflake::new(model.author_id),
                display_name: model.author_name,
                role: MemberRole::from_str_lossy(&model.author_role),
                reputation: model.author_reputation,
            },
            title: model.title,
            body: model.body,
            tag: PostTag::parse(&model.tag).unwrap_or_default(),
            created_at: model.created_at,
            upvote_count: model.upvote_count,
            reply_count: model.reply_count,
            is_pinned: model.is_pinned,
            pinned_at: model.pinned_at,
            is_closed: model.is_closed,
            accepted_reply_id: model.accepted_reply_id.map(Snowflake::new),
        }
    }
}

/// Post values prepared for insertion
pub struct PostInsert<'a> {
    pub id: i64,
    pub guild_id: i64,
    pub author_id: i64,
    pub author_name: &'a str,
    pub author_role: &'static str,
    pub author_reputation: i32,
    pub title: &'a str,
    pub body: &'a str,
    pub tag: &'static str,
}

impl<'a> PostInsert<'a> {
    pub fn new(post: &'a Post) -> Self {
        Self {
            id: post.id.into_inner(),
            guild_id: post.guild_id.into_inner(),
            author_id: post.author.id.into_inner(),
            author_name: &post.author.display_name,
            author_role: post.author.role.as_str(),
            author_reputation: post.author.reputation,
            title: &post.title,
            body: &post.body,
            tag: post.tag.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_model_to_entity() {
        let model = PostModel {
            id: 10,
            guild_id: 1,
            author_id: 7,
            author_name: "seven".to_string(),
            author_role: "moderator".to_string(),
            author_reputation: 3,
            title: "Remote work".to_string(),
            body: "Is remote work fine?".to_string(),
            tag: "question".to_string(),
            created_at: Utc::now(),
            upvote_count: 2,
            reply_count: 1,
            is_pinned: false,
            pinned_at: None,
            is_closed: true,
            accepted_reply_id: Some(99),
        };

        let post = Post::from(model);
        assert_eq!(post.author.role, MemberRole::Moderator);
        assert_eq!(post.tag, PostTag::Question);
        assert!(post.is_closed);
        assert_eq!(post.accepted_reply_id, Some(Snowflake::new(99)));
    }
}
