//! In-memory fixtures for the service unit tests

use std::sync::Arc;

use feed_cache::MemoryBookmarkIndex;
use feed_common::FeedConfig;
use feed_core::{
    FeedContext, MemberRecord, MemberRole, Membership, PostTag, Snowflake, SnowflakeGenerator,
};
use feed_db::MemoryStore;

use crate::dto::{CreatePostRequest, PostResponse};

use super::access::AccessService;
use super::context::{ServiceContext, ServiceContextBuilder};
use super::post::PostService;

/// Private guild every fixture starts with
pub const GUILD: Snowflake = Snowflake::new(1);

pub struct Fixture {
    pub ctx: ServiceContext,
    pub store: MemoryStore,
    pub bookmarks: MemoryBookmarkIndex,
}

pub fn fixture() -> Fixture {
    fixture_with(FeedConfig::default())
}

pub fn fixture_with(config: FeedConfig) -> Fixture {
    let store = MemoryStore::new();
    let bookmarks = MemoryBookmarkIndex::new();
    store.add_guild(GUILD, false);

    let ctx = ServiceContextBuilder::new()
        .post_repo(Arc::new(store.clone()))
        .reply_repo(Arc::new(store.clone()))
        .vote_repo(Arc::new(store.clone()))
        .poll_repo(Arc::new(store.clone()))
        .access_repo(Arc::new(store.clone()))
        .bookmarks(Arc::new(bookmarks.clone()))
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
        .feed_config(config)
        .build()
        .unwrap();

    Fixture {
        ctx,
        store,
        bookmarks,
    }
}

pub fn post_request(title: &str, tag: PostTag) -> CreatePostRequest {
    CreatePostRequest {
        title: title.to_string(),
        body: "Body long enough to pass validation.".to_string(),
        tag,
        poll: None,
    }
}

impl Fixture {
    /// Add a member of [`GUILD`] and return their id
    pub fn member(&self, id: i64, role: MemberRole, membership: Membership) -> Snowflake {
        let user_id = Snowflake::new(id);
        self.store.add_member(MemberRecord {
            guild_id: GUILD,
            user_id,
            display_name: format!("user-{id}"),
            role,
            membership,
            reputation: 0,
        });
        user_id
    }

    pub async fn context(&self, user_id: Option<Snowflake>) -> FeedContext {
        self.context_in(GUILD, user_id).await
    }

    pub async fn context_in(&self, guild_id: Snowflake, user_id: Option<Snowflake>) -> FeedContext {
        AccessService::new(&self.ctx)
            .resolve(guild_id, user_id)
            .await
            .unwrap()
    }

    pub async fn create_post(&self, feed: &FeedContext, title: &str, tag: PostTag) -> PostResponse {
        PostService::new(&self.ctx)
            .create(feed, post_request(title, tag))
            .await
            .unwrap()
    }
}
