//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL, JWT_SECRET, API_PORT
//!
//! Run with: cargo test -p integration-tests --test api_tests

use feed_core::{MemberRole, OptimisticVote, RequestSequencer, VoteOutcome};
use integration_tests::{
    assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;
use serde_json::json;

fn posts_path(guild: impl std::fmt::Display) -> String {
    format!("/api/v1/guilds/{guild}/feed/posts")
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Question and Answer
// ============================================================================

#[tokio::test]
async fn test_question_answer_flow() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let guild = server.seed_guild(false).await.unwrap();
    let (_, asker) = server.seed_member(guild, MemberRole::Member).await.unwrap();
    let (_, helper) = server.seed_member(guild, MemberRole::Member).await.unwrap();

    let response = server
        .post_auth(&posts_path(guild), &asker, &NewPost::new("Is remote OK?", "question"))
        .await
        .unwrap();
    let post: PostBody = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(post.upvote_count, Some(0));
    assert_eq!(post.reply_count, 0);
    assert!(post.accepted_reply_id.is_none());

    let replies_path = format!("{}/{}/replies", posts_path(guild), post.id);
    let response = server
        .post_auth(&replies_path, &helper, &NewReply::top_level("Yes, fully remote"))
        .await
        .unwrap();
    let first: ReplyBody = assert_json(response, StatusCode::CREATED).await.unwrap();
    let response = server
        .post_auth(&replies_path, &helper, &NewReply::top_level("Office twice a week"))
        .await
        .unwrap();
    let second: ReplyBody = assert_json(response, StatusCode::CREATED).await.unwrap();

    let accept_path = format!("{}/{}/accept", posts_path(guild), post.id);
    let response = server
        .post_auth(&accept_path, &asker, &json!({ "reply_id": first.id }))
        .await
        .unwrap();
    let accepted: PostBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(accepted.accepted_reply_id.as_deref(), Some(first.id.as_str()));

    let response = server
        .post_auth(&accept_path, &asker, &json!({ "reply_id": second.id }))
        .await
        .unwrap();
    let err: ErrorBody = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(err.error.code, "ANSWER_ALREADY_ACCEPTED");

    let response = server.get_auth(&replies_path, &helper).await.unwrap();
    let page: PageBody<ReplyBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.total, 2);
    let accepted: Vec<_> = page.data.iter().filter(|r| r.is_accepted).collect();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].id, first.id);
}

#[tokio::test]
async fn test_reply_depth_cap() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let guild = server.seed_guild(false).await.unwrap();
    let (_, token) = server.seed_member(guild, MemberRole::Member).await.unwrap();

    let response = server
        .post_auth(&posts_path(guild), &token, &NewPost::new("Deep thread", "discussion"))
        .await
        .unwrap();
    let post: PostBody = assert_json(response, StatusCode::CREATED).await.unwrap();
    let replies_path = format!("{}/{}/replies", posts_path(guild), post.id);

    let mut parent: Option<String> = None;
    for expected_depth in 1..=3 {
        let body = match &parent {
            Some(id) => NewReply::under("deeper", id),
            None => NewReply::top_level("first"),
        };
        let response = server.post_auth(&replies_path, &token, &body).await.unwrap();
        let reply: ReplyBody = assert_json(response, StatusCode::CREATED).await.unwrap();
        assert_eq!(reply.depth, expected_depth);
        parent = Some(reply.id);
    }

    let parent = parent.unwrap();
    let response = server
        .post_auth(&replies_path, &token, &NewReply::under("too deep", &parent))
        .await
        .unwrap();
    let err: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(err.error.code, "DEPTH_EXCEEDED");
}

// ============================================================================
// Votes and Polls
// ============================================================================

#[tokio::test]
async fn test_vote_reconciliation() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let guild = server.seed_guild(false).await.unwrap();
    let (_, token) = server.seed_member(guild, MemberRole::Member).await.unwrap();

    let response = server
        .post_auth(&posts_path(guild), &token, &NewPost::new("Upvote target", "insight"))
        .await
        .unwrap();
    let post: PostBody = assert_json(response, StatusCode::CREATED).await.unwrap();
    let votes_path = format!("/api/v1/guilds/{guild}/feed/votes");
    let target = json!({ "target_type": "post", "target_id": post.id });

    // two quick clicks, answers arriving in order
    let mut button = OptimisticVote::new(post.has_voted, post.upvote_count.unwrap_or(0));
    let first = button.apply();
    let second = button.apply();
    assert_eq!(button.displayed().count, 0);

    for toggle in [first, second] {
        let response = server.post_auth(&votes_path, &token, &target).await.unwrap();
        let vote: VoteBody = assert_json(response, StatusCode::OK).await.unwrap();
        button.confirm(
            toggle,
            VoteOutcome {
                voted: vote.voted,
                new_count: vote.new_count,
            },
        );
    }
    assert!(!button.has_pending());
    assert!(!button.displayed().voted);
    assert_eq!(button.displayed().count, 0);

    // only the newest list request may update the view
    let mut sequencer = RequestSequencer::new();
    let stale = sequencer.issue("feed");
    let fresh = sequencer.issue("feed");
    let response = server.get_auth(&posts_path(guild), &token).await.unwrap();
    let page: PageBody<PostBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(sequencer.accept(&stale, &page).is_none());
    let page = sequencer.accept(&fresh, page).unwrap();
    assert_eq!(page.data[0].upvote_count, Some(0));
}

#[tokio::test]
async fn test_single_choice_poll() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let guild = server.seed_guild(false).await.unwrap();
    let (_, token) = server.seed_member(guild, MemberRole::Member).await.unwrap();

    let request = NewPost::new("Pick a day", "discussion").with_poll(&["Mon", "Fri"], "single");
    let response = server.post_auth(&posts_path(guild), &token, &request).await.unwrap();
    let post: PostBody = assert_json(response, StatusCode::CREATED).await.unwrap();
    let poll = post.poll.unwrap();
    assert!(!poll.results_visible);
    assert!(poll.options.iter().all(|o| o.vote_count.is_none()));

    let ballot_path = format!("{}/{}/poll/votes", posts_path(guild), post.id);
    let response = server
        .post_auth(&ballot_path, &token, &json!({ "option_ids": [poll.options[0].id] }))
        .await
        .unwrap();
    let poll: PollBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(poll.has_voted);
    assert_eq!(poll.total_votes, 1);
    assert_eq!(poll.options[0].vote_count, Some(1));

    let response = server
        .post_auth(&ballot_path, &token, &json!({ "option_ids": [poll.options[1].id] }))
        .await
        .unwrap();
    let err: ErrorBody = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(err.error.code, "ALREADY_VOTED");
}

// ============================================================================
// Moderation and Bookmarks
// ============================================================================

#[tokio::test]
async fn test_closed_post_rejects_replies_only() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let guild = server.seed_guild(false).await.unwrap();
    let (_, moderator) = server.seed_member(guild, MemberRole::Moderator).await.unwrap();
    let (_, member) = server.seed_member(guild, MemberRole::Member).await.unwrap();

    let response = server
        .post_auth(&posts_path(guild), &member, &NewPost::new("Closing soon", "discussion"))
        .await
        .unwrap();
    let post: PostBody = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth(
            &format!("{}/{}/moderation", posts_path(guild), post.id),
            &moderator,
            &json!({ "action": "close" }),
        )
        .await
        .unwrap();
    let closed: PostBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(closed.is_closed);

    let response = server
        .post_auth(
            &format!("{}/{}/replies", posts_path(guild), post.id),
            &member,
            &NewReply::top_level("Too late"),
        )
        .await
        .unwrap();
    let err: ErrorBody = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(err.error.code, "POST_CLOSED");

    let response = server
        .post_auth(
            &format!("/api/v1/guilds/{guild}/feed/votes"),
            &member,
            &json!({ "target_type": "post", "target_id": post.id }),
        )
        .await
        .unwrap();
    let vote: VoteBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(vote.voted);
}

#[tokio::test]
async fn test_pinned_post_leads_the_feed() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let guild = server.seed_guild(true).await.unwrap();
    let (_, admin) = server.seed_member(guild, MemberRole::Admin).await.unwrap();

    let response = server
        .post_auth(&posts_path(guild), &admin, &NewPost::new("Guild rules", "insight"))
        .await
        .unwrap();
    let rules: PostBody = assert_json(response, StatusCode::CREATED).await.unwrap();
    let response = server
        .post_auth(&posts_path(guild), &admin, &NewPost::new("Newer chatter", "discussion"))
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth(
            &format!("{}/{}/moderation", posts_path(guild), rules.id),
            &admin,
            &json!({ "action": "pin" }),
        )
        .await
        .unwrap();
    let pinned: PostBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(pinned.is_pinned);

    for sort in ["hot", "new", "top"] {
        let response = server
            .get(&format!("{}?sort={sort}", posts_path(guild)))
            .await
            .unwrap();
        let page: PageBody<PostBody> = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(page.data[0].id, rules.id, "sort {sort}");
    }
}

#[tokio::test]
async fn test_delete_cascades_to_bookmarks() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let guild = server.seed_guild(false).await.unwrap();
    let (_, admin) = server.seed_member(guild, MemberRole::Admin).await.unwrap();
    let (_, member) = server.seed_member(guild, MemberRole::Member).await.unwrap();

    let response = server
        .post_auth(&posts_path(guild), &member, &NewPost::new("Short lived", "discussion"))
        .await
        .unwrap();
    let post: PostBody = assert_json(response, StatusCode::CREATED).await.unwrap();
    let post_path = format!("{}/{}", posts_path(guild), post.id);

    let response = server
        .put_auth(&format!("{post_path}/bookmark"), &member)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get_auth(&post_path, &member).await.unwrap();
    let seen: PostBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(seen.is_bookmarked);

    let response = server
        .post_auth(
            &format!("{post_path}/moderation"),
            &admin,
            &json!({ "action": "delete" }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get_auth(&post_path, &member).await.unwrap();
    let err: ErrorBody = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(err.error.code, "UNKNOWN_POST");
    assert!(!err.error.message.is_empty());

    let response = server
        .get_auth(&format!("/api/v1/guilds/{guild}/feed/bookmarks"), &member)
        .await
        .unwrap();
    let bookmarks: BookmarkListBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(bookmarks.post_ids.is_empty());
}
