//! Request bodies and the response shapes the tests read back

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub tag: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll: Option<NewPoll>,
}

impl NewPost {
    pub fn new(title: &str, tag: &'static str) -> Self {
        Self {
            title: title.to_string(),
            body: "Details for the integration test post.".to_string(),
            tag,
            poll: None,
        }
    }

    pub fn with_poll(mut self, options: &[&str], choice_mode: &'static str) -> Self {
        self.poll = Some(NewPoll {
            options: options.iter().map(ToString::to_string).collect(),
            choice_mode,
        });
        self
    }
}

#[derive(Debug, Serialize)]
pub struct NewPoll {
    pub options: Vec<String>,
    pub choice_mode: &'static str,
}

#[derive(Debug, Serialize)]
pub struct NewReply {
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_reply_id: Option<String>,
}

impl NewReply {
    pub fn top_level(body: &str) -> Self {
        Self {
            body: body.to_string(),
            parent_reply_id: None,
        }
    }

    pub fn under(body: &str, parent: &str) -> Self {
        Self {
            body: body.to_string(),
            parent_reply_id: Some(parent.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PostBody {
    pub id: String,
    pub upvote_count: Option<i64>,
    pub has_voted: bool,
    pub reply_count: i64,
    pub is_pinned: bool,
    pub is_closed: bool,
    pub accepted_reply_id: Option<String>,
    pub is_bookmarked: bool,
    pub poll: Option<PollBody>,
}

#[derive(Debug, Deserialize)]
pub struct PollBody {
    pub has_voted: bool,
    pub results_visible: bool,
    pub total_votes: i64,
    pub options: Vec<PollOptionBody>,
}

#[derive(Debug, Deserialize)]
pub struct PollOptionBody {
    pub id: String,
    pub vote_count: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ReplyBody {
    pub id: String,
    pub depth: i32,
    pub is_accepted: bool,
}

#[derive(Debug, Deserialize)]
pub struct PageBody<T> {
    pub data: Vec<T>,
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub struct VoteBody {
    pub voted: bool,
    pub new_count: i64,
}

#[derive(Debug, Deserialize)]
pub struct BookmarkListBody {
    pub post_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
