//! Vote target - the ledger key shared by posts and replies

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Snowflake;

/// Something a user can upvote
///
/// Serialized as `{"target_type": "post", "target_id": "123"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "target_type", content = "target_id", rename_all = "snake_case")]
pub enum VoteTarget {
    Post(Snowflake),
    Reply(Snowflake),
}

/// Discriminant stored in the `votes.target_type` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteTargetKind {
    Post,
    Reply,
}

impl VoteTarget {
    pub fn new(kind: VoteTargetKind, id: Snowflake) -> Self {
        match kind {
            VoteTargetKind::Post => Self::Post(id),
            VoteTargetKind::Reply => Self::Reply(id),
        }
    }

    #[inline]
    pub fn id(self) -> Snowflake {
        match self {
            Self::Post(id) | Self::Reply(id) => id,
        }
    }

    #[inline]
    pub fn kind(self) -> VoteTargetKind {
        match self {
            Self::Post(_) => VoteTargetKind::Post,
            Self::Reply(_) => VoteTargetKind::Reply,
        }
    }
}

impl VoteTargetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Reply => "reply",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "post" => Some(Self::Post),
            "reply" => Some(Self::Reply),
            _ => None,
        }
    }
}

impl fmt::Display for VoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind().as_str(), self.id())
    }
}
