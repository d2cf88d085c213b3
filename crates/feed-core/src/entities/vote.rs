//! Vote ledger records and score visibility

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{FeedPrivileges, Snowflake, VoteTarget};

/// An upvote. Existence means "voted"; there is no downvote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub user_id: Snowflake,
    pub target: VoteTarget,
    pub created_at: DateTime<Utc>,
}

/// Authoritative state after a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOutcome {
    pub voted: bool,
    pub new_count: i64,
}

/// Withholds fresh scores from non-moderators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreHiding {
    window: Duration,
}

impl ScoreHiding {
    pub fn new(minutes: u32) -> Self {
        Self {
            window: Duration::minutes(i64::from(minutes)),
        }
    }

    /// Never hide anything
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Whether content created at `created_at` still has its score hidden
    pub fn is_hidden(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.window > Duration::zero() && now - created_at < self.window
    }

    /// The count a viewer gets to see, if any
    pub fn visible_count(
        &self,
        count: i64,
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
        viewer: FeedPrivileges,
    ) -> Option<i64> {
        if self.is_hidden(created_at, now) && !viewer.is_moderator() {
            None
        } else {
            Some(count)
        }
    }
}
