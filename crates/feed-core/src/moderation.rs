//! Moderation state machine
//!
//! A post sits on two independent axes, open/closed and pinned/unpinned,
//! plus the terminal `deleted` state. Each action needs one capability.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Post;
use crate::value_objects::FeedPrivileges;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationAction {
    Pin,
    Unpin,
    Close,
    Reopen,
    Delete,
}

impl ModerationAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pin => "pin",
            Self::Unpin => "unpin",
            Self::Close => "close",
            Self::Reopen => "reopen",
            Self::Delete => "delete",
        }
    }

    pub fn required_capability(self) -> FeedPrivileges {
        match self {
            Self::Pin | Self::Unpin => FeedPrivileges::PIN_UNPIN,
            Self::Close | Self::Reopen => FeedPrivileges::CLOSE_REOPEN,
            Self::Delete => FeedPrivileges::DELETE,
        }
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delete)
    }
}

impl Post {
    /// Apply a non-terminal action in place
    ///
    /// Returns whether the post changed. Re-pinning keeps the original
    /// `pinned_at`. `Delete` leaves the post untouched; removal is the
    /// store's job.
    pub fn apply_moderation(&mut self, action: ModerationAction, now: DateTime<Utc>) -> bool {
        match action {
            ModerationAction::Pin if !self.is_pinned => {
                self.is_pinned = true;
                self.pinned_at = Some(now);
                true
            }
            ModerationAction::Unpin if self.is_pinned => {
                self.is_pinned = false;
                self.pinned_at = None;
                true
            }
            ModerationAction::Close if !self.is_closed => {
                self.is_closed = true;
                true
            }
            ModerationAction::Reopen if self.is_closed => {
                self.is_closed = false;
                true
            }
            _ => false,
        }
    }
}
