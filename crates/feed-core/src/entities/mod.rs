//! Domain entities - core business objects

mod access;
mod poll;
mod post;
mod reply;
mod vote;

pub use access::{FeedContext, GuildSettings, MemberRecord, Viewer};
pub use poll::{
    percentage, ChoiceMode, OptionResult, Poll, PollOption, PollResults,
    POLL_MAX_EXPIRY_HOURS, POLL_MAX_OPTIONS, POLL_MIN_OPTIONS, POLL_OPTION_MAX_CHARS,
};
pub use post::{
    Author, Post, PostTag, BODY_MAX_CHARS, BODY_MIN_CHARS, TITLE_MAX_CHARS, TITLE_MIN_CHARS,
};
pub use reply::{Reply, MAX_REPLY_DEPTH, REPLY_BODY_MAX_CHARS};
pub use vote::{ScoreHiding, Vote, VoteOutcome};

#[cfg(test)]
pub(crate) use post::fixtures;
