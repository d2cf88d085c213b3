//! # feed-core
//!
//! Domain layer of the guild discussion feed: entities, value objects,
//! the ranking engine, moderation transitions, the reply forest and the
//! repository traits. No infrastructure dependencies.

pub mod entities;
pub mod error;
pub mod moderation;
pub mod ranking;
pub mod reconcile;
pub mod traits;
pub mod tree;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    percentage, Author, ChoiceMode, FeedContext, GuildSettings, MemberRecord, OptionResult, Poll,
    PollOption, PollResults, Post, PostTag, Reply, ScoreHiding, Viewer, Vote, VoteOutcome,
    MAX_REPLY_DEPTH, POLL_MAX_EXPIRY_HOURS,
};
pub use error::DomainError;
pub use moderation::ModerationAction;
pub use ranking::{hot_score, rank, HotDecay, Page, PostQuery, SortMode, TimeWindow};
pub use reconcile::{OptimisticVote, RequestSequencer, Ticket, VoteState, VoteToggle};
pub use traits::{
    BookmarkIndex, GuildAccessRepository, PollRepository, PostRepository, RepoResult,
    ReplyRepository, VoteRepository,
};
pub use tree::ReplyForest;
pub use value_objects::{
    resolve_privileges, FeedPrivileges, MemberRole, Membership, Snowflake, SnowflakeGenerator,
    SnowflakeParseError, VoteTarget, VoteTargetKind,
};
