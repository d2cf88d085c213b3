//! Repository and index traits

mod repositories;

pub use repositories::{
    BookmarkIndex, GuildAccessRepository, PollRepository, PostRepository, RepoResult,
    ReplyRepository, VoteRepository,
};
