//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in feed-core.

mod access;
mod error;
mod poll;
mod post;
mod reply;
mod vote;

pub use access::PgGuildAccessRepository;
pub use error::{map_db_error, map_unique_violation};
pub use poll::PgPollRepository;
pub use post::PgPostRepository;
pub use reply::PgReplyRepository;
pub use vote::PgVoteRepository;
