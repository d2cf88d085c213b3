//! Feed services
//!
//! Each service owns one part of the feed and works on an already
//! resolved [`feed_core::FeedContext`]. [`FeedFacade`] is the entry point
//! that resolves the context and dispatches.

pub mod access;
pub mod bookmark;
pub mod context;
pub mod error;
pub mod facade;
pub mod moderation;
pub mod poll;
pub mod post;
pub mod reply;
pub mod vote;

#[cfg(test)]
pub(crate) mod testing;

pub use access::AccessService;
pub use bookmark::BookmarkService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use facade::FeedFacade;
pub use moderation::ModerationService;
pub use poll::PollService;
pub use post::PostService;
pub use reply::ReplyService;
pub use vote::VoteService;
