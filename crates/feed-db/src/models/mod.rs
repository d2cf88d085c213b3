//! Database models
//!
//! Row structs with SQLx `FromRow` derives. Ids are raw `i64`, enums are
//! stored as text.

mod access;
mod poll;
mod post;
mod reply;

pub use access::{GuildMemberModel, GuildModel};
pub use poll::{PollModel, PollOptionModel, PollSelectionModel};
pub use post::{PostModel, POST_COLUMNS};
pub use reply::{ReplyModel, REPLY_COLUMNS};
