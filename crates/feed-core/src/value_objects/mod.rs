//! Value objects - immutable types that represent domain concepts

mod privileges;
mod snowflake;
mod target;

pub use privileges::{resolve_privileges, FeedPrivileges, MemberRole, Membership};
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
pub use target::{VoteTarget, VoteTargetKind};
