//! Axum extractors for request handling
//!
//! Bearer authentication, typed path ids and validated bodies/query strings.

mod auth;
mod path;
mod validated;

pub use auth::{AuthUser, OptionalAuthUser};
pub use path::{parse_id, GuildPath, PostPath, SnowflakePath};
pub use validated::{ValidatedJson, ValidatedQuery};
