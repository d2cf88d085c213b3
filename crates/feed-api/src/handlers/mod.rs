//! Route handlers
//!
//! Thin adapters: parse ids, pick the caller, call the facade.

pub mod bookmarks;
pub mod health;
pub mod moderation;
pub mod posts;
pub mod replies;
pub mod votes;
