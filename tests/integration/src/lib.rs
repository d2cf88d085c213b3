//! Integration test utilities for the guild feed
//!
//! Spawns the real server against PostgreSQL and Redis and talks to it
//! over HTTP.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
