//! # feed-db
//!
//! Storage layer implementing the feed-core repository traits.
//!
//! - PostgreSQL repositories via SQLx, with every counter change made in
//!   the same transaction as the row change behind it
//! - Runtime migrations from `migrations/`
//! - [`MemoryStore`], a single-lock in-memory implementation of all traits
//!
//! ## Usage
//!
//! ```rust,ignore
//! use feed_db::pool::{create_pool, run_migrations, DatabaseConfig};
//! use feed_db::PgPostRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     run_migrations(&pool).await?;
//!     let posts = PgPostRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

pub use memory::MemoryStore;
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgGuildAccessRepository, PgPollRepository, PgPostRepository, PgReplyRepository,
    PgVoteRepository,
};
