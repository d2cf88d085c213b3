//! # feed-service
//!
//! Application layer of the guild feed: access resolution, the feed use
//! cases and the request/response DTOs.

pub mod dto;
pub mod services;

pub use services::{FeedFacade, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult};
