//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for rendering entities for one viewer

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    AcceptAnswerRequest, CastPollVoteRequest, CreatePollRequest, CreatePostRequest,
    CreateReplyRequest, ListPostsQuery, ListRepliesQuery, ModeratePostRequest, ReplySort,
    VoteRequest,
};

pub use responses::{
    BookmarkListResponse, BookmarkResponse, HealthChecks, HealthResponse, PageResponse,
    PollOptionResponse, PollResponse, PostResponse, ReadinessResponse, ReplyResponse,
    VoteResponse,
};

pub use mappers::{PostView, ReplyView};
