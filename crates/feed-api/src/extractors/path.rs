//! Path parameter extractors
//!
//! Ids arrive as decimal strings and are parsed into [`Snowflake`]s so a
//! malformed id is a 400 rather than a 404.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use feed_core::Snowflake;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::response::ApiError;

/// Path extractor whose rejection is an [`ApiError`]
#[derive(Debug, Clone)]
pub struct SnowflakePath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for SnowflakePath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(inner) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        Ok(SnowflakePath(inner))
    }
}

pub fn parse_id(value: &str, name: &str) -> Result<Snowflake, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid {name} format")))
}

/// `/guilds/{guild_id}/...`
#[derive(Debug, Deserialize)]
pub struct GuildPath {
    pub guild_id: String,
}

impl GuildPath {
    pub fn guild_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.guild_id, "guild_id")
    }
}

/// `/guilds/{guild_id}/feed/posts/{post_id}/...`
#[derive(Debug, Deserialize)]
pub struct PostPath {
    pub guild_id: String,
    pub post_id: String,
}

impl PostPath {
    /// Both ids, guild first
    pub fn ids(&self) -> Result<(Snowflake, Snowflake), ApiError> {
        Ok((
            parse_id(&self.guild_id, "guild_id")?,
            parse_id(&self.post_id, "post_id")?,
        ))
    }
}
