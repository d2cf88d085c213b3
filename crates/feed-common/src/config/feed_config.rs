//! Feed tuning knobs, read from `FEED_*` environment variables

use serde::Deserialize;

use super::ConfigError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
    #[serde(default = "default_hot_gravity")]
    pub hot_gravity: f64,
    #[serde(default = "default_hot_age_offset_hours")]
    pub hot_age_offset_hours: f64,
    /// 0 disables score hiding
    #[serde(default)]
    pub score_hide_minutes: u32,
}

fn default_page_size() -> u32 {
    20
}

fn default_max_page_size() -> u32 {
    100
}

fn default_hot_gravity() -> f64 {
    1.8
}

fn default_hot_age_offset_hours() -> f64 {
    2.0
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            hot_gravity: default_hot_gravity(),
            hot_age_offset_hours: default_hot_age_offset_hours(),
            score_hide_minutes: 0,
        }
    }
}

impl FeedConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(config::Environment::with_prefix("FEED").try_parsing(true))
    }

    /// Load from any `config` source, then check the values make sense
    pub fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let feed: Self = config::Config::builder()
            .add_source(source)
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(|e| ConfigError::InvalidValue("FEED_*", e.to_string()))?;

        feed.validate()?;
        Ok(feed)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(ConfigError::InvalidValue(
                "FEED_DEFAULT_PAGE_SIZE",
                format!("must be between 1 and {}", self.max_page_size),
            ));
        }
        if !self.hot_gravity.is_finite() || self.hot_gravity <= 0.0 {
            return Err(ConfigError::InvalidValue(
                "FEED_HOT_GRAVITY",
                "must be positive".to_string(),
            ));
        }
        if !self.hot_age_offset_hours.is_finite() || self.hot_age_offset_hours <= 0.0 {
            return Err(ConfigError::InvalidValue(
                "FEED_HOT_AGE_OFFSET_HOURS",
                "must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Clamp a requested page size, falling back to the default
    #[must_use]
    pub fn page_size(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn source(vars: &[(&str, &str)]) -> config::Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        config::Environment::with_prefix("FEED")
            .try_parsing(true)
            .source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let feed = FeedConfig::from_source(source(&[])).unwrap();
        assert_eq!(feed, FeedConfig::default());
        assert_eq!(feed.default_page_size, 20);
        assert_eq!(feed.max_page_size, 100);
        assert_eq!(feed.score_hide_minutes, 0);
    }

    #[test]
    fn test_overrides() {
        let feed = FeedConfig::from_source(source(&[
            ("FEED_DEFAULT_PAGE_SIZE", "10"),
            ("FEED_HOT_GRAVITY", "1.5"),
            ("FEED_SCORE_HIDE_MINUTES", "60"),
        ]))
        .unwrap();
        assert_eq!(feed.default_page_size, 10);
        assert!((feed.hot_gravity - 1.5).abs() < f64::EPSILON);
        assert_eq!(feed.score_hide_minutes, 60);
    }

    #[test]
    fn test_rejects_nonsense() {
        assert!(FeedConfig::from_source(source(&[("FEED_DEFAULT_PAGE_SIZE", "0")])).is_err());
        assert!(FeedConfig::from_source(source(&[("FEED_HOT_GRAVITY", "-1")])).is_err());
        assert!(FeedConfig::from_source(source(&[("FEED_MAX_PAGE_SIZE", "lots")])).is_err());
    }

    #[test]
    fn test_page_size_clamping() {
        let feed = FeedConfig::default();
        assert_eq!(feed.page_size(None), 20);
        assert_eq!(feed.page_size(Some(0)), 1);
        assert_eq!(feed.page_size(Some(500)), 100);
    }
}
