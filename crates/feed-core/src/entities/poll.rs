//! Poll entity - option set, choice mode, expiry and tallying

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

pub const POLL_MIN_OPTIONS: usize = 2;
pub const POLL_MAX_OPTIONS: usize = 6;
pub const POLL_OPTION_MAX_CHARS: usize = 100;
/// One year
pub const POLL_MAX_EXPIRY_HOURS: u32 = 8760;

/// How many options a single ballot may select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceMode {
    #[default]
    Single,
    Multiple,
}

impl ChoiceMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multiple => "multiple",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "single" => Some(Self::Single),
            "multiple" => Some(Self::Multiple),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOption {
    pub id: Snowflake,
    pub position: i32,
    pub text: String,
    pub vote_count: i64,
}

/// Poll attached 1:1 to a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poll {
    pub post_id: Snowflake,
    pub choice_mode: ChoiceMode,
    pub options: Vec<PollOption>,
    pub expires_at: Option<DateTime<Utc>>,
    /// Unique voters, not selections
    pub total_voters: i64,
    pub created_at: DateTime<Utc>,
}

impl Poll {
    /// Build a poll from raw option texts
    ///
    /// Option ids are drawn from `next_id` in display order.
    pub fn new(
        post_id: Snowflake,
        choice_mode: ChoiceMode,
        options: &[String],
        expires_in_hours: Option<u32>,
        now: DateTime<Utc>,
        mut next_id: impl FnMut() -> Snowflake,
    ) -> Result<Self, DomainError> {
        let texts = Self::normalize_options(options)?;
        let expires_at = expires_in_hours
            .map(|hours| Self::expiry_after(now, hours))
            .transpose()?;
        let options = texts
            .into_iter()
            .enumerate()
            .map(|(position, text)| PollOption {
                id: next_id(),
                position: position as i32,
                text,
                vote_count: 0,
            })
            .collect();

        Ok(Self {
            post_id,
            choice_mode,
            options,
            expires_at,
            total_voters: 0,
            created_at: now,
        })
    }

    /// Closing time `hours` after `now`, within 1 hour to one year
    pub fn expiry_after(now: DateTime<Utc>, hours: u32) -> Result<DateTime<Utc>, DomainError> {
        if !(1..=POLL_MAX_EXPIRY_HOURS).contains(&hours) {
            return Err(DomainError::validation(format!(
                "Poll expiry must be between 1 and {POLL_MAX_EXPIRY_HOURS} hours"
            )));
        }
        Duration::try_hours(i64::from(hours))
            .and_then(|delta| now.checked_add_signed(delta))
            .ok_or_else(|| DomainError::validation("Poll expiry is out of range"))
    }

    /// Trim option texts and check count and length bounds
    pub fn normalize_options(options: &[String]) -> Result<Vec<String>, DomainError> {
        let texts: Vec<String> = options.iter().map(|o| o.trim().to_string()).collect();

        if !(POLL_MIN_OPTIONS..=POLL_MAX_OPTIONS).contains(&texts.len()) {
            return Err(DomainError::validation(format!(
                "A poll needs between {POLL_MIN_OPTIONS} and {POLL_MAX_OPTIONS} options"
            )));
        }
        if texts.iter().any(String::is_empty) {
            return Err(DomainError::validation("Poll options cannot be empty"));
        }
        if texts
            .iter()
            .any(|t| t.chars().count() > POLL_OPTION_MAX_CHARS)
        {
            return Err(DomainError::validation(format!(
                "Poll options cannot exceed {POLL_OPTION_MAX_CHARS} characters"
            )));
        }
        Ok(texts)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    pub fn option(&self, id: Snowflake) -> Option<&PollOption> {
        self.options.iter().find(|o| o.id == id)
    }

    /// Check a ballot against the poll's rules, ignoring prior votes
    pub fn validate_ballot(
        &self,
        option_ids: &[Snowflake],
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if self.is_expired(now) {
            return Err(DomainError::PollClosed);
        }
        if option_ids.is_empty() {
            return Err(DomainError::validation("Select at least one option"));
        }
        if self.choice_mode == ChoiceMode::Single && option_ids.len() != 1 {
            return Err(DomainError::validation(
                "Single-choice polls take exactly one option",
            ));
        }

        let mut seen = HashSet::with_capacity(option_ids.len());
        for id in option_ids {
            if !seen.insert(*id) {
                return Err(DomainError::validation("Duplicate option in ballot"));
            }
            if self.option(*id).is_none() {
                return Err(DomainError::validation(format!(
                    "Option {id} does not belong to this poll"
                )));
            }
        }
        Ok(())
    }

    /// Count one voter's ballot. The ballot must already be validated.
    pub fn record_ballot(&mut self, option_ids: &[Snowflake]) {
        for option in &mut self.options {
            if option_ids.contains(&option.id) {
                option.vote_count += 1;
            }
        }
        self.total_voters += 1;
    }

    /// Results as seen by a viewer who selected `selected` (empty if they
    /// have not voted)
    pub fn results(&self, selected: &[Snowflake], now: DateTime<Utc>) -> PollResults {
        let has_voted = !selected.is_empty();
        let is_expired = self.is_expired(now);
        let visible = has_voted || is_expired;

        let options = self
            .options
            .iter()
            .map(|o| OptionResult {
                id: o.id,
                text: o.text.clone(),
                vote_count: visible.then_some(o.vote_count),
                percentage: visible.then(|| percentage(o.vote_count, self.total_voters)),
                has_voted: selected.contains(&o.id),
            })
            .collect();

        PollResults {
            post_id: self.post_id,
            choice_mode: self.choice_mode,
            expires_at: self.expires_at,
            is_expired,
            has_voted,
            results_visible: visible,
            total_votes: self.total_voters,
            options,
        }
    }
}

/// Share of voters, rounded half away from zero; 0 when nobody voted
pub fn percentage(count: i64, total: i64) -> u32 {
    if total <= 0 {
        return 0;
    }
    ((count * 200 + total) / (total * 2)) as u32
}

/// Viewer-specific poll state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollResults {
    pub post_id: Snowflake,
    pub choice_mode: ChoiceMode,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_expired: bool,
    pub has_voted: bool,
    pub results_visible: bool,
    pub total_votes: i64,
    pub options: Vec<OptionResult>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionResult {
    pub id: Snowflake,
    pub text: String,
    /// `None` while results are hidden from this viewer
    pub vote_count: Option<i64>,
    pub percentage: Option<u32>,
    pub has_voted: bool,
}
