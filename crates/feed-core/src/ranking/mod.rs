//! Ranking engine - orders a guild's posts for the hot, new and top views
//!
//! Pinned posts always come first, most recently pinned first. The rest
//! are ordered by the selected mode, with `created_at` then `id` (both
//! descending) as tie-breaks so pages are stable.
//!
//! The functions here are pure and take `now` explicitly. Storage
//! backends either call [`rank`] directly or encode the same ordering in
//! their query language.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::entities::{Post, PostTag};
use crate::value_objects::Snowflake;

/// Post list ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Hot,
    New,
    Top,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::New => "new",
            Self::Top => "top",
        }
    }
}

/// Creation-time restriction for the `top` view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Week,
    Month,
    #[default]
    All,
}

impl TimeWindow {
    /// Oldest creation time inside the window
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Week => Some(now - Duration::days(7)),
            Self::Month => Some(now - Duration::days(30)),
            Self::All => None,
        }
    }
}

/// Constants of the hot decay curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HotDecay {
    pub gravity: f64,
    pub age_offset_hours: f64,
}

impl Default for HotDecay {
    fn default() -> Self {
        Self {
            gravity: 1.8,
            age_offset_hours: 2.0,
        }
    }
}

/// `sign(v) * log10(max(|v|, 1)) / (age_hours + offset)^gravity`
pub fn hot_score(upvotes: i64, created_at: DateTime<Utc>, now: DateTime<Utc>, decay: HotDecay) -> f64 {
    let age_hours = ((now - created_at).num_milliseconds().max(0) as f64) / 3_600_000.0;
    let magnitude = (upvotes.unsigned_abs().max(1) as f64).log10();
    let sign = upvotes.signum() as f64;
    sign * magnitude / (age_hours + decay.age_offset_hours).powf(decay.gravity)
}

/// A post list request after defaults and clamping
#[derive(Debug, Clone, PartialEq)]
pub struct PostQuery {
    pub guild_id: Snowflake,
    pub sort: SortMode,
    pub tag: Option<PostTag>,
    /// Only consulted for [`SortMode::Top`]
    pub window: TimeWindow,
    /// 1-based
    pub page: u32,
    pub limit: u32,
    /// Restrict to these posts (bookmarked-only listing)
    pub only_ids: Option<Vec<Snowflake>>,
}

impl PostQuery {
    pub fn new(guild_id: Snowflake) -> Self {
        Self {
            guild_id,
            sort: SortMode::default(),
            tag: None,
            window: TimeWindow::default(),
            page: 1,
            limit: 20,
            only_ids: None,
        }
    }

    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1) * self.limit as usize
    }

    /// Effective window cutoff, `None` outside the top view
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self.sort {
            SortMode::Top => self.window.cutoff(now),
            SortMode::Hot | SortMode::New => None,
        }
    }

    /// Filter predicate applied before ordering and pagination
    pub fn matches(&self, post: &Post, now: DateTime<Utc>) -> bool {
        if post.guild_id != self.guild_id {
            return false;
        }
        if self.tag.is_some_and(|tag| post.tag != tag) {
            return false;
        }
        if let Some(ids) = &self.only_ids {
            if !ids.contains(&post.id) {
                return false;
            }
        }
        // pinned posts stay visible regardless of the window
        match self.cutoff(now) {
            Some(cutoff) if !post.is_pinned => post.created_at >= cutoff,
            _ => true,
        }
    }
}

/// One page of results plus the total match count
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            total: 0,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

/// Total ordering of two posts under `sort`
pub fn compare(a: &Post, b: &Post, sort: SortMode, now: DateTime<Utc>, decay: HotDecay) -> Ordering {
    let pinned = match (a.is_pinned, b.is_pinned) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => b.pinned_at.cmp(&a.pinned_at),
        (false, false) => Ordering::Equal,
    };

    let by_mode = || match sort {
        SortMode::New => Ordering::Equal,
        SortMode::Top => b.upvote_count.cmp(&a.upvote_count),
        SortMode::Hot => {
            let score_a = hot_score(a.upvote_count, a.created_at, now, decay);
            let score_b = hot_score(b.upvote_count, b.created_at, now, decay);
            score_b.total_cmp(&score_a)
        }
    };

    pinned
        .then_with(|| if a.is_pinned { Ordering::Equal } else { by_mode() })
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| b.id.cmp(&a.id))
}

/// Filter, order and paginate posts in memory
pub fn rank(
    posts: impl IntoIterator<Item = Post>,
    query: &PostQuery,
    now: DateTime<Utc>,
    decay: HotDecay,
) -> Page<Post> {
    let mut matched: Vec<Post> = posts
        .into_iter()
        .filter(|p| query.matches(p, now))
        .collect();
    let total = matched.len() as i64;

    matched.sort_by(|a, b| compare(a, b, query.sort, now, decay));

    let data = matched
        .into_iter()
        .skip(query.offset())
        .take(query.limit as usize)
        .collect();

    Page { data, total }
}
