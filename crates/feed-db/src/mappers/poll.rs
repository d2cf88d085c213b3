//! Poll entity <-> model mapper

use feed_core::entities::{ChoiceMode, Poll, PollOption};
use feed_core::value_objects::Snowflake;

use crate::models::{PollModel, PollOptionModel};

impl From<PollOptionModel> for PollOption {
    fn from(model: PollOptionModel) -> Self {
        PollOption {
            id: Snowflake::new(model.id),
            position: model.position,
            text: model.text,
            vote_count: model.vote_count,
        }
    }
}

/// Assemble a poll from its row and option rows
///
/// Options that belong to other polls are ignored, so callers can pass one
/// batch of option rows for several polls.
pub fn poll_from_rows(model: PollModel, options: &[PollOptionModel]) -> Poll {
    let mut options: Vec<PollOption> = options
        .iter()
        .filter(|o| o.post_id == model.post_id)
        .cloned()
        .map(PollOption::from)
        .collect();
    options.sort_by_key(|o| o.position);

    Poll {
        post_id: Snowflake::new(model.post_id),
        choice_mode: ChoiceMode::parse(&model.choice_mode).unwrap_or_default(),
        options,
        expires_at: model.expires_at,
        total_voters: model.total_voters,
        created_at: model.created_at,
    }
}
