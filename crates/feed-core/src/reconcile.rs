//! Client-side reconciliation contract
//!
//! A client keeps two layers per vote button: the last authoritative
//! state from the server and a queue of optimistic toggles still in
//! flight. What it displays is the authoritative state with the pending
//! deltas replayed on top. Confirming a toggle adopts the server's
//! answer; failing a toggle removes exactly that toggle's delta.
//!
//! [`RequestSequencer`] covers the read side: a response is applied only
//! if no newer request was issued for the same slot.

use std::collections::HashMap;
use std::hash::Hash;

use crate::entities::VoteOutcome;

/// What a vote button shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteState {
    pub voted: bool,
    pub count: i64,
}

/// Handle for one optimistic toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteToggle {
    token: u64,
    delta: i64,
}

impl VoteToggle {
    #[inline]
    pub fn delta(&self) -> i64 {
        self.delta
    }
}

#[derive(Debug, Clone)]
pub struct OptimisticVote {
    confirmed: VoteState,
    pending: Vec<VoteToggle>,
    next_token: u64,
}

impl OptimisticVote {
    pub fn new(voted: bool, count: i64) -> Self {
        Self {
            confirmed: VoteState { voted, count },
            pending: Vec::new(),
            next_token: 0,
        }
    }

    /// Confirmed state with in-flight toggles replayed
    pub fn displayed(&self) -> VoteState {
        self.pending
            .iter()
            .fold(self.confirmed, |state, toggle| VoteState {
                voted: !state.voted,
                count: (state.count + toggle.delta).max(0),
            })
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Flip the displayed state immediately
    pub fn apply(&mut self) -> VoteToggle {
        let delta = if self.displayed().voted { -1 } else { 1 };
        let toggle = VoteToggle {
            token: self.next_token,
            delta,
        };
        self.next_token += 1;
        self.pending.push(toggle);
        toggle
    }

    /// The server accepted `toggle`; its answer becomes the new base
    pub fn confirm(&mut self, toggle: VoteToggle, outcome: VoteOutcome) {
        self.pending.retain(|t| t.token != toggle.token);
        self.confirmed = VoteState {
            voted: outcome.voted,
            count: outcome.new_count,
        };
    }

    /// The server rejected `toggle`; undo only its delta
    pub fn rollback(&mut self, toggle: VoteToggle) {
        self.pending.retain(|t| t.token != toggle.token);
    }
}

/// Ticket for one request in a slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    slot: K,
    seq: u64,
}

/// Monotonic request tags per slot (e.g. "post list", "replies of X")
#[derive(Debug)]
pub struct RequestSequencer<K> {
    latest: HashMap<K, u64>,
    next: u64,
}

impl<K: Eq + Hash + Clone> RequestSequencer<K> {
    pub fn new() -> Self {
        Self {
            latest: HashMap::new(),
            next: 0,
        }
    }

    /// Start a request, superseding any earlier one in the same slot
    pub fn issue(&mut self, slot: K) -> Ticket<K> {
        self.next += 1;
        self.latest.insert(slot.clone(), self.next);
        Ticket {
            slot,
            seq: self.next,
        }
    }

    pub fn is_current(&self, ticket: &Ticket<K>) -> bool {
        self.latest.get(&ticket.slot) == Some(&ticket.seq)
    }

    /// Pass the response through only if it is still the latest
    pub fn accept<T>(&self, ticket: &Ticket<K>, response: T) -> Option<T> {
        self.is_current(ticket).then_some(response)
    }
}

impl<K: Eq + Hash + Clone> Default for RequestSequencer<K> {
    fn default() -> Self {
        Self::new()
    }
}
