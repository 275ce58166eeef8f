//! Virtual-time event queue.
//!
//! Events fire in order of due time, then in the order they were scheduled.
//! Time only moves when the owner advances it, so a run is reproducible for
//! a given seed and input sequence.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::core::player::PlayerId;

/// A pending driver event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    /// One countdown step for the timer generation `timer`.
    Tick { timer: u64 },

    /// A computer seat's move for the turn tagged by `epoch`.
    ComputerMove { player: PlayerId, epoch: u64 },

    /// Deal and open a new game.
    Start,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Scheduled {
    due_ms: u64,
    seq: u64,
    event: Event,
}

// Reversed so the max-heap pops the earliest entry first.
impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Queue of events keyed by virtual due time.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_seq: u64,
    queue: BinaryHeap<Scheduled>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Queue `event` to fire `delay_ms` after now.
    pub fn schedule(&mut self, delay_ms: u64, event: Event) {
        let entry = Scheduled {
            due_ms: self.now_ms.saturating_add(delay_ms),
            seq: self.next_seq,
            event,
        };
        self.next_seq += 1;
        self.queue.push(entry);
    }

    /// Due time of the next event, if any.
    #[must_use]
    pub fn next_due_ms(&self) -> Option<u64> {
        self.queue.peek().map(|s| s.due_ms)
    }

    /// Pop the next event due at or before `until_ms`, moving the clock to
    /// its due time.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Event> {
        if self.next_due_ms()? > until_ms {
            return None;
        }
        let entry = self.queue.pop()?;
        self.now_ms = self.now_ms.max(entry.due_ms);
        Some(entry.event)
    }

    /// Move the clock forward to `ms`. Never moves it backwards.
    pub fn advance_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }
}
