//! Unique identity allocation.
//!
//! Every identified entity (states, transitions, threat cards, ships) takes
//! its id from an [`IdAllocator`]. A session creates one allocator at start-up
//! and threads it through every constructor; it is never reset, so ids are
//! never reused while the session lives.

use serde::{Deserialize, Serialize};

/// Unique identifier for identified entities.
pub type EntityId = u64;

/// First id handed out by a fresh allocator.
pub const FIRST_UID: EntityId = 1_000_000_000;

/// Monotonically increasing id issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next: EntityId,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    /// Create an allocator starting at [`FIRST_UID`].
    #[must_use]
    pub const fn new() -> Self {
        Self { next: FIRST_UID }
    }

    /// Create an allocator starting at an arbitrary value.
    #[must_use]
    pub const fn starting_at(first: EntityId) -> Self {
        Self { next: first }
    }

    /// Return the current counter value, then advance it by one.
    pub fn next_id(&mut self) -> EntityId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The id the next call to [`next_id`](Self::next_id) will return.
    #[must_use]
    pub const fn peek(&self) -> EntityId {
        self.next
    }
}
