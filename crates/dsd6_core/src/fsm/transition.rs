//! Directed edges between states.

use std::fmt;

use super::state::{State, StateId};
use crate::identity::EntityId;

/// Predicate deciding whether a transition may fire.
///
/// Guards receive the source and target state and must be free of side
/// effects. Any `Fn(&State, &State) -> bool` closure is a guard.
pub trait Guard {
    /// Whether moving from `source` to `target` is allowed right now.
    fn allows(&self, source: &State, target: &State) -> bool;
}

impl<F> Guard for F
where
    F: Fn(&State, &State) -> bool,
{
    fn allows(&self, source: &State, target: &State) -> bool {
        self(source, target)
    }
}

/// Edge from `source` to `target` with an optional guard.
///
/// Source and target are fixed for the life of the transition. Two
/// transitions are equal when they join the same pair of states; the guard
/// takes no part in equality.
pub struct Transition {
    uid: EntityId,
    source: StateId,
    target: StateId,
    guard: Option<Box<dyn Guard>>,
}

impl Transition {
    pub(crate) fn new(
        uid: EntityId,
        source: StateId,
        target: StateId,
        guard: Option<Box<dyn Guard>>,
    ) -> Self {
        Self {
            uid,
            source,
            target,
            guard,
        }
    }

    /// Transition id.
    #[must_use]
    pub const fn uid(&self) -> EntityId {
        self.uid
    }

    /// State that owns this transition.
    #[must_use]
    pub const fn source(&self) -> StateId {
        self.source
    }

    /// State this transition leads to.
    #[must_use]
    pub const fn target(&self) -> StateId {
        self.target
    }

    /// Stored guard, if any.
    #[must_use]
    pub fn guard(&self) -> Option<&dyn Guard> {
        self.guard.as_deref()
    }

    /// Replace the stored guard.
    pub fn set_guard(&mut self, guard: Option<Box<dyn Guard>>) {
        self.guard = guard;
    }

    /// Whether source and target are the same state.
    #[must_use]
    pub const fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// Whether this transition joins `source` to `target`.
    #[must_use]
    pub const fn joins(&self, source: StateId, target: StateId) -> bool {
        self.source == source && self.target == target
    }
}

impl PartialEq for Transition {
    fn eq(&self, other: &Self) -> bool {
        self.joins(other.source, other.target)
    }
}

impl Eq for Transition {}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("uid", &self.uid)
            .field("source", &self.source)
            .field("target", &self.target)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "transition [{}]:{}->{}",
            self.uid, self.source, self.target
        )
    }
}
