//! Named nodes of the transition graph.

use std::fmt;

use super::transition::Transition;
use crate::identity::EntityId;

/// Identifier of a state.
pub type StateId = EntityId;

/// A named state and its outgoing transitions, in insertion order.
///
/// States are compared by id only. Transitions are added and removed through
/// [`StateMachine`](super::StateMachine), which owns the graph and checks that
/// both ends are registered.
#[derive(Debug)]
pub struct State {
    uid: StateId,
    name: String,
    transitions: Vec<Transition>,
}

impl State {
    pub(crate) fn new(uid: StateId, name: impl Into<String>) -> Self {
        Self {
            uid,
            name: name.into(),
            transitions: Vec::new(),
        }
    }

    /// State id.
    #[must_use]
    pub const fn uid(&self) -> StateId {
        self.uid
    }

    /// State name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Outgoing transitions in insertion order.
    #[must_use]
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Transition leading to `target`, if any.
    #[must_use]
    pub fn get_transition(&self, target: StateId) -> Option<&Transition> {
        self.transitions
            .iter()
            .find(|t| t.joins(self.uid, target))
    }

    pub(crate) fn get_transition_mut(&mut self, target: StateId) -> Option<&mut Transition> {
        let uid = self.uid;
        self.transitions
            .iter_mut()
            .find(|t| t.joins(uid, target))
    }

    /// Append a transition. Returns it back if an equal one already exists.
    pub(crate) fn push_transition(&mut self, transition: Transition) -> Result<(), Transition> {
        if self.transitions.contains(&transition) {
            return Err(transition);
        }
        self.transitions.push(transition);
        Ok(())
    }

    pub(crate) fn take_transition(&mut self, target: StateId) -> Option<Transition> {
        let uid = self.uid;
        let pos = self
            .transitions
            .iter()
            .position(|t| t.joins(uid, target))?;
        Some(self.transitions.remove(pos))
    }

    pub(crate) fn clear_transitions(&mut self) {
        self.transitions.clear();
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
    }
}

impl Eq for State {}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state [{}]:[{}]", self.uid, self.name)
    }
}
