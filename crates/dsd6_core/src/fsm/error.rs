//! FSM error taxonomy.

use std::fmt;

use thiserror::Error;

use super::state::{State, StateId};
use crate::identity::EntityId;

/// Id and name of a state, carried by errors for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateLabel {
    /// State id.
    pub uid: StateId,
    /// State name.
    pub name: String,
}

impl StateLabel {
    /// Label for a state that is not registered in the machine.
    #[must_use]
    pub fn unregistered(uid: StateId) -> Self {
        Self {
            uid,
            name: "<unregistered>".to_string(),
        }
    }
}

impl From<&State> for StateLabel {
    fn from(state: &State) -> Self {
        Self {
            uid: state.uid(),
            name: state.name().to_string(),
        }
    }
}

impl fmt::Display for StateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]:[{}]", self.uid, self.name)
    }
}

/// Errors raised while building or navigating the state graph.
///
/// None of these are retried. A failed guard leaves every state exactly as it
/// was; no hook runs before the guard check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsmError {
    /// The active guard rejected the transition.
    #[error("Guard function failed during transition between states {from}->{to} using transition [{transition}]")]
    GuardFailed {
        /// State the transition leaves.
        from: StateLabel,
        /// State the transition would have entered.
        to: StateLabel,
        /// Transition that was attempted.
        transition: EntityId,
    },

    /// A transition refers to a state outside the graph.
    #[error("State [{state}] not found in transition [{transition}]")]
    StateNotFound {
        /// Missing state id.
        state: StateId,
        /// Transition referring to it.
        transition: EntityId,
    },

    /// Firing from a state with no outgoing transitions.
    #[error("State {state} has no transitions")]
    NoTransitions {
        /// The dead-end state.
        state: StateLabel,
    },

    /// No transition joins the two states.
    #[error("Transition not found that has states {from}->{to}")]
    TransitionNotFound {
        /// Source state.
        from: StateLabel,
        /// Requested target.
        to: StateLabel,
    },

    /// A transition between the two states already exists.
    #[error("Duplicate transition for states {from}->{to}")]
    DuplicateTransition {
        /// Source state.
        from: StateLabel,
        /// Target state.
        to: StateLabel,
    },

    /// The id is not a state of this machine.
    #[error("Unknown state id: {0}")]
    UnknownState(StateId),

    /// The machine has no current state yet.
    #[error("State machine has not been started")]
    NotStarted,
}
