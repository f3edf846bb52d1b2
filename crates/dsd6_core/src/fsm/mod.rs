//! Finite state machine over an explicitly wired graph.
//!
//! States live in a [`StateMachine`] arena and are referred to by
//! [`StateId`]. Each state owns its outgoing [`Transition`]s; each transition
//! may carry a [`Guard`]. Presentation code supplies [`StateHooks`] per state
//! and calls [`StateMachine::fire_transition`] in response to input.

mod error;
mod hooks;
mod machine;
mod state;
mod transition;

pub use error::{FsmError, StateLabel};
pub use hooks::{NoHooks, StateHooks};
pub use machine::StateMachine;
pub use state::{State, StateId};
pub use transition::{Guard, Transition};
