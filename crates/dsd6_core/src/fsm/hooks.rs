//! Lifecycle hooks invoked when the machine moves between states.

use super::state::State;

/// Per-state `enter`/`leave` behaviour.
///
/// `C` is the session context shared by every state (for a game this holds
/// the ship, the deck, the dice and whatever the presentation layer needs).
/// Both methods default to doing nothing.
///
/// The machine calls `leave` on the source and then `enter` on the target,
/// exactly once each per fired transition, and not at all for a
/// short-circuited self-loop. Hooks cannot fire transitions themselves; a hook
/// that wants to move on records the request in the context and the caller
/// fires it once the current transition has returned.
pub trait StateHooks<C> {
    /// Called on the target state after the source has been left.
    ///
    /// `previous` is `None` when the machine is started.
    fn enter(&mut self, _ctx: &mut C, _state: &State, _previous: Option<&State>) {}

    /// Called on the source state before the target is entered.
    fn leave(&mut self, _ctx: &mut C, _state: &State, _next: &State) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl<C> StateHooks<C> for NoHooks {}
