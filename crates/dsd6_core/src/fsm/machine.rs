//! The state graph and the transition firing algorithm.
//!
//! # Example
//!
//! ```
//! use dsd6_core::fsm::{NoHooks, StateMachine};
//! use dsd6_core::identity::IdAllocator;
//!
//! let mut ids = IdAllocator::new();
//! let mut machine: StateMachine<()> = StateMachine::new();
//! let menu = machine.add_state(&mut ids, "menu", NoHooks);
//! let play = machine.add_state(&mut ids, "play", NoHooks);
//! machine.add_transition(&mut ids, menu, play, None).unwrap();
//!
//! machine.start(&mut (), menu).unwrap();
//! assert_eq!(machine.fire_from_current(&mut (), Some(play), None).unwrap(), play);
//! assert_eq!(machine.current(), Some(play));
//! ```

use std::collections::HashMap;
use std::fmt;

use super::error::{FsmError, StateLabel};
use super::hooks::StateHooks;
use super::state::{State, StateId};
use super::transition::{Guard, Transition};
use crate::identity::{EntityId, IdAllocator};

/// Owner of every state, its transitions and its hooks.
///
/// The graph is wired once at start-up. `C` is the context handed to the
/// hooks on every fired transition.
pub struct StateMachine<C> {
    states: Vec<State>,
    hooks: Vec<Box<dyn StateHooks<C>>>,
    index: HashMap<StateId, usize>,
    current: Option<StateId>,
}

impl<C> Default for StateMachine<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for StateMachine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("states", &self.states)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl<C> StateMachine<C> {
    /// Create an empty machine.
    #[must_use]
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            hooks: Vec::new(),
            index: HashMap::new(),
            current: None,
        }
    }

    /// Register a state with its hooks and return its id.
    pub fn add_state(
        &mut self,
        ids: &mut IdAllocator,
        name: impl Into<String>,
        hooks: impl StateHooks<C> + 'static,
    ) -> StateId {
        let uid = ids.next_id();
        self.index.insert(uid, self.states.len());
        self.states.push(State::new(uid, name));
        self.hooks.push(Box::new(hooks));
        uid
    }

    /// Number of states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no states are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// All states in registration order.
    #[must_use]
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Look up a state by id.
    #[must_use]
    pub fn state(&self, id: StateId) -> Option<&State> {
        self.index.get(&id).map(|&i| &self.states[i])
    }

    /// Look up a state by name.
    #[must_use]
    pub fn state_by_name(&self, name: &str) -> Option<&State> {
        self.states.iter().find(|s| s.name() == name)
    }

    /// The state most recently entered, if the machine has been started.
    #[must_use]
    pub const fn current(&self) -> Option<StateId> {
        self.current
    }

    /// The current state itself.
    #[must_use]
    pub fn current_state(&self) -> Option<&State> {
        self.current.and_then(|id| self.state(id))
    }

    /// Add a transition from `source` to `target` and return its id.
    ///
    /// Fails with [`FsmError::DuplicateTransition`] when the pair is already
    /// joined, whatever the guards, and with [`FsmError::StateNotFound`] when
    /// `target` is not a state of this machine. No id is taken from `ids`
    /// unless the transition is added.
    pub fn add_transition(
        &mut self,
        ids: &mut IdAllocator,
        source: StateId,
        target: StateId,
        guard: Option<Box<dyn Guard>>,
    ) -> Result<EntityId, FsmError> {
        let src = self.slot(source)?;
        if !self.index.contains_key(&target) {
            return Err(FsmError::StateNotFound {
                state: target,
                transition: ids.peek(),
            });
        }
        if self.states[src].get_transition(target).is_some() {
            return Err(FsmError::DuplicateTransition {
                from: self.label(source),
                to: self.label(target),
            });
        }

        let uid = ids.next_id();
        let transition = Transition::new(uid, source, target, guard);
        if self.states[src].push_transition(transition).is_err() {
            return Err(FsmError::DuplicateTransition {
                from: self.label(source),
                to: self.label(target),
            });
        }
        Ok(uid)
    }

    /// [`add_transition`](Self::add_transition) with a guard.
    pub fn add_guarded_transition<G>(
        &mut self,
        ids: &mut IdAllocator,
        source: StateId,
        target: StateId,
        guard: G,
    ) -> Result<EntityId, FsmError>
    where
        G: Guard + 'static,
    {
        self.add_transition(ids, source, target, Some(Box::new(guard)))
    }

    /// Transition from `source` to `target`, if any.
    #[must_use]
    pub fn get_transition(&self, source: StateId, target: StateId) -> Option<&Transition> {
        self.state(source)?.get_transition(target)
    }

    /// Remove and return the transition from `source` to `target`.
    pub fn remove_transition(
        &mut self,
        source: StateId,
        target: StateId,
    ) -> Result<Transition, FsmError> {
        let src = self.slot(source)?;
        match self.states[src].take_transition(target) {
            Some(transition) => Ok(transition),
            None => Err(FsmError::TransitionNotFound {
                from: self.label(source),
                to: self.label(target),
            }),
        }
    }

    /// Remove every outgoing transition of `source`.
    pub fn clear_transitions(&mut self, source: StateId) -> Result<(), FsmError> {
        let src = self.slot(source)?;
        self.states[src].clear_transitions();
        Ok(())
    }

    /// Replace the stored guard of the transition from `source` to `target`.
    pub fn set_guard(
        &mut self,
        source: StateId,
        target: StateId,
        guard: Option<Box<dyn Guard>>,
    ) -> Result<(), FsmError> {
        let src = self.slot(source)?;
        if let Some(transition) = self.states[src].get_transition_mut(target) {
            transition.set_guard(guard);
            return Ok(());
        }
        Err(FsmError::TransitionNotFound {
            from: self.label(source),
            to: self.label(target),
        })
    }

    /// Make `state` current and run its `enter` hook with no previous state.
    pub fn start(&mut self, ctx: &mut C, state: StateId) -> Result<(), FsmError> {
        let slot = self.slot(state)?;
        self.current = Some(state);
        tracing::debug!(state = %self.states[slot], "State machine started");
        self.hooks[slot].enter(ctx, &self.states[slot], None);
        Ok(())
    }

    /// Fire a transition out of `source`, short-circuiting self-loops.
    ///
    /// See [`fire_transition_with`](Self::fire_transition_with).
    pub fn fire_transition(
        &mut self,
        ctx: &mut C,
        source: StateId,
        target: Option<StateId>,
        guard: Option<&dyn Guard>,
    ) -> Result<StateId, FsmError> {
        self.fire_transition_with(ctx, source, target, guard, true)
    }

    /// Fire a transition out of the current state.
    pub fn fire_from_current(
        &mut self,
        ctx: &mut C,
        target: Option<StateId>,
        guard: Option<&dyn Guard>,
    ) -> Result<StateId, FsmError> {
        let source = self.current.ok_or(FsmError::NotStarted)?;
        self.fire_transition(ctx, source, target, guard)
    }

    /// Fire a transition out of `source` and return the state entered.
    ///
    /// 1. A state without outgoing transitions fails with
    ///    [`FsmError::NoTransitions`].
    /// 2. With a `target`, the transition to it is used, or the call fails
    ///    with [`FsmError::TransitionNotFound`]. Without one, the first
    ///    transition in insertion order is used.
    /// 3. The one-off `guard` takes precedence over the stored guard. If the
    ///    active guard rejects the move the call fails with
    ///    [`FsmError::GuardFailed`] and nothing changes.
    /// 4. A self-loop with `short_circuit` set returns the target without
    ///    running any hook.
    /// 5. Otherwise the source's `leave` runs, then the target's `enter`, and
    ///    the target becomes current.
    pub fn fire_transition_with(
        &mut self,
        ctx: &mut C,
        source: StateId,
        target: Option<StateId>,
        guard: Option<&dyn Guard>,
        short_circuit: bool,
    ) -> Result<StateId, FsmError> {
        let src = self.slot(source)?;
        let state = &self.states[src];
        if state.transitions().is_empty() {
            return Err(FsmError::NoTransitions {
                state: state.into(),
            });
        }

        let transition = match target {
            Some(target) => state
                .get_transition(target)
                .ok_or_else(|| FsmError::TransitionNotFound {
                    from: state.into(),
                    to: self.label(target),
                })?,
            None => &state.transitions()[0],
        };
        let transition_id = transition.uid();
        let target_id = transition.target();
        let dst = self
            .index
            .get(&target_id)
            .copied()
            .ok_or(FsmError::StateNotFound {
                state: target_id,
                transition: transition_id,
            })?;

        if let Some(active) = guard.or_else(|| transition.guard()) {
            if !active.allows(&self.states[src], &self.states[dst]) {
                tracing::debug!(
                    from = %self.states[src],
                    to = %self.states[dst],
                    transition = transition_id,
                    "Guard rejected transition"
                );
                return Err(FsmError::GuardFailed {
                    from: (&self.states[src]).into(),
                    to: (&self.states[dst]).into(),
                    transition: transition_id,
                });
            }
        }

        if src == dst && short_circuit {
            tracing::trace!(state = %self.states[src], "Short-circuited self-loop");
            self.current = Some(target_id);
            return Ok(target_id);
        }

        let states = &self.states;
        self.hooks[src].leave(ctx, &states[src], &states[dst]);
        self.hooks[dst].enter(ctx, &states[dst], Some(&states[src]));
        self.current = Some(target_id);
        tracing::debug!(
            from = %states[src],
            to = %states[dst],
            transition = transition_id,
            "Transition fired"
        );
        Ok(target_id)
    }

    /// Check that every transition starts at the state owning it and ends at
    /// a registered state.
    pub fn validate(&self) -> Result<(), FsmError> {
        for state in &self.states {
            for transition in state.transitions() {
                if transition.source() != state.uid() {
                    return Err(FsmError::StateNotFound {
                        state: transition.source(),
                        transition: transition.uid(),
                    });
                }
                if !self.index.contains_key(&transition.target()) {
                    return Err(FsmError::StateNotFound {
                        state: transition.target(),
                        transition: transition.uid(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Label for error reporting; unregistered ids get a placeholder name.
    #[must_use]
    pub fn label(&self, id: StateId) -> StateLabel {
        self.state(id)
            .map_or_else(|| StateLabel::unregistered(id), StateLabel::from)
    }

    fn slot(&self, id: StateId) -> Result<usize, FsmError> {
        self.index
            .get(&id)
            .copied()
            .ok_or(FsmError::UnknownState(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hooks that log into a shared vector of strings.
    struct Recorder;

    impl StateHooks<Vec<String>> for Recorder {
        fn enter(&mut self, ctx: &mut Vec<String>, state: &State, previous: Option<&State>) {
            let previous = previous.map_or("none", State::name);
            ctx.push(format!("enter {} from {previous}", state.name()));
        }

        fn leave(&mut self, ctx: &mut Vec<String>, state: &State, next: &State) {
            ctx.push(format!("leave {} to {}", state.name(), next.name()));
        }
    }

    fn deny(_: &State, _: &State) -> bool {
        false
    }

    fn allow(_: &State, _: &State) -> bool {
        true
    }

    fn two_states() -> (StateMachine<Vec<String>>, IdAllocator, StateId, StateId) {
        let mut ids = IdAllocator::new();
        let mut machine = StateMachine::new();
        let a = machine.add_state(&mut ids, "a", Recorder);
        let b = machine.add_state(&mut ids, "b", Recorder);
        (machine, ids, a, b)
    }

    #[test]
    fn test_fire_runs_leave_then_enter() {
        let (mut machine, mut ids, a, b) = two_states();
        machine.add_transition(&mut ids, a, b, None).unwrap();
        let mut log = Vec::new();

        let entered = machine.fire_transition(&mut log, a, Some(b), None).unwrap();

        assert_eq!(entered, b);
        assert_eq!(log, vec!["leave a to b", "enter b from a"]);
        assert_eq!(machine.current(), Some(b));
    }

    #[test]
    fn test_guard_failure_changes_nothing() {
        let (mut machine, mut ids, a, b) = two_states();
        machine
            .add_guarded_transition(&mut ids, a, b, deny)
            .unwrap();
        let mut log = Vec::new();
        machine.start(&mut log, a).unwrap();
        log.clear();

        let err = machine.fire_from_current(&mut log, Some(b), None).unwrap_err();

        assert!(matches!(err, FsmError::GuardFailed { ref from, ref to, .. } if from.uid == a && to.uid == b));
        assert!(log.is_empty());
        assert_eq!(machine.current(), Some(a));

        machine.set_guard(a, b, None).unwrap();
        assert_eq!(machine.fire_from_current(&mut log, Some(b), None).unwrap(), b);
        assert_eq!(log, vec!["leave a to b", "enter b from a"]);
    }

    #[test]
    fn test_one_off_guard_overrides_stored_guard() {
        let (mut machine, mut ids, a, b) = two_states();
        machine
            .add_guarded_transition(&mut ids, a, b, deny)
            .unwrap();
        let mut log = Vec::new();
        assert_eq!(
            machine.fire_transition(&mut log, a, Some(b), Some(&allow)).unwrap(),
            b
        );

        machine.set_guard(a, b, None).unwrap();
        let err = machine
            .fire_transition(&mut log, a, Some(b), Some(&deny))
            .unwrap_err();
        assert!(matches!(err, FsmError::GuardFailed { .. }));
    }

    #[test]
    fn test_guard_sees_source_and_target() {
        let (mut machine, mut ids, a, b) = two_states();
        machine
            .add_guarded_transition(&mut ids, a, b, |s: &State, t: &State| {
                s.name() == "a" && t.name() == "b"
            })
            .unwrap();
        let mut log = Vec::new();
        assert!(machine.fire_transition(&mut log, a, Some(b), None).is_ok());
    }

    #[test]
    fn test_no_transitions() {
        let (mut machine, _ids, a, b) = two_states();
        let mut log = Vec::new();
        let err = machine.fire_transition(&mut log, a, Some(b), None).unwrap_err();
        assert!(matches!(err, FsmError::NoTransitions { ref state } if state.uid == a));
    }

    #[test]
    fn test_transition_not_found() {
        let (mut machine, mut ids, a, b) = two_states();
        let c = machine.add_state(&mut ids, "c", Recorder);
        machine.add_transition(&mut ids, a, b, None).unwrap();
        let mut log = Vec::new();
        let err = machine.fire_transition(&mut log, a, Some(c), None).unwrap_err();
        assert!(matches!(err, FsmError::TransitionNotFound { ref to, .. } if to.uid == c));
        assert!(log.is_empty());
    }

    #[test]
    fn test_untargeted_fire_uses_first_transition() {
        let (mut machine, mut ids, a, b) = two_states();
        let c = machine.add_state(&mut ids, "c", Recorder);
        machine.add_transition(&mut ids, a, c, None).unwrap();
        machine.add_transition(&mut ids, a, b, None).unwrap();
        let mut log = Vec::new();
        assert_eq!(machine.fire_transition(&mut log, a, None, None).unwrap(), c);
    }

    #[test]
    fn test_self_loop_short_circuits() {
        let (mut machine, mut ids, a, _b) = two_states();
        machine.add_transition(&mut ids, a, a, None).unwrap();
        let mut log = Vec::new();

        assert_eq!(machine.fire_transition(&mut log, a, Some(a), None).unwrap(), a);
        assert!(log.is_empty());

        machine
            .fire_transition_with(&mut log, a, Some(a), None, false)
            .unwrap();
        assert_eq!(log, vec!["leave a to a", "enter a from a"]);
    }

    #[test]
    fn test_self_loop_guard_still_checked() {
        let (mut machine, mut ids, a, _b) = two_states();
        machine
            .add_guarded_transition(&mut ids, a, a, deny)
            .unwrap();
        let mut log = Vec::new();
        assert!(matches!(
            machine.fire_transition(&mut log, a, Some(a), None),
            Err(FsmError::GuardFailed { .. })
        ));
    }

    #[test]
    fn test_duplicate_transition_rejected() {
        let (mut machine, mut ids, a, b) = two_states();
        machine.add_transition(&mut ids, a, b, None).unwrap();
        let next = ids.peek();
        let err = machine
            .add_guarded_transition(&mut ids, a, b, allow)
            .unwrap_err();
        assert!(matches!(err, FsmError::DuplicateTransition { .. }));
        assert_eq!(ids.peek(), next);
        assert_eq!(machine.state(a).unwrap().transitions().len(), 1);
        assert!(machine.get_transition(a, b).unwrap().guard().is_none());
    }

    #[test]
    fn test_transition_to_unregistered_state() {
        let (mut machine, mut ids, a, _b) = two_states();
        let next = ids.peek();
        let err = machine.add_transition(&mut ids, a, 42, None).unwrap_err();
        assert_eq!(
            err,
            FsmError::StateNotFound {
                state: 42,
                transition: next,
            }
        );
        assert!(machine.state(a).unwrap().transitions().is_empty());
        assert_eq!(ids.peek(), next);
        assert_eq!(machine.add_transition(&mut ids, a, a, None).unwrap(), next);
    }

    #[test]
    fn test_remove_transition() {
        let (mut machine, mut ids, a, b) = two_states();
        let uid = machine.add_transition(&mut ids, a, b, None).unwrap();
        assert_eq!(machine.remove_transition(a, b).unwrap().uid(), uid);
        assert!(matches!(
            machine.remove_transition(a, b),
            Err(FsmError::TransitionNotFound { .. })
        ));
    }

    #[test]
    fn test_clear_transitions() {
        let (mut machine, mut ids, a, b) = two_states();
        machine.add_transition(&mut ids, a, b, None).unwrap();
        machine.add_transition(&mut ids, a, a, None).unwrap();
        machine.clear_transitions(a).unwrap();
        assert!(machine.state(a).unwrap().transitions().is_empty());
    }

    #[test]
    fn test_unknown_source() {
        let (mut machine, _ids, _a, _b) = two_states();
        let mut log = Vec::new();
        assert_eq!(
            machine.fire_transition(&mut log, 7, None, None),
            Err(FsmError::UnknownState(7))
        );
        assert_eq!(machine.clear_transitions(7), Err(FsmError::UnknownState(7)));
    }

    #[test]
    fn test_fire_from_current_requires_start() {
        let (mut machine, mut ids, a, b) = two_states();
        machine.add_transition(&mut ids, a, b, None).unwrap();
        let mut log = Vec::new();
        assert_eq!(
            machine.fire_from_current(&mut log, None, None),
            Err(FsmError::NotStarted)
        );
    }

    #[test]
    fn test_start_enters_without_previous() {
        let (mut machine, _ids, a, _b) = two_states();
        let mut log = Vec::new();
        machine.start(&mut log, a).unwrap();
        assert_eq!(log, vec!["enter a from none"]);
        assert_eq!(machine.current_state().map(State::name), Some("a"));
    }

    #[test]
    fn test_lookup_by_name_and_validate() {
        let (mut machine, mut ids, a, b) = two_states();
        machine.add_transition(&mut ids, a, b, None).unwrap();
        machine.add_transition(&mut ids, b, a, None).unwrap();
        assert_eq!(machine.state_by_name("b").map(State::uid), Some(b));
        assert!(machine.state_by_name("z").is_none());
        assert!(machine.validate().is_ok());
        assert_eq!(machine.len(), 2);
    }
}
