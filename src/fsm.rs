//! Data-driven finite state machine driver.
//!
//! A machine is a plain value: a table from state tag to [`StateBehavior`],
//! where each behavior maps an event kind to a [`Reaction`]. A reaction runs
//! its action against the context (producing an output), then picks the next
//! state: the first guard whose predicate holds, or the default target.
//! Exit and enter hooks run only when the state actually changes. Events the
//! current state has no reaction for are reported as unhandled and change
//! nothing. A passive reaction runs its action but is also reported as
//! unhandled.

#[cfg(test)]
#[path = "fsm_test.rs"]
mod fsm_test;

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// An event that can be looked up in a reaction table by its kind.
pub trait MachineEvent {
    type Kind: Copy + Eq + Hash + fmt::Debug;

    fn kind(&self) -> Self::Kind;
}

pub type Action<C, E, O> = fn(&mut C, &E) -> O;
pub type Hook<C> = fn(&mut C);

/// Overrides a reaction's default target when `predicate` holds after the action ran.
pub struct Guard<S, C> {
    pub predicate: fn(&C) -> bool,
    pub target: S,
}

pub struct Reaction<S, C, E, O> {
    pub action: Action<C, E, O>,
    pub default_target: S,
    pub guards: Vec<Guard<S, C>>,
    pub passive: bool,
}

impl<S, C, E, O> Reaction<S, C, E, O> {
    #[must_use]
    pub fn new(action: Action<C, E, O>, default_target: S) -> Self {
        Self { action, default_target, guards: Vec::new(), passive: false }
    }

    /// Bookkeeping only: the action runs but the event counts as unhandled.
    #[must_use]
    pub fn passive(mut self) -> Self {
        self.passive = true;
        self
    }

    /// Add a guard. Guards are evaluated in insertion order.
    #[must_use]
    pub fn guard(mut self, predicate: fn(&C) -> bool, target: S) -> Self {
        self.guards.push(Guard { predicate, target });
        self
    }
}

pub struct StateBehavior<S, C, E: MachineEvent, O> {
    reactions: HashMap<E::Kind, Reaction<S, C, E, O>>,
    on_enter: Option<Hook<C>>,
    on_exit: Option<Hook<C>>,
}

impl<S, C, E: MachineEvent, O> Default for StateBehavior<S, C, E, O> {
    fn default() -> Self {
        Self { reactions: HashMap::new(), on_enter: None, on_exit: None }
    }
}

impl<S, C, E: MachineEvent, O> StateBehavior<S, C, E, O> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on(mut self, kind: E::Kind, reaction: Reaction<S, C, E, O>) -> Self {
        self.reactions.insert(kind, reaction);
        self
    }

    #[must_use]
    pub fn with_enter(mut self, hook: Hook<C>) -> Self {
        self.on_enter = Some(hook);
        self
    }

    #[must_use]
    pub fn with_exit(mut self, hook: Hook<C>) -> Self {
        self.on_exit = Some(hook);
        self
    }

    #[must_use]
    pub fn handles(&self, kind: E::Kind) -> bool {
        self.reactions.contains_key(&kind)
    }
}

/// Result of feeding one event to a machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S, O> {
    pub handled: bool,
    pub from: S,
    pub next_state: S,
    pub output: Option<O>,
}

pub struct StateMachine<S, C, E: MachineEvent, O> {
    name: &'static str,
    states: HashMap<S, StateBehavior<S, C, E, O>>,
    current: S,
    context: C,
}

impl<S: fmt::Debug, C, E: MachineEvent, O> fmt::Debug for StateMachine<S, C, E, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("name", &self.name)
            .field("current", &self.current)
            .field("states", &self.states.len())
            .finish_non_exhaustive()
    }
}

impl<S, C, E, O> StateMachine<S, C, E, O>
where
    S: Copy + Eq + Hash + fmt::Debug,
    E: MachineEvent,
{
    /// An empty machine sitting in `initial`. The initial state's enter hook is not run.
    #[must_use]
    pub fn new(name: &'static str, initial: S, context: C) -> Self {
        Self { name, states: HashMap::new(), current: initial, context }
    }

    #[must_use]
    pub fn with_state(mut self, state: S, behavior: StateBehavior<S, C, E, O>) -> Self {
        self.states.insert(state, behavior);
        self
    }

    #[must_use]
    pub fn current_state(&self) -> S {
        self.current
    }

    #[must_use]
    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// Whether the current state has a reaction for `kind`.
    #[must_use]
    pub fn can_handle(&self, kind: E::Kind) -> bool {
        self.states.get(&self.current).is_some_and(|behavior| behavior.handles(kind))
    }

    /// Feed one event through the current state's reaction table.
    pub fn happens(&mut self, event: &E) -> Transition<S, O> {
        let from = self.current;
        let kind = event.kind();
        let Some(reaction) = self.states.get(&from).and_then(|behavior| behavior.reactions.get(&kind)) else {
            tracing::trace!(machine = self.name, state = ?from, event = ?kind, "event not handled");
            return Transition { handled: false, from, next_state: from, output: None };
        };

        let passive = reaction.passive;
        let output = (reaction.action)(&mut self.context, event);
        let next = reaction
            .guards
            .iter()
            .find(|guard| (guard.predicate)(&self.context))
            .map_or(reaction.default_target, |guard| guard.target);

        if next != from {
            self.switch_to(next);
            tracing::debug!(machine = self.name, from = ?from, to = ?next, event = ?kind, "state transition");
        }
        Transition { handled: !passive, from, next_state: next, output: Some(output) }
    }

    /// Jump straight to `state`, running exit and enter hooks if it differs.
    pub fn switch_to(&mut self, state: S) {
        if state == self.current {
            return;
        }
        if let Some(exit) = self.states.get(&self.current).and_then(|behavior| behavior.on_exit) {
            exit(&mut self.context);
        }
        self.current = state;
        if let Some(enter) = self.states.get(&state).and_then(|behavior| behavior.on_enter) {
            enter(&mut self.context);
        }
    }
}
