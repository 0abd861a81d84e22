//! Typed state machines
//!
//! States are plain enums that describe their own transitions through
//! [`StateTransitions`]. [`StateMachine`] drives one of them, records the
//! transitions taken since the last reset, and logs each one at trace level.
//!
//! ```rust
//! use drawer_core::fsm::{EventId, StateMachine, StateTransitions};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Light {
//!     Off,
//!     On,
//! }
//!
//! const TOGGLE: EventId = 1;
//!
//! impl StateTransitions for Light {
//!     fn on_event(&self, event: EventId) -> Option<Self> {
//!         match (self, event) {
//!             (Light::Off, TOGGLE) => Some(Light::On),
//!             (Light::On, TOGGLE) => Some(Light::Off),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut fsm = StateMachine::new(Light::Off);
//! assert_eq!(fsm.send(TOGGLE), Some(Light::On));
//! assert_eq!(fsm.current(), Light::On);
//! ```

use std::fmt::Debug;

use smallvec::SmallVec;

/// Identifier for an event fed to a state machine
pub type EventId = u32;

/// Trait for state enums that map events to transitions
pub trait StateTransitions: Clone + Copy + PartialEq + Eq + Debug + 'static {
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: EventId) -> Option<Self>;
}

/// A state machine instance over a user-defined state type
#[derive(Debug, Clone)]
pub struct StateMachine<S: StateTransitions> {
    current: S,
    /// Transitions since the last reset (for debugging and tests)
    history: SmallVec<[(S, EventId, S); 8]>,
}

impl<S: StateTransitions> StateMachine<S> {
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            history: SmallVec::new(),
        }
    }

    /// Get the current state
    pub fn current(&self) -> S {
        self.current
    }

    /// Check if we're in a specific state
    pub fn is_in(&self, state: S) -> bool {
        self.current == state
    }

    /// Check if an event would trigger a transition from the current state
    pub fn can_send(&self, event: EventId) -> bool {
        self.current.on_event(event).is_some()
    }

    /// Send an event, returning the new state if a transition happened
    pub fn send(&mut self, event: EventId) -> Option<S> {
        let from = self.current;
        let to = from.on_event(event)?;

        tracing::trace!("fsm {:?} --{}--> {:?}", from, event, to);

        self.current = to;
        self.history.push((from, event, to));
        Some(to)
    }

    /// Transitions taken since the last reset
    pub fn history(&self) -> &[(S, EventId, S)] {
        &self.history
    }

    /// Force a state and forget the history
    pub fn reset(&mut self, state: S) {
        self.current = state;
        self.history.clear();
    }
}
