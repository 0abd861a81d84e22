//! Observer registry
//!
//! Holds everything outside code subscribed to on a sheet: scroll listeners,
//! the single raw-event delegate, the header bindings, and the last scrolling
//! state reported. Listeners may unsubscribe from inside a notification;
//! the remaining listeners of that notification still run.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use drawer_core::PointerEvent;
use indexmap::IndexMap;
use serde::Serialize;
use smallvec::SmallVec;

use crate::header::HeaderBindings;
use crate::state::ScrollingState;

/// Notification delivered to sheet listeners
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SheetEvent {
    /// The committed translation changed
    ScrollChange { offset: f32, velocity_y: f32 },
    /// The finger lifted while the sheet held the gesture
    ScrollRelease { offset: f32, velocity_y: f32 },
    /// The finger lifted, whoever held the gesture
    FingerUp { velocity_y: f32 },
    /// Horizontal movement beyond the horizontal slop, and every release
    HorizontalScroll {
        event: PointerEvent,
        delta_x: f32,
        delta_y: f32,
    },
    ScrollingState { state: ScrollingState },
}

/// Callback registered for [`SheetEvent`]s
pub type SheetListener = Rc<dyn Fn(&SheetEvent)>;

/// Callback receiving every handled pointer event in content coordinates
pub type RawEventDelegate = Box<dyn FnMut(&PointerEvent)>;

/// Identity of a registered listener
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type ListenerSlots = RefCell<IndexMap<ListenerId, SheetListener>>;

/// Handle returned by [`ObserverRegistry::add_listener`]
#[derive(Clone)]
pub struct Subscription {
    id: ListenerId,
    slots: Weak<ListenerSlots>,
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Remove the listener. Safe to call from inside a notification.
    pub fn unsubscribe(&self) -> bool {
        match self.slots.upgrade() {
            Some(slots) => slots.borrow_mut().shift_remove(&self.id).is_some(),
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.slots
            .upgrade()
            .map(|slots| slots.borrow().contains_key(&self.id))
            .unwrap_or(false)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Listeners, delegate and header bindings of one sheet
pub struct ObserverRegistry {
    listeners: Rc<ListenerSlots>,
    next_id: Cell<u64>,
    delegate: Option<RawEventDelegate>,
    headers: HeaderBindings,
    scrolling_state: ScrollingState,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self {
            listeners: Rc::new(RefCell::new(IndexMap::new())),
            next_id: Cell::new(1),
            delegate: None,
            headers: HeaderBindings::new(),
            scrolling_state: ScrollingState::default(),
        }
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Register a listener. Registering the same `Rc` twice returns the
    /// existing subscription.
    pub fn add_listener(&self, listener: SheetListener) -> Subscription {
        let existing = self
            .listeners
            .borrow()
            .iter()
            .find(|(_, registered)| Rc::ptr_eq(registered, &listener))
            .map(|(id, _)| *id);

        let id = match existing {
            Some(id) => id,
            None => {
                let id = ListenerId(self.next_id.get());
                self.next_id.set(id.0 + 1);
                self.listeners.borrow_mut().insert(id, listener);
                id
            }
        };

        Subscription {
            id,
            slots: Rc::downgrade(&self.listeners),
        }
    }

    /// Remove a listener by identity
    pub fn remove_listener(&self, listener: &SheetListener) -> bool {
        let mut slots = self.listeners.borrow_mut();
        let found = slots
            .iter()
            .find(|(_, registered)| Rc::ptr_eq(registered, listener))
            .map(|(id, _)| *id);
        match found {
            Some(id) => slots.shift_remove(&id).is_some(),
            None => false,
        }
    }

    pub fn clear_listeners(&self) {
        self.listeners.borrow_mut().clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Deliver `event` to every listener in registration order
    pub fn notify(&self, event: SheetEvent) {
        let snapshot: SmallVec<[(ListenerId, SheetListener); 4]> = self
            .listeners
            .borrow()
            .iter()
            .map(|(id, listener)| (*id, listener.clone()))
            .collect();

        for (id, listener) in snapshot {
            // Skip anything removed by an earlier listener in this pass
            if !self.listeners.borrow().contains_key(&id) {
                continue;
            }
            listener(&event);
        }
    }

    // =========================================================================
    // Scrolling state
    // =========================================================================

    pub fn scrolling_state(&self) -> ScrollingState {
        self.scrolling_state
    }

    /// Record and announce `state` if it differs from the last one
    pub fn set_scrolling_state(&mut self, state: ScrollingState) -> bool {
        if self.scrolling_state == state {
            return false;
        }
        self.force_scrolling_state(state);
        true
    }

    /// Record and announce `state` unconditionally
    pub fn force_scrolling_state(&mut self, state: ScrollingState) {
        self.scrolling_state = state;
        self.notify(SheetEvent::ScrollingState { state });
    }

    // =========================================================================
    // Raw event delegate
    // =========================================================================

    pub fn set_delegate(&mut self, delegate: Option<RawEventDelegate>) {
        self.delegate = delegate;
    }

    pub fn has_delegate(&self) -> bool {
        self.delegate.is_some()
    }

    pub fn forward_raw(&mut self, event: &PointerEvent) {
        if let Some(delegate) = self.delegate.as_mut() {
            delegate(event);
        }
    }

    // =========================================================================
    // Header bindings
    // =========================================================================

    pub fn headers(&self) -> &HeaderBindings {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderBindings {
        &mut self.headers
    }

    /// Drop listeners and the delegate. Header bindings are released
    /// separately because unbinding needs the content tree.
    pub fn clear(&mut self) {
        self.clear_listeners();
        self.delegate = None;
    }
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("listeners", &self.listener_count())
            .field("delegate", &self.delegate.is_some())
            .field("headers", &self.headers.len())
            .field("scrolling_state", &self.scrolling_state)
            .finish()
    }
}
