//! Drawer Sheet Layout
//!
//! A draggable sheet that hosts one scrollable content node and decides, on
//! every pointer move, whether the drag moves the sheet or scrolls the
//! content, handing the gesture back and forth without the finger lifting.
//!
//! # Features
//!
//! - **Gesture Arbitration**: slop-gated axis claiming, content handoff with
//!   synthetic cancel/down replay, damping, direction constraints and locks
//! - **Capability Probing**: recursive "can scroll" queries over any
//!   [`VisualNode`] tree, with web content and collapsible header support
//! - **Settle Animations**: expand, peek, hide and custom offsets, one at a
//!   time, ticked by host frames
//! - **Observers**: ordered listeners, a raw-event delegate and header
//!   trackers, all released on detach
//!
//! # Example
//!
//! ```ignore
//! use drawer_layout::prelude::*;
//!
//! let mut sheet = SheetContainer::new(NodeId(1), SheetConfig::default());
//! sheet.add_child(Box::new(content))?;
//! sheet.on_layout(720.0);
//! sheet.attach();
//!
//! if sheet.should_intercept(&event) {
//!     sheet.on_touch_event(&event);
//! }
//! ```

pub mod arbiter;
pub mod header;
pub mod observers;
pub mod probe;
pub mod sheet;
pub mod state;
pub mod translation;
pub mod tree;

pub use arbiter::{ArbiterContext, GestureArbiter, PointerSession};
pub use header::{HeaderBindings, HeaderOffsetTracker};
pub use observers::{
    ListenerId, ObserverRegistry, RawEventDelegate, SheetEvent, SheetListener, Subscription,
};
pub use probe::{CapabilityProbe, WEB_EDGE_EPSILON};
pub use sheet::{SettleCallback, SheetContainer, SheetTask};
pub use state::{gesture_events, GestureState, ScrollingState, ShowState};
pub use translation::{Commit, TranslationController};
pub use tree::{
    walk, CollapsibleHeader, NodeId, OffsetListener, ScrollDirection, SheetStateSource,
    VisualNode, WebContent,
};

// Re-export the shared vocabulary so hosts need a single dependency
pub use drawer_animation::SettleOutcome;
pub use drawer_core::{
    Point, PointerAction, PointerEvent, Rect, SheetConfig, SheetDirection, SheetError, Size,
};

/// Commonly used types
pub mod prelude {
    pub use crate::observers::{SheetEvent, Subscription};
    pub use crate::sheet::SheetContainer;
    pub use crate::state::{GestureState, ScrollingState, ShowState};
    pub use crate::tree::{
        CollapsibleHeader, NodeId, OffsetListener, ScrollDirection, SheetStateSource, VisualNode,
        WebContent,
    };
    pub use drawer_animation::SettleOutcome;
    pub use drawer_core::{
        Point, PointerAction, PointerEvent, Rect, SheetConfig, SheetDirection, SheetError,
    };
}
