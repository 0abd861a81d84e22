//! Visual tree abstraction
//!
//! The sheet never owns a real layout engine. It sees its content through
//! [`VisualNode`], a read-mostly view of the host's tree: frames, scroll
//! offsets, children, and a few optional capabilities that replace runtime
//! type inspection. A node that does not recognise a capability simply keeps
//! the default `None`/`false`.

use std::rc::Rc;

use drawer_core::{Point, PointerEvent, Rect};

use crate::state::ShowState;

/// Stable identity of a node in the host tree
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Direction a scroll query asks about.
///
/// `Up` asks whether content can reveal more of what lies above (its scroll
/// offset can still decrease); `Down` whether it can reveal more below.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

impl ScrollDirection {
    pub fn is_vertical(self) -> bool {
        matches!(self, ScrollDirection::Up | ScrollDirection::Down)
    }
}

/// A node in the host's visual tree
pub trait VisualNode {
    fn id(&self) -> NodeId;

    /// Bounds in the parent's coordinate space, `None` until measured
    fn frame(&self) -> Option<Rect>;

    /// Bounds on screen, `None` while detached or unmeasured
    fn screen_frame(&self) -> Option<Rect>;

    /// Current scroll offset of this node's children
    fn scroll_offset(&self) -> Point {
        Point::ZERO
    }

    fn child_count(&self) -> usize {
        0
    }

    fn child_at(&self, _index: usize) -> Option<&dyn VisualNode> {
        None
    }

    /// Whether the node itself can scroll further in `direction`
    fn can_scroll(&self, _direction: ScrollDirection) -> bool {
        false
    }

    /// Embedded web-like content whose extent is only known asynchronously
    fn as_web_content(&self) -> Option<&dyn WebContent> {
        None
    }

    /// Header region that collapses before sibling content scrolls
    fn as_collapsible_header(&self) -> Option<&dyn CollapsibleHeader> {
        None
    }

    /// Composite that coordinates a collapsible header (its first child)
    /// with scrolling siblings
    fn is_coordinator(&self) -> bool {
        false
    }

    /// Another sheet nested in this tree
    fn as_sheet(&self) -> Option<&dyn SheetStateSource> {
        None
    }

    /// Current vertical translation applied by a parent sheet
    fn translation_y(&self) -> f32 {
        0.0
    }

    fn set_translation_y(&mut self, _offset: f32) {}

    /// Deliver a pointer event already expressed in this node's frame
    fn dispatch_pointer_event(&mut self, _event: &PointerEvent) -> bool {
        false
    }
}

/// Web-like content whose height settles after loading
pub trait WebContent {
    /// Content height before scaling
    fn content_height(&self) -> f32;

    fn scale(&self) -> f32 {
        1.0
    }

    fn viewport_height(&self) -> f32;

    fn scroll_y(&self) -> f32;
}

/// Receives the consumed offset of a collapsible header
pub trait OffsetListener {
    fn on_offset_changed(&self, offset: f32);
}

/// Header region that reports how far it has collapsed
pub trait CollapsibleHeader {
    fn add_offset_listener(&self, listener: Rc<dyn OffsetListener>);

    fn remove_offset_listener(&self, listener: &Rc<dyn OffsetListener>);
}

/// Exposes the show state of a sheet so an enclosing sheet can leave it
/// alone while it is visible
pub trait SheetStateSource {
    fn show_state(&self) -> ShowState;
}

/// Depth-first visit of `node` and all of its descendants
pub fn walk(node: &dyn VisualNode, visit: &mut dyn FnMut(&dyn VisualNode)) {
    visit(node);
    for index in 0..node.child_count() {
        if let Some(child) = node.child_at(index) {
            walk(child, visit);
        }
    }
}
