//! Scroll capability probing
//!
//! Answers "can something under this point still scroll in this direction?"
//! by walking the content tree. The walk descends into every child (or only
//! the children under the point, when clipping is on), translating the point
//! into each child's frame, and finally asks the node itself.
//!
//! Two kinds of node get special treatment:
//! - web-like content, whose scroll range comes from a content height cached
//!   at the start of each gesture (the real height may still be loading);
//! - a coordinator whose first child is a collapsible header that is
//!   partially collapsed, which always counts as scrollable.

use drawer_core::{Point, PointerEvent};
use rustc_hash::FxHashMap;

use crate::header::HeaderBindings;
use crate::state::ShowState;
use crate::tree::{NodeId, ScrollDirection, VisualNode, WebContent};

/// Distance from either end of a web page that already counts as the end
pub const WEB_EDGE_EPSILON: f32 = 2.0;

/// Capability probe with a per-gesture web content cache
#[derive(Debug, Clone)]
pub struct CapabilityProbe {
    web_heights: FxHashMap<NodeId, f32>,
    require_touch_under_target: bool,
    clip_to_children: bool,
}

impl CapabilityProbe {
    pub fn new() -> Self {
        Self {
            web_heights: FxHashMap::default(),
            require_touch_under_target: true,
            clip_to_children: false,
        }
    }

    /// Builder: only descend into children whose frame contains the point
    pub fn with_clip_to_children(mut self, clip: bool) -> Self {
        self.clip_to_children = clip;
        self
    }

    pub fn set_require_touch_under_target(&mut self, require: bool) {
        self.require_touch_under_target = require;
    }

    pub fn require_touch_under_target(&self) -> bool {
        self.require_touch_under_target
    }

    /// Reset the web cache and prime it for web content under the pointer
    pub fn begin_gesture(&mut self, root: &dyn VisualNode, event: &PointerEvent) {
        self.web_heights.clear();
        self.prime_web_heights(root, event);
        if !self.web_heights.is_empty() {
            tracing::trace!("cached {} web content height(s)", self.web_heights.len());
        }
    }

    pub fn cached_web_height(&self, id: NodeId) -> Option<f32> {
        self.web_heights.get(&id).copied()
    }

    /// Whether `node` or anything below `point` (in `node`'s frame) can
    /// scroll in `direction`
    pub fn can_scroll(
        &mut self,
        node: &dyn VisualNode,
        event: &PointerEvent,
        point: Point,
        direction: ScrollDirection,
        headers: &HeaderBindings,
    ) -> bool {
        if direction.is_vertical() {
            self.can_scroll_vertically(node, event, point, direction, headers)
        } else {
            can_scroll_horizontally(node, point, direction)
        }
    }

    /// Whether the raw pointer position lies within `node` on screen.
    ///
    /// Always true when touch-under-target is not required.
    pub fn is_touch_under(&self, node: &dyn VisualNode, event: &PointerEvent) -> bool {
        !self.require_touch_under_target || is_point_under(node, event.raw_position())
    }

    /// Whether the pointer lies over a visible sheet nested anywhere in
    /// `node`'s subtree
    pub fn is_touch_under_nested_sheet(&self, node: &dyn VisualNode, event: &PointerEvent) -> bool {
        if let Some(sheet) = node.as_sheet() {
            return sheet.show_state() != ShowState::Hidden && self.is_touch_under(node, event);
        }
        (0..node.child_count())
            .filter_map(|index| node.child_at(index))
            .any(|child| self.is_touch_under_nested_sheet(child, event))
    }

    fn can_scroll_vertically(
        &mut self,
        node: &dyn VisualNode,
        event: &PointerEvent,
        point: Point,
        direction: ScrollDirection,
        headers: &HeaderBindings,
    ) -> bool {
        if let Some(web) = node.as_web_content() {
            return self.can_web_scroll(node.id(), web, direction);
        }
        if node.frame().is_none() {
            return false;
        }

        let scroll = node.scroll_offset();
        for index in 0..node.child_count() {
            let Some(child) = node.child_at(index) else {
                continue;
            };
            let Some(frame) = child.frame() else {
                continue;
            };
            let local = frame.translate(-scroll.x, -scroll.y);
            if self.clip_to_children && !local.contains_strict(point) {
                continue;
            }
            let child_point = Point::new(point.x - local.left(), point.y - local.top());
            if self.can_scroll_vertically(child, event, child_point, direction, headers) {
                return true;
            }
        }

        if node.is_coordinator() && header_partially_collapsed(node, headers) {
            return true;
        }

        self.is_touch_under(node, event) && node.can_scroll(direction)
    }

    fn can_web_scroll(&mut self, id: NodeId, web: &dyn WebContent, direction: ScrollDirection) -> bool {
        let cached = self.web_heights.get(&id).copied().unwrap_or(0.0);
        let content_height = if cached == 0.0 {
            let height = web.content_height() * web.scale();
            self.web_heights.insert(id, height);
            height
        } else {
            cached
        };

        let range = content_height - web.viewport_height();
        if range == 0.0 {
            return false;
        }
        let offset = web.scroll_y();
        match direction {
            ScrollDirection::Up => offset > WEB_EDGE_EPSILON,
            ScrollDirection::Down => offset < range - WEB_EDGE_EPSILON,
            ScrollDirection::Left | ScrollDirection::Right => false,
        }
    }

    fn prime_web_heights(&mut self, node: &dyn VisualNode, event: &PointerEvent) {
        if let Some(web) = node.as_web_content() {
            if self.is_touch_under(node, event) {
                self.web_heights.insert(node.id(), web.content_height() * web.scale());
            }
        }
        for index in 0..node.child_count() {
            if let Some(child) = node.child_at(index) {
                self.prime_web_heights(child, event);
            }
        }
    }
}

impl Default for CapabilityProbe {
    fn default() -> Self {
        Self::new()
    }
}

fn is_point_under(node: &dyn VisualNode, raw: Point) -> bool {
    node.screen_frame().map_or(false, |bounds| bounds.contains(raw))
}

fn header_partially_collapsed(coordinator: &dyn VisualNode, headers: &HeaderBindings) -> bool {
    let Some(first) = coordinator.child_at(0) else {
        return false;
    };
    if first.as_collapsible_header().is_none() {
        return false;
    }
    let Some(tracker) = headers.get(first.id()) else {
        return false;
    };
    let height = first.frame().map_or(0.0, |frame| frame.height());
    tracker.is_partially_collapsed(height)
}

/// Horizontal probing always requires the point to be strictly inside each
/// child it descends into
fn can_scroll_horizontally(node: &dyn VisualNode, point: Point, direction: ScrollDirection) -> bool {
    if node.frame().is_none() {
        return false;
    }

    let scroll = node.scroll_offset();
    for index in 0..node.child_count() {
        let Some(child) = node.child_at(index) else {
            continue;
        };
        let Some(frame) = child.frame() else {
            continue;
        };
        let local = frame.translate(-scroll.x, -scroll.y);
        if !local.contains_strict(point) {
            continue;
        }
        let child_point = Point::new(point.x - local.left(), point.y - local.top());
        if can_scroll_horizontally(child, child_point, direction) {
            return true;
        }
    }

    node.can_scroll(direction)
}
