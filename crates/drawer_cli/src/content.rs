//! Synthetic sheet content for replays
//!
//! The content is a composite holding an optional collapsible header and a
//! scrollable list. Pointer events the sheet hands to the content scroll the
//! list, collapsing the header first when the finger moves up and expanding
//! it last when the finger moves down.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use drawer_core::{Point, PointerAction, PointerEvent, Rect};
use drawer_layout::{CollapsibleHeader, NodeId, OffsetListener, ScrollDirection, VisualNode};

use crate::scenario::Scenario;

const CONTENT_ID: NodeId = NodeId(2);
const HEADER_ID: NodeId = NodeId(3);
const LIST_ID: NodeId = NodeId(4);

/// Scroll state shared by the nodes and the replay driver
#[derive(Debug)]
struct ContentState {
    translation: Cell<f32>,
    scroll_y: Cell<f32>,
    scroll_range: f32,
    last_y: Cell<Option<f32>>,
}

/// Header that collapses by a negative offset down to `-height`
pub struct HeaderRegion {
    height: f32,
    offset: Cell<f32>,
    listeners: RefCell<Vec<Rc<dyn OffsetListener>>>,
}

impl HeaderRegion {
    fn new(height: f32) -> Self {
        Self {
            height,
            offset: Cell::new(0.0),
            listeners: RefCell::new(Vec::new()),
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset.get()
    }

    fn set_offset(&self, offset: f32) {
        let offset = offset.clamp(-self.height, 0.0);
        if offset == self.offset.get() {
            return;
        }
        self.offset.set(offset);
        let listeners: Vec<_> = self.listeners.borrow().clone();
        for listener in listeners {
            listener.on_offset_changed(offset);
        }
    }
}

impl CollapsibleHeader for HeaderRegion {
    fn add_offset_listener(&self, listener: Rc<dyn OffsetListener>) {
        self.listeners.borrow_mut().push(listener);
    }

    fn remove_offset_listener(&self, listener: &Rc<dyn OffsetListener>) {
        self.listeners
            .borrow_mut()
            .retain(|existing| !Rc::ptr_eq(existing, listener));
    }
}

/// Driver-side view of the content after it is boxed into the sheet
#[derive(Clone)]
pub struct ContentHandle {
    state: Rc<ContentState>,
    header: Option<Rc<HeaderRegion>>,
}

impl ContentHandle {
    pub fn scroll_y(&self) -> f32 {
        self.state.scroll_y.get()
    }

    pub fn set_scroll_y(&self, scroll_y: f32) {
        self.state
            .scroll_y
            .set(scroll_y.clamp(0.0, self.state.scroll_range));
    }

    pub fn header_offset(&self) -> Option<f32> {
        self.header.as_ref().map(|header| header.offset())
    }

    /// Returns false when the scenario has no header
    pub fn collapse_header(&self, offset: f32) -> bool {
        match &self.header {
            Some(header) => {
                header.set_offset(offset);
                true
            }
            None => false,
        }
    }

    /// Apply a finger movement of `dy` (positive when moving down)
    fn scroll_by(&self, dy: f32) {
        let state = &self.state;
        let mut remaining = dy;

        if remaining < 0.0 {
            if let Some(header) = &self.header {
                let before = header.offset();
                header.set_offset(before + remaining);
                remaining -= header.offset() - before;
            }
            self.set_scroll_y(state.scroll_y.get() - remaining);
        } else if remaining > 0.0 {
            let consumed = remaining.min(state.scroll_y.get());
            self.set_scroll_y(state.scroll_y.get() - consumed);
            remaining -= consumed;
            if let Some(header) = &self.header {
                header.set_offset(header.offset() + remaining);
            }
        }
    }
}

fn on_screen(frame: Rect, state: &ContentState) -> Rect {
    frame.translate(0.0, state.translation.get())
}

struct HeaderNode {
    frame: Rect,
    region: Rc<HeaderRegion>,
    state: Rc<ContentState>,
}

impl VisualNode for HeaderNode {
    fn id(&self) -> NodeId {
        HEADER_ID
    }

    fn frame(&self) -> Option<Rect> {
        Some(self.frame)
    }

    fn screen_frame(&self) -> Option<Rect> {
        Some(on_screen(self.frame, &self.state))
    }

    fn as_collapsible_header(&self) -> Option<&dyn CollapsibleHeader> {
        Some(&*self.region)
    }
}

struct ListNode {
    frame: Rect,
    state: Rc<ContentState>,
}

impl VisualNode for ListNode {
    fn id(&self) -> NodeId {
        LIST_ID
    }

    fn frame(&self) -> Option<Rect> {
        Some(self.frame)
    }

    fn screen_frame(&self) -> Option<Rect> {
        Some(on_screen(self.frame, &self.state))
    }

    fn can_scroll(&self, direction: ScrollDirection) -> bool {
        let scroll_y = self.state.scroll_y.get();
        match direction {
            ScrollDirection::Up => scroll_y > 0.0,
            ScrollDirection::Down => scroll_y < self.state.scroll_range,
            ScrollDirection::Left | ScrollDirection::Right => false,
        }
    }
}

/// Root of the synthetic tree handed to the sheet
pub struct SyntheticContent {
    frame: Rect,
    children: Vec<Box<dyn VisualNode>>,
    handle: ContentHandle,
}

impl SyntheticContent {
    pub fn build(scenario: &Scenario) -> (Self, ContentHandle) {
        let list = &scenario.list;
        let state = Rc::new(ContentState {
            translation: Cell::new(scenario.initial_translation),
            scroll_y: Cell::new(list.scroll_y.min(list.scroll_range())),
            scroll_range: list.scroll_range(),
            last_y: Cell::new(None),
        });

        let mut children: Vec<Box<dyn VisualNode>> = Vec::with_capacity(2);
        let header = scenario.header.map(|spec| {
            let region = Rc::new(HeaderRegion::new(spec.height));
            children.push(Box::new(HeaderNode {
                frame: Rect::new(0.0, 0.0, scenario.width, spec.height),
                region: region.clone(),
                state: state.clone(),
            }));
            region
        });
        children.push(Box::new(ListNode {
            frame: Rect::new(0.0, list.top, scenario.width, list.viewport_height),
            state: state.clone(),
        }));

        let handle = ContentHandle { state, header };
        let content = Self {
            frame: Rect::new(0.0, 0.0, scenario.width, scenario.height),
            children,
            handle: handle.clone(),
        };
        (content, handle)
    }
}

impl VisualNode for SyntheticContent {
    fn id(&self) -> NodeId {
        CONTENT_ID
    }

    fn frame(&self) -> Option<Rect> {
        Some(self.frame)
    }

    fn screen_frame(&self) -> Option<Rect> {
        Some(on_screen(self.frame, &self.handle.state))
    }

    fn scroll_offset(&self) -> Point {
        Point::ZERO
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child_at(&self, index: usize) -> Option<&dyn VisualNode> {
        self.children.get(index).map(|child| &**child)
    }

    fn is_coordinator(&self) -> bool {
        self.handle.header.is_some()
    }

    fn translation_y(&self) -> f32 {
        self.handle.state.translation.get()
    }

    fn set_translation_y(&mut self, offset: f32) {
        self.handle.state.translation.set(offset);
    }

    fn dispatch_pointer_event(&mut self, event: &PointerEvent) -> bool {
        let last_y = &self.handle.state.last_y;
        match event.action {
            PointerAction::Down => last_y.set(Some(event.y)),
            PointerAction::Move => {
                if let Some(previous) = last_y.get() {
                    self.handle.scroll_by(event.y - previous);
                }
                last_y.set(Some(event.y));
            }
            PointerAction::Up | PointerAction::Cancel => last_y.set(None),
        }
        true
    }
}
