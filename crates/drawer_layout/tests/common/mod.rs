//! Mock visual tree shared by the integration suites

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use drawer_layout::prelude::*;
use drawer_layout::SheetListener;

pub const SHEET_HEIGHT: f32 = 800.0;
pub const SHEET_WIDTH: f32 = 400.0;

/// Shared view of a mock node that stays with the test after the node is
/// boxed into a sheet
#[derive(Clone, Default)]
pub struct NodeHandle {
    pub can_up: Rc<Cell<bool>>,
    pub can_down: Rc<Cell<bool>>,
    pub can_left: Rc<Cell<bool>>,
    pub translation: Rc<Cell<f32>>,
    pub received: Rc<RefCell<Vec<PointerEvent>>>,
}

impl NodeHandle {
    pub fn set_scrollable(&self, up: bool, down: bool) {
        self.can_up.set(up);
        self.can_down.set(down);
    }

    pub fn actions(&self) -> Vec<PointerAction> {
        self.received.borrow().iter().map(|event| event.action).collect()
    }
}

/// Web-like content whose height can change between gestures
#[derive(Clone)]
pub struct MockWeb {
    pub content_height: Rc<Cell<f32>>,
    pub scale: f32,
    pub viewport_height: f32,
    pub scroll_y: Rc<Cell<f32>>,
}

impl MockWeb {
    pub fn new(content_height: f32, scale: f32, viewport_height: f32) -> Self {
        Self {
            content_height: Rc::new(Cell::new(content_height)),
            scale,
            viewport_height,
            scroll_y: Rc::new(Cell::new(0.0)),
        }
    }
}

impl WebContent for MockWeb {
    fn content_height(&self) -> f32 {
        self.content_height.get()
    }

    fn scale(&self) -> f32 {
        self.scale
    }

    fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    fn scroll_y(&self) -> f32 {
        self.scroll_y.get()
    }
}

/// Collapsible header that reports offsets to registered listeners
#[derive(Default)]
pub struct MockHeader {
    listeners: RefCell<Vec<Rc<dyn OffsetListener>>>,
}

impl MockHeader {
    pub fn report(&self, offset: f32) {
        let listeners: Vec<_> = self.listeners.borrow().clone();
        for listener in listeners {
            listener.on_offset_changed(offset);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl CollapsibleHeader for MockHeader {
    fn add_offset_listener(&self, listener: Rc<dyn OffsetListener>) {
        self.listeners.borrow_mut().push(listener);
    }

    fn remove_offset_listener(&self, listener: &Rc<dyn OffsetListener>) {
        self.listeners
            .borrow_mut()
            .retain(|existing| !Rc::ptr_eq(existing, listener));
    }
}

pub struct MockNode {
    id: NodeId,
    frame: Option<Rect>,
    screen: Option<Rect>,
    scroll: Point,
    children: Vec<Box<dyn VisualNode>>,
    handle: NodeHandle,
    coordinator: bool,
    web: Option<MockWeb>,
    header: Option<Rc<MockHeader>>,
}

impl MockNode {
    /// A measured node whose screen frame equals its frame
    pub fn new(id: u64, frame: Rect) -> Self {
        Self {
            id: NodeId(id),
            frame: Some(frame),
            screen: Some(frame),
            scroll: Point::ZERO,
            children: Vec::new(),
            handle: NodeHandle::default(),
            coordinator: false,
            web: None,
            header: None,
        }
    }

    pub fn unmeasured(id: u64) -> Self {
        let mut node = Self::new(id, Rect::ZERO);
        node.frame = None;
        node.screen = None;
        node
    }

    /// Full-size sheet content
    pub fn content(id: u64) -> Self {
        Self::new(id, Rect::new(0.0, 0.0, SHEET_WIDTH, SHEET_HEIGHT))
    }

    pub fn with_screen(mut self, screen: Rect) -> Self {
        self.screen = Some(screen);
        self
    }

    pub fn with_scroll(mut self, scroll: Point) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn with_child(mut self, child: impl VisualNode + 'static) -> Self {
        self.children.push(Box::new(child));
        self
    }

    pub fn scrollable(self, up: bool, down: bool) -> Self {
        self.handle.set_scrollable(up, down);
        self
    }

    pub fn coordinator(mut self) -> Self {
        self.coordinator = true;
        self
    }

    pub fn web(mut self, web: MockWeb) -> Self {
        self.web = Some(web);
        self
    }

    pub fn header(mut self, header: Rc<MockHeader>) -> Self {
        self.header = Some(header);
        self
    }

    pub fn translated(self, offset: f32) -> Self {
        self.handle.translation.set(offset);
        self
    }

    pub fn handle(&self) -> NodeHandle {
        self.handle.clone()
    }
}

impl VisualNode for MockNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn frame(&self) -> Option<Rect> {
        self.frame
    }

    fn screen_frame(&self) -> Option<Rect> {
        self.screen
            .map(|screen| screen.translate(0.0, self.handle.translation.get()))
    }

    fn scroll_offset(&self) -> Point {
        self.scroll
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child_at(&self, index: usize) -> Option<&dyn VisualNode> {
        self.children.get(index).map(|child| &**child)
    }

    fn can_scroll(&self, direction: ScrollDirection) -> bool {
        match direction {
            ScrollDirection::Up => self.handle.can_up.get(),
            ScrollDirection::Down => self.handle.can_down.get(),
            ScrollDirection::Left => self.handle.can_left.get(),
            ScrollDirection::Right => false,
        }
    }

    fn as_web_content(&self) -> Option<&dyn WebContent> {
        self.web.as_ref().map(|web| web as &dyn WebContent)
    }

    fn as_collapsible_header(&self) -> Option<&dyn CollapsibleHeader> {
        self.header
            .as_deref()
            .map(|header| header as &dyn CollapsibleHeader)
    }

    fn is_coordinator(&self) -> bool {
        self.coordinator
    }

    fn translation_y(&self) -> f32 {
        self.handle.translation.get()
    }

    fn set_translation_y(&mut self, offset: f32) {
        self.handle.translation.set(offset);
    }

    fn dispatch_pointer_event(&mut self, event: &PointerEvent) -> bool {
        self.handle.received.borrow_mut().push(*event);
        true
    }
}

/// Attach `content` to a sheet of [`SHEET_HEIGHT`] and run the first frame
pub fn sheet_with(content: MockNode, config: SheetConfig) -> SheetContainer {
    let mut sheet = SheetContainer::new(NodeId(1), config);
    sheet
        .add_child(Box::new(content))
        .expect("sheet starts empty");
    sheet.on_layout(SHEET_HEIGHT);
    sheet.attach();
    sheet.on_frame(0);
    sheet
}

/// Record every notification the sheet emits
pub fn record(sheet: &mut SheetContainer) -> Rc<RefCell<Vec<SheetEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    let listener: SheetListener = Rc::new(move |event: &SheetEvent| sink.borrow_mut().push(*event));
    sheet.add_listener(listener);
    log
}

/// Tick frames until the running settle finishes; returns the next free
/// timestamp
pub fn settle(sheet: &mut SheetContainer, start_ms: u64) -> u64 {
    let mut now = start_ms;
    for _ in 0..200 {
        sheet.on_frame(now);
        now += 16;
        if !sheet.is_animating() {
            break;
        }
    }
    now
}

pub fn pointer(sheet: &mut SheetContainer, action: PointerAction, x: f32, y: f32, t: u64) -> bool {
    sheet.on_touch_event(&PointerEvent::new(action, x, y, t))
}

/// Vertical drag along x = 100 through `ys`, one event every 16ms, without
/// lifting
pub fn drag(sheet: &mut SheetContainer, ys: &[f32]) {
    let mut t = 0;
    for (index, y) in ys.iter().enumerate() {
        let action = if index == 0 {
            PointerAction::Down
        } else {
            PointerAction::Move
        };
        pointer(sheet, action, 100.0, *y, t);
        t += 16;
    }
}

pub fn count_settling(events: &[SheetEvent]) -> usize {
    events
        .iter()
        .filter(|event| {
            matches!(
                event,
                SheetEvent::ScrollingState {
                    state: ScrollingState::Settling
                }
            )
        })
        .count()
}

pub fn scroll_changes(events: &[SheetEvent]) -> Vec<f32> {
    events
        .iter()
        .filter_map(|event| match event {
            SheetEvent::ScrollChange { offset, .. } => Some(*offset),
            _ => None,
        })
        .collect()
}
