//! Sheet container
//!
//! A container owning exactly one content node that it moves vertically.
//! The host feeds it pointer events, layout, attach/detach and frame ticks;
//! the container arbitrates gestures with its content, animates to named
//! rest positions, and fans out what happened to its listeners.
//!
//! # Example
//!
//! ```ignore
//! use drawer_layout::prelude::*;
//!
//! let mut sheet = SheetContainer::new(NodeId(1), SheetConfig::default());
//! sheet.add_child(Box::new(list))?;
//! sheet.on_layout(800.0);
//! sheet.attach();
//!
//! sheet.on_event(|event| tracing::info!("{:?}", event));
//! sheet.peek(400.0);
//! sheet.on_frame(now_ms);
//! ```

use std::fmt;

use drawer_animation::{AnimationScheduler, Easing, SettleAnimation, SettleId, SettleOutcome};
use drawer_core::{
    Point, PointerAction, PointerEvent, Rect, Result, SheetConfig, SheetDirection, SheetError,
};

use crate::arbiter::{ArbiterContext, GestureArbiter};
use crate::observers::{ObserverRegistry, SheetEvent, SheetListener, Subscription};
use crate::probe::CapabilityProbe;
use crate::state::{GestureState, ScrollingState, ShowState};
use crate::translation::TranslationController;
use crate::tree::{NodeId, ScrollDirection, SheetStateSource, VisualNode};

/// Deferred work run on the next frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetTask {
    /// Lock the container height once the first layout pass has run
    CaptureHeight,
}

/// Completion handler of a settle request
pub type SettleCallback = Box<dyn FnOnce(SettleOutcome)>;

struct ActiveSettle {
    id: SettleId,
    /// Named state to enter on natural completion
    show_state: Option<ShowState>,
    on_complete: Option<SettleCallback>,
}

/// Draggable sheet with nested-scroll arbitration
pub struct SheetContainer {
    id: NodeId,
    config: SheetConfig,
    content: Option<Box<dyn VisualNode>>,
    controller: TranslationController,
    probe: CapabilityProbe,
    observers: ObserverRegistry,
    arbiter: GestureArbiter,
    scheduler: AnimationScheduler<SheetTask>,
    settle: Option<ActiveSettle>,
    show_state: ShowState,
    frame: Option<Rect>,
    screen_frame: Option<Rect>,
    measured_height: f32,
    locked_height: Option<f32>,
    /// Offset applied to this container by an enclosing sheet
    own_translation: f32,
    attached: bool,
    finger_down: bool,
}

impl SheetContainer {
    pub fn new(id: NodeId, config: SheetConfig) -> Self {
        let mut probe = CapabilityProbe::new();
        probe.set_require_touch_under_target(config.require_touch_under_target);
        Self {
            id,
            config,
            content: None,
            controller: TranslationController::new(),
            probe,
            observers: ObserverRegistry::new(),
            arbiter: GestureArbiter::new(),
            scheduler: AnimationScheduler::new(),
            settle: None,
            show_state: ShowState::Init,
            frame: None,
            screen_frame: None,
            measured_height: 0.0,
            locked_height: None,
            own_translation: 0.0,
            attached: false,
            finger_down: false,
        }
    }

    // =========================================================================
    // Content and lifecycle
    // =========================================================================

    /// Attach the single content node.
    ///
    /// Fails with [`SheetError::ChildAlreadyAttached`] if content is already
    /// present; the existing content is kept.
    pub fn add_child(&mut self, content: Box<dyn VisualNode>) -> Result<()> {
        if let Some(existing) = self.content.as_deref() {
            tracing::error!(
                "sheet {:?} already owns {:?}, rejecting {:?}",
                self.id,
                existing.id(),
                content.id()
            );
            return Err(SheetError::ChildAlreadyAttached);
        }

        self.controller.sync(content.translation_y());
        if self.attached {
            self.observers.headers_mut().bind_tree(&*content);
        }
        self.content = Some(content);
        Ok(())
    }

    /// Detach and return the content node, releasing its header bindings
    pub fn remove_child(&mut self) -> Option<Box<dyn VisualNode>> {
        let content = self.content.take()?;
        self.observers.headers_mut().unbind_tree(&*content);
        self.arbiter.reset();
        self.finger_down = false;
        Some(content)
    }

    pub fn content(&self) -> Option<&dyn VisualNode> {
        self.content.as_deref()
    }

    pub fn content_mut(&mut self) -> Option<&mut (dyn VisualNode + 'static)> {
        self.content.as_deref_mut()
    }

    /// The container entered the host's tree
    pub fn attach(&mut self) {
        if self.attached {
            return;
        }
        self.attached = true;
        self.scheduler.post(SheetTask::CaptureHeight);
        if let Some(content) = self.content.as_deref() {
            self.observers.headers_mut().bind_tree(content);
        }
        tracing::debug!("sheet {:?} attached", self.id);
    }

    /// The container left the host's tree.
    ///
    /// Cancels any settle (its completion runs with
    /// [`SettleOutcome::Cancelled`]), drops pending tasks, unregisters header
    /// trackers, and removes all listeners and the raw-event delegate.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        self.cancel_settle();
        self.scheduler.clear();
        self.arbiter.reset();
        self.finger_down = false;

        match self.content.as_deref() {
            Some(content) => self.observers.headers_mut().unbind_tree(content),
            None => self.observers.headers_mut().clear(),
        }
        self.observers.clear();
        tracing::debug!("sheet {:?} detached", self.id);
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Record the measured container height
    pub fn on_layout(&mut self, height: f32) {
        self.measured_height = height;
        if let Some(frame) = self.frame.as_mut() {
            frame.size.height = height;
        }
    }

    /// Record the container bounds, for hosts that nest sheets
    pub fn set_bounds(&mut self, frame: Rect, screen_frame: Rect) {
        self.frame = Some(frame);
        self.screen_frame = Some(screen_frame);
        self.measured_height = frame.height();
    }

    /// Advance animations and run deferred tasks
    pub fn on_frame(&mut self, now_ms: u64) {
        let frame = self.scheduler.tick(now_ms);

        for task in frame.tasks {
            match task {
                SheetTask::CaptureHeight => {
                    self.locked_height = Some(self.measured_height);
                    tracing::debug!("sheet {:?} locked height {}", self.id, self.measured_height);
                }
            }
        }

        for sample in frame.samples {
            let tracked = self.settle.as_ref().is_some_and(|settle| settle.id == sample.id);
            if !tracked {
                continue;
            }
            self.apply_translation(sample.value, 0.0);
            if sample.finished {
                self.finish_settle(SettleOutcome::Finished);
            }
        }
    }

    // =========================================================================
    // Pointer input
    // =========================================================================

    /// Whether an enclosing dispatcher should route this gesture to the sheet.
    ///
    /// False while a visible sheet nested in the content is under the pointer.
    pub fn should_intercept(&self, event: &PointerEvent) -> bool {
        let Some(content) = self.content.as_deref() else {
            return false;
        };
        self.config.intercept_enabled && !self.probe.is_touch_under_nested_sheet(content, event)
    }

    /// Feed one pointer event in the container's frame.
    ///
    /// Returns whether the sheet handled it. Events are not handled when
    /// interception is off, when there is no content, or (except moves) when
    /// the pointer is outside the content. Everything is dropped while a
    /// settle animation runs.
    pub fn on_touch_event(&mut self, event: &PointerEvent) -> bool {
        if !self.config.intercept_enabled {
            return false;
        }
        let animating = self.settle.is_some();
        if animating && event.action.is_terminal() {
            // The gesture ends even though the event is dropped
            self.finger_down = false;
            self.arbiter.reset();
        }
        let Some(content) = self.content.as_deref_mut() else {
            return false;
        };
        if event.action != PointerAction::Move && !self.probe.is_touch_under(content, event) {
            return false;
        }
        if animating {
            tracing::trace!("dropping {:?} while settling", event.action);
            return false;
        }

        match event.action {
            PointerAction::Down => {
                if self.measured_height > 0.0 {
                    self.locked_height = Some(self.measured_height);
                }
                self.finger_down = true;
            }
            PointerAction::Up | PointerAction::Cancel => self.finger_down = false,
            PointerAction::Move => {}
        }

        let ctx = ArbiterContext {
            content,
            controller: &mut self.controller,
            probe: &mut self.probe,
            observers: &mut self.observers,
        };
        self.arbiter.handle(ctx, &self.config, event)
    }

    /// Whether the content under `point` (container frame) can scroll in
    /// `direction`
    pub fn can_content_scroll(&mut self, point: Point, direction: ScrollDirection) -> bool {
        let Some(content) = self.content.as_deref() else {
            return false;
        };
        let screen_origin = self.screen_frame.map_or(Point::ZERO, |frame| frame.origin);
        let event = PointerEvent::new(PointerAction::Move, point.x, point.y, 0)
            .with_raw(point.x + screen_origin.x, point.y + screen_origin.y);

        let origin = content.frame().map_or(Point::ZERO, |frame| frame.origin);
        let local = Point::new(
            point.x - origin.x,
            point.y - self.controller.translation() - origin.y,
        );
        self.probe
            .can_scroll(content, &event, local, direction, self.observers.headers())
    }

    // =========================================================================
    // Settling
    // =========================================================================

    /// Animate to fully expanded (offset 0)
    pub fn expand(&mut self) -> bool {
        let duration = self.config.settle_duration_ms;
        self.start_settle(0.0, duration, Some(ShowState::Expanded), None)
    }

    pub fn expand_with(&mut self, duration_ms: u32, on_complete: impl FnOnce(SettleOutcome) + 'static) -> bool {
        self.start_settle(0.0, duration_ms, Some(ShowState::Expanded), Some(Box::new(on_complete)))
    }

    /// Animate to a partially visible offset
    pub fn peek(&mut self, offset: f32) -> bool {
        let duration = self.config.settle_duration_ms;
        self.start_settle(offset, duration, Some(ShowState::Peek), None)
    }

    pub fn peek_with(
        &mut self,
        offset: f32,
        duration_ms: u32,
        on_complete: impl FnOnce(SettleOutcome) + 'static,
    ) -> bool {
        self.start_settle(offset, duration_ms, Some(ShowState::Peek), Some(Box::new(on_complete)))
    }

    /// Animate the content fully out of the container
    pub fn hide(&mut self) -> bool {
        let duration = self.config.settle_duration_ms;
        self.start_settle(self.height(), duration, Some(ShowState::Hidden), None)
    }

    pub fn hide_with(&mut self, duration_ms: u32, on_complete: impl FnOnce(SettleOutcome) + 'static) -> bool {
        let target = self.height();
        self.start_settle(target, duration_ms, Some(ShowState::Hidden), Some(Box::new(on_complete)))
    }

    /// Animate to `offset` and report the sheet as hidden there
    pub fn hide_to(&mut self, offset: f32) -> bool {
        let duration = self.config.settle_duration_ms;
        self.start_settle(offset, duration, Some(ShowState::Hidden), None)
    }

    pub fn hide_to_with(
        &mut self,
        offset: f32,
        duration_ms: u32,
        on_complete: impl FnOnce(SettleOutcome) + 'static,
    ) -> bool {
        self.start_settle(offset, duration_ms, Some(ShowState::Hidden), Some(Box::new(on_complete)))
    }

    /// Animate to an arbitrary offset without changing the show state
    pub fn recover(&mut self, target: f32) -> bool {
        let duration = self.config.settle_duration_ms;
        self.start_settle(target, duration, None, None)
    }

    pub fn recover_with(
        &mut self,
        target: f32,
        duration_ms: u32,
        on_complete: impl FnOnce(SettleOutcome) + 'static,
    ) -> bool {
        self.start_settle(target, duration_ms, None, Some(Box::new(on_complete)))
    }

    /// Stop the running settle; its completion runs with
    /// [`SettleOutcome::Cancelled`] and the show state is left unchanged
    pub fn cancel_settle(&mut self) -> bool {
        if self.settle.is_none() {
            return false;
        }
        self.finish_settle(SettleOutcome::Cancelled);
        true
    }

    pub fn is_animating(&self) -> bool {
        self.settle.is_some()
    }

    fn start_settle(
        &mut self,
        target: f32,
        duration_ms: u32,
        show_state: Option<ShowState>,
        on_complete: Option<SettleCallback>,
    ) -> bool {
        if self.settle.is_some() {
            tracing::debug!("settle to {} ignored, another settle is running", target);
            return false;
        }

        let from = self.controller.translation();
        let animation = SettleAnimation::new(from, target, duration_ms).with_easing(Easing::Decelerate(1.0));
        let id = self.scheduler.start(animation);
        self.settle = Some(ActiveSettle {
            id,
            show_state,
            on_complete,
        });
        tracing::debug!(
            "sheet {:?} settling {} -> {} over {}ms",
            self.id,
            from,
            target,
            duration_ms
        );
        true
    }

    fn finish_settle(&mut self, outcome: SettleOutcome) {
        let Some(settle) = self.settle.take() else {
            return;
        };
        self.scheduler.cancel(settle.id);

        match outcome {
            SettleOutcome::Finished => {
                self.observers.force_scrolling_state(ScrollingState::Settling);
                if let Some(state) = settle.show_state {
                    self.show_state = state;
                }
                tracing::debug!(
                    "sheet {:?} settled at {} ({:?})",
                    self.id,
                    self.controller.translation(),
                    self.show_state
                );
            }
            SettleOutcome::Cancelled => {
                self.observers.set_scrolling_state(ScrollingState::Settling);
                tracing::debug!("sheet {:?} settle cancelled", self.id);
            }
        }

        if let Some(on_complete) = settle.on_complete {
            on_complete(outcome);
        }
    }

    fn apply_translation(&mut self, value: f32, velocity_y: f32) {
        let content: Option<&mut dyn VisualNode> = match self.content.as_mut() {
            Some(content) => Some(&mut **content),
            None => None,
        };
        self.controller
            .set_translation(value, velocity_y, self.config.direction, content, &mut self.observers);
    }

    // =========================================================================
    // Observers
    // =========================================================================

    pub fn add_listener(&mut self, listener: SheetListener) -> Subscription {
        self.observers.add_listener(listener)
    }

    /// Register a closure as a listener
    pub fn on_event(&mut self, listener: impl Fn(&SheetEvent) + 'static) -> Subscription {
        self.observers.add_listener(std::rc::Rc::new(listener))
    }

    pub fn remove_listener(&mut self, listener: &SheetListener) -> bool {
        self.observers.remove_listener(listener)
    }

    pub fn clear_listeners(&mut self) {
        self.observers.clear_listeners();
    }

    pub fn listener_count(&self) -> usize {
        self.observers.listener_count()
    }

    /// Replace the delegate receiving every handled event in content
    /// coordinates
    pub fn set_raw_event_delegate(&mut self, delegate: impl FnMut(&PointerEvent) + 'static) {
        self.observers.set_delegate(Some(Box::new(delegate)));
    }

    pub fn clear_raw_event_delegate(&mut self) {
        self.observers.set_delegate(None);
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    /// Replace the whole configuration; takes effect from the next gesture
    pub fn set_config(&mut self, config: SheetConfig) -> Result<()> {
        config.validate()?;
        self.probe.set_require_touch_under_target(config.require_touch_under_target);
        self.config = config;
        Ok(())
    }

    pub fn set_direction(&mut self, direction: SheetDirection) {
        self.config.direction = direction;
    }

    pub fn set_damping_up(&mut self, damping: f32) {
        if !(damping > 0.0 && damping.is_finite()) {
            tracing::warn!("ignoring non-positive damping_up {}", damping);
            return;
        }
        self.config.damping_up = damping;
    }

    pub fn set_damping_down(&mut self, damping: f32) {
        if !(damping > 0.0 && damping.is_finite()) {
            tracing::warn!("ignoring non-positive damping_down {}", damping);
            return;
        }
        self.config.damping_down = damping;
    }

    pub fn set_lock_top(&mut self, lock: Option<f32>) {
        self.config.lock_top = lock;
    }

    pub fn set_lock_bottom(&mut self, lock: Option<f32>) {
        self.config.lock_bottom = lock;
    }

    pub fn set_require_touch_under_target(&mut self, require: bool) {
        self.config.require_touch_under_target = require;
        self.probe.set_require_touch_under_target(require);
    }

    pub fn set_intercept_enabled(&mut self, enabled: bool) {
        self.config.intercept_enabled = enabled;
    }

    /// Override the height captured after the first layout pass
    pub fn set_locked_height(&mut self, height: f32) {
        self.locked_height = Some(height);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn show_state(&self) -> ShowState {
        self.show_state
    }

    pub fn scrolling_state(&self) -> ScrollingState {
        self.observers.scrolling_state()
    }

    /// Current content offset; 0 is fully expanded
    pub fn translation(&self) -> f32 {
        self.controller.translation()
    }

    /// Container height used as the hidden offset: the locked height once
    /// captured, the measured height before that
    pub fn height(&self) -> f32 {
        self.locked_height.unwrap_or(self.measured_height)
    }

    pub fn measured_height(&self) -> f32 {
        self.measured_height
    }

    /// Whether a pointer is down on the sheet. An up or cancel clears it even
    /// while a settle drops the event.
    pub fn is_finger_down(&self) -> bool {
        self.finger_down
    }

    pub fn gesture_state(&self) -> GestureState {
        self.arbiter.state()
    }

    pub fn disallows_parent_intercept(&self) -> bool {
        self.arbiter.disallows_parent_intercept()
    }

    pub fn header_binding_count(&self) -> usize {
        self.observers.headers().len()
    }

    pub fn has_pending_work(&self) -> bool {
        self.scheduler.has_pending_work()
    }
}

impl SheetStateSource for SheetContainer {
    fn show_state(&self) -> ShowState {
        self.show_state
    }
}

impl VisualNode for SheetContainer {
    fn id(&self) -> NodeId {
        self.id
    }

    fn frame(&self) -> Option<Rect> {
        self.frame
    }

    fn screen_frame(&self) -> Option<Rect> {
        self.screen_frame
    }

    fn child_count(&self) -> usize {
        usize::from(self.content.is_some())
    }

    fn child_at(&self, index: usize) -> Option<&dyn VisualNode> {
        if index == 0 {
            self.content.as_deref()
        } else {
            None
        }
    }

    fn as_sheet(&self) -> Option<&dyn SheetStateSource> {
        Some(self)
    }

    fn translation_y(&self) -> f32 {
        self.own_translation
    }

    fn set_translation_y(&mut self, offset: f32) {
        self.own_translation = offset;
    }

    fn dispatch_pointer_event(&mut self, event: &PointerEvent) -> bool {
        self.on_touch_event(event)
    }
}

impl fmt::Debug for SheetContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetContainer")
            .field("id", &self.id)
            .field("translation", &self.controller.translation())
            .field("show_state", &self.show_state)
            .field("gesture_state", &self.arbiter.state())
            .field("animating", &self.settle.is_some())
            .field("attached", &self.attached)
            .field("observers", &self.observers)
            .finish()
    }
}
