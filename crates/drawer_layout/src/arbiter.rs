//! Gesture arbitration
//!
//! Decides, event by event, whether a vertical drag moves the sheet or
//! scrolls the content inside it, and hands the gesture back and forth
//! without the finger lifting.
//!
//! # Flow
//!
//! ```text
//! Idle --down--> Arbitrating --slop passed--> SheetOwns <--> ContentOwns
//!   ^                 |                           |              |
//!   +------------- up / cancel -------------------+--------------+
//! ```
//!
//! While arbitrating every event goes to the content unchanged. Once the
//! vertical slop is passed the sheet re-baselines on the current position
//! and, on each move, asks the capability probe whether the content can
//! still scroll in the direction of travel. Content that could scroll but
//! reached its edge gets a synthetic cancel and the sheet moves; a sheet
//! that reaches its expanded position while the content can scroll again
//! snaps to 0 and replays a synthetic down into the content.
//!
//! All offsets are sheet translations: 0 is fully expanded, larger values
//! move the content down.

use drawer_core::{
    Point, PointerAction, PointerEvent, SheetConfig, StateMachine, VelocityTracker,
};

use crate::observers::{ObserverRegistry, SheetEvent};
use crate::probe::CapabilityProbe;
use crate::state::{gesture_events, GestureState, ScrollingState};
use crate::translation::{Commit, TranslationController};
use crate::tree::{ScrollDirection, VisualNode};

/// Borrowed sheet parts a single event needs
pub struct ArbiterContext<'a> {
    pub content: &'a mut dyn VisualNode,
    pub controller: &'a mut TranslationController,
    pub probe: &'a mut CapabilityProbe,
    pub observers: &'a mut ObserverRegistry,
}

/// Per-gesture bookkeeping, alive from pointer down to up or cancel
#[derive(Debug, Clone)]
pub struct PointerSession {
    /// Baseline pointer position, moved when the sheet claims or reclaims
    down: Point,
    /// Translation the drag is measured from
    down_translation: f32,
    /// Translation when the pointer went down
    origin_translation: f32,
    claimed: bool,
    /// The content has seen a down without a matching cancel or up
    content_stream_open: bool,
    velocity: VelocityTracker,
    /// Configuration snapshot taken at pointer down
    config: SheetConfig,
}

impl PointerSession {
    fn new(down: Point, translation: f32, config: SheetConfig) -> Self {
        Self {
            down,
            down_translation: translation,
            origin_translation: translation,
            claimed: false,
            content_stream_open: true,
            velocity: VelocityTracker::new(),
            config,
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed
    }

    pub fn origin_translation(&self) -> f32 {
        self.origin_translation
    }

    pub fn down_translation(&self) -> f32 {
        self.down_translation
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    fn commit(&mut self, ctx: &mut ArbiterContext<'_>, value: f32, velocity_y: f32) -> Commit {
        let commit = ctx.controller.set_translation(
            value,
            velocity_y,
            self.config.direction,
            Some(&mut *ctx.content),
            ctx.observers,
        );
        if commit.reached_rest() {
            // Keep the remaining drag measured from the expanded position
            self.down.y -= self.origin_translation;
            self.down_translation = 0.0;
            self.origin_translation = 0.0;
        }
        commit
    }

    fn content_can_scroll(&self, ctx: &mut ArbiterContext<'_>, event: &PointerEvent, delta_y: f32) -> bool {
        let toward = delta_y - self.origin_translation;
        let direction = if toward < 0.0 {
            ScrollDirection::Up
        } else if toward > 0.0 {
            ScrollDirection::Down
        } else {
            return false;
        };

        let origin = ctx.content.frame().map_or(Point::ZERO, |frame| frame.origin);
        let point = Point::new(
            event.x - origin.x,
            event.y - ctx.controller.translation() - origin.y,
        );
        ctx.probe
            .can_scroll(&*ctx.content, event, point, direction, ctx.observers.headers())
    }
}

/// Routes pointer events between the sheet and its content
#[derive(Debug)]
pub struct GestureArbiter {
    fsm: StateMachine<GestureState>,
    session: Option<PointerSession>,
    parent_intercept_disallowed: bool,
}

impl GestureArbiter {
    pub fn new() -> Self {
        Self {
            fsm: StateMachine::new(GestureState::Idle),
            session: None,
            parent_intercept_disallowed: false,
        }
    }

    pub fn state(&self) -> GestureState {
        self.fsm.current()
    }

    pub fn session(&self) -> Option<&PointerSession> {
        self.session.as_ref()
    }

    /// Whether enclosing containers are currently asked not to intercept
    pub fn disallows_parent_intercept(&self) -> bool {
        self.parent_intercept_disallowed
    }

    /// Transitions of the current gesture
    pub fn transitions(&self) -> &[(GestureState, drawer_core::EventId, GestureState)] {
        self.fsm.history()
    }

    /// Forget the current gesture
    pub fn reset(&mut self) {
        self.session = None;
        self.fsm.reset(GestureState::Idle);
        self.parent_intercept_disallowed = false;
    }

    /// Process one pointer event that passed the sheet's gating.
    ///
    /// Returns false only for moves or releases that arrive without a
    /// pointer down this arbiter saw.
    pub fn handle(&mut self, mut ctx: ArbiterContext<'_>, config: &SheetConfig, event: &PointerEvent) -> bool {
        if event.action == PointerAction::Down {
            self.begin(&mut ctx, config, event);
        }

        let Some(session) = self.session.as_mut() else {
            tracing::trace!("{:?} without a pointer session, ignoring", event.action);
            return false;
        };

        session.velocity.push(event);
        let release_velocity = if event.action.is_terminal() {
            let velocity_y = session.velocity.velocity_y();
            ctx.observers.notify(SheetEvent::FingerUp { velocity_y });
            velocity_y
        } else {
            0.0
        };
        self.parent_intercept_disallowed = true;

        let mut delta_y = session.config.damp(session.down.y - event.y);
        let mut delta_x = session.down.x - event.x;

        if !session.claimed && delta_y.abs() > session.config.touch_slop && delta_y.abs() > delta_x.abs() {
            session.claimed = true;
            session.down = event.position();
            delta_y = 0.0;
            delta_x = 0.0;
            self.fsm.send(gesture_events::CLAIM_VERTICAL);
            tracing::debug!("sheet claimed vertical drag at translation {}", ctx.controller.translation());
        }

        if event.action.is_terminal()
            || (delta_x.abs() > session.config.horizontal_slop() && delta_x.abs() > delta_y.abs())
        {
            ctx.observers.notify(SheetEvent::HorizontalScroll {
                event: *event,
                delta_x,
                delta_y,
            });
        }

        let mut candidate = session.down_translation - delta_y;
        let in_content = event.offset(0.0, -ctx.controller.translation());
        ctx.observers.forward_raw(&in_content);

        if !session.claimed {
            ctx.content.dispatch_pointer_event(&in_content);
        } else {
            if delta_y != 0.0 {
                let content_can_scroll = session.content_can_scroll(&mut ctx, event, delta_y);

                if session.content_stream_open && !content_can_scroll {
                    let current = ctx.controller.translation();
                    ctx.content
                        .dispatch_pointer_event(&event.offset(0.0, -current).with_action(PointerAction::Cancel));
                    session.content_stream_open = false;
                    session.down.y = event.y;
                    session.velocity.clear();
                    candidate = current;
                    self.fsm.send(gesture_events::RECLAIM_BY_SHEET);
                    tracing::debug!("content reached its edge, sheet moves from {}", current);
                }

                if !session.content_stream_open && content_can_scroll {
                    session.commit(&mut ctx, 0.0, 0.0);
                    session.content_stream_open = true;
                    if event.action == PointerAction::Move {
                        let replay = event
                            .offset(0.0, -ctx.controller.translation())
                            .with_action(PointerAction::Down);
                        ctx.content.dispatch_pointer_event(&replay);
                        ctx.observers.notify(SheetEvent::FingerUp { velocity_y: 0.0 });
                        ctx.observers.set_scrolling_state(ScrollingState::Settling);
                    }
                    tracing::debug!("sheet expanded, content scrolls again");
                }
            }

            let content_owns = session.content_stream_open
                && (delta_y != 0.0 || self.fsm.is_in(GestureState::ContentOwns));

            if content_owns {
                ctx.content
                    .dispatch_pointer_event(&event.offset(0.0, -ctx.controller.translation()));
                ctx.observers.set_scrolling_state(ScrollingState::Settling);
                self.fsm.send(gesture_events::HANDOFF_TO_CONTENT);
            } else {
                let target = session.config.clamp_to_locks(candidate);
                let velocity_y = session.velocity.velocity_y();
                session.commit(&mut ctx, target, velocity_y);

                if event.action.is_terminal() {
                    session.content_stream_open = true;
                    tracing::trace!(
                        "sheet released at {} with velocity {} (fling: {})",
                        ctx.controller.translation(),
                        release_velocity,
                        release_velocity.abs() >= session.config.min_fling_velocity
                    );
                    ctx.observers.notify(SheetEvent::ScrollRelease {
                        offset: ctx.controller.translation(),
                        velocity_y: release_velocity,
                    });
                }
            }
        }

        if event.action.is_terminal() {
            self.session = None;
            self.parent_intercept_disallowed = false;
            self.fsm.send(gesture_events::POINTER_RELEASE);
        }
        true
    }

    fn begin(&mut self, ctx: &mut ArbiterContext<'_>, config: &SheetConfig, event: &PointerEvent) {
        let origin = ctx.controller.translation();
        ctx.probe.set_require_touch_under_target(config.require_touch_under_target);
        ctx.probe.begin_gesture(&*ctx.content, event);

        self.session = Some(PointerSession::new(event.position(), origin, *config));
        self.fsm.reset(GestureState::Idle);
        self.fsm.send(gesture_events::POINTER_DOWN);
    }
}

impl Default for GestureArbiter {
    fn default() -> Self {
        Self::new()
    }
}
