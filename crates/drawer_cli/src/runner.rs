//! Scenario replay against a live sheet

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use drawer_core::{PointerAction, PointerEvent, Rect, SheetConfig};
use drawer_layout::{NodeId, SheetContainer, SheetEvent};

use crate::content::{ContentHandle, SyntheticContent};
use crate::report::{FinalState, RecordedEvent, ReplayReport};
use crate::scenario::{Scenario, ScenarioStep};

/// Interval between frames when a step runs until the sheet is idle
pub const FRAME_INTERVAL_MS: u64 = 16;

/// Upper bound on frames a single `until_idle` step may run
const MAX_IDLE_FRAMES: u32 = 1000;

const SHEET_ID: NodeId = NodeId(1);

struct Replay {
    sheet: SheetContainer,
    content: ContentHandle,
    events: Rc<RefCell<Vec<RecordedEvent>>>,
    step: Rc<Cell<Option<usize>>>,
    rejected: Vec<usize>,
    now_ms: u64,
}

impl Replay {
    fn new(scenario: &Scenario, config: SheetConfig) -> Result<Self> {
        let (content, handle) = SyntheticContent::build(scenario);
        let mut sheet = SheetContainer::new(SHEET_ID, config);
        sheet
            .add_child(Box::new(content))
            .context("failed to attach synthetic content")?;

        let events = Rc::new(RefCell::new(Vec::new()));
        let step = Rc::new(Cell::new(None));
        let sink = events.clone();
        let current = step.clone();
        sheet.on_event(move |event: &SheetEvent| {
            sink.borrow_mut().push(RecordedEvent {
                step: current.get(),
                event: *event,
            });
        });

        let bounds = Rect::new(0.0, 0.0, scenario.width, scenario.height);
        sheet.set_bounds(bounds, bounds);
        sheet.on_layout(scenario.height);
        sheet.attach();
        sheet.on_frame(0);

        Ok(Self {
            sheet,
            content: handle,
            events,
            step,
            rejected: Vec::new(),
            now_ms: 0,
        })
    }

    fn pointer(&mut self, action: PointerAction, x: f32, y: f32, t: u64) {
        self.now_ms = self.now_ms.max(t);
        let handled = self.sheet.on_touch_event(&PointerEvent::new(action, x, y, t));
        tracing::trace!("{:?} at ({}, {}) handled: {}", action, x, y, handled);
    }

    fn frame(&mut self, ms: u64, until_idle: bool) {
        self.now_ms = self.now_ms.max(ms);
        self.sheet.on_frame(self.now_ms);
        if !until_idle {
            return;
        }
        let mut frames = 0;
        while self.sheet.is_animating() && frames < MAX_IDLE_FRAMES {
            self.now_ms += FRAME_INTERVAL_MS;
            self.sheet.on_frame(self.now_ms);
            frames += 1;
        }
        if self.sheet.is_animating() {
            tracing::warn!("sheet still animating after {} frames", MAX_IDLE_FRAMES);
        }
    }

    fn settle_request(&mut self, index: usize, accepted: bool) {
        if !accepted {
            tracing::warn!("step {}: settle refused, another settle is running", index);
            self.rejected.push(index);
        }
    }

    fn run_step(&mut self, index: usize, step: &ScenarioStep) -> Result<()> {
        self.step.set(Some(index));
        match *step {
            ScenarioStep::Down { x, y, t } => self.pointer(PointerAction::Down, x, y, t),
            ScenarioStep::Move { x, y, t } => self.pointer(PointerAction::Move, x, y, t),
            ScenarioStep::Up { x, y, t } => self.pointer(PointerAction::Up, x, y, t),
            ScenarioStep::Cancel { x, y, t } => self.pointer(PointerAction::Cancel, x, y, t),
            ScenarioStep::Frame { ms, until_idle } => self.frame(ms, until_idle),
            ScenarioStep::Expand { duration_ms } => {
                let accepted = match duration_ms {
                    Some(duration) => self.sheet.expand_with(duration, |_| {}),
                    None => self.sheet.expand(),
                };
                self.settle_request(index, accepted);
            }
            ScenarioStep::Peek { offset, duration_ms } => {
                let accepted = match duration_ms {
                    Some(duration) => self.sheet.peek_with(offset, duration, |_| {}),
                    None => self.sheet.peek(offset),
                };
                self.settle_request(index, accepted);
            }
            ScenarioStep::Hide { offset, duration_ms } => {
                let accepted = match (offset, duration_ms) {
                    (Some(offset), Some(duration)) => self.sheet.hide_to_with(offset, duration, |_| {}),
                    (Some(offset), None) => self.sheet.hide_to(offset),
                    (None, Some(duration)) => self.sheet.hide_with(duration, |_| {}),
                    (None, None) => self.sheet.hide(),
                };
                self.settle_request(index, accepted);
            }
            ScenarioStep::ScrollContent { scroll_y } => self.content.set_scroll_y(scroll_y),
            ScenarioStep::CollapseHeader { offset } => {
                if !self.content.collapse_header(offset) {
                    bail!("step {index}: collapse_header needs a header in the scenario");
                }
            }
        }
        Ok(())
    }

    fn finish(self) -> ReplayReport {
        let events = self.events.borrow().clone();
        ReplayReport {
            events,
            rejected_steps: self.rejected,
            final_state: FinalState {
                translation: self.sheet.translation(),
                show_state: self.sheet.show_state(),
                scrolling_state: self.sheet.scrolling_state(),
                gesture_state: self.sheet.gesture_state(),
                animating: self.sheet.is_animating(),
                list_scroll_y: self.content.scroll_y(),
                header_offset: self.content.header_offset(),
                elapsed_ms: self.now_ms,
            },
        }
    }
}

/// Replay every step of `scenario` against a fresh sheet
pub fn replay(scenario: &Scenario, config: SheetConfig) -> Result<ReplayReport> {
    let mut replay = Replay::new(scenario, config)?;
    tracing::debug!(
        "replaying {} steps on a {}px sheet",
        scenario.steps.len(),
        scenario.height
    );
    for (index, step) in scenario.steps.iter().enumerate() {
        replay.run_step(index, step)?;
    }
    Ok(replay.finish())
}
