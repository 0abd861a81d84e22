//! Pointer events
//!
//! A sheet consumes one stream of pointer events per gesture. Each event
//! carries two positions: the local position, which the container shifts
//! into its content's coordinate frame before forwarding, and the raw
//! (screen) position, which is never shifted and is used for hit-testing
//! against on-screen bounds.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Phase of a pointer event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerAction {
    Down,
    Move,
    Up,
    Cancel,
}

impl PointerAction {
    /// Up or cancel: the gesture ends with this event
    pub fn is_terminal(self) -> bool {
        matches!(self, PointerAction::Up | PointerAction::Cancel)
    }
}

/// A single pointer sample
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub action: PointerAction,
    /// Position in the receiver's local frame
    pub x: f32,
    pub y: f32,
    /// Position on screen
    pub raw_x: f32,
    pub raw_y: f32,
    /// Monotonic timestamp in milliseconds
    pub timestamp_ms: u64,
}

impl PointerEvent {
    /// Create an event whose raw position equals its local position
    pub fn new(action: PointerAction, x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self {
            action,
            x,
            y,
            raw_x: x,
            raw_y: y,
            timestamp_ms,
        }
    }

    /// Builder: set the on-screen position
    pub fn with_raw(mut self, raw_x: f32, raw_y: f32) -> Self {
        self.raw_x = raw_x;
        self.raw_y = raw_y;
        self
    }

    /// Copy of this event with a different action (used to synthesize
    /// corrective down/cancel events)
    pub fn with_action(mut self, action: PointerAction) -> Self {
        self.action = action;
        self
    }

    /// Shift the local position; the raw position is untouched
    pub fn offset_location(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }

    /// Copy of this event with the local position shifted
    pub fn offset(mut self, dx: f32, dy: f32) -> Self {
        self.offset_location(dx, dy);
        self
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn raw_position(&self) -> Point {
        Point::new(self.raw_x, self.raw_y)
    }
}
