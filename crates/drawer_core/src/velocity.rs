//! Pointer velocity estimation
//!
//! Keeps a short window of recent samples and reports the average velocity
//! across it. Only the most recent `HISTORY_LIMIT_MS` of movement counts, so
//! a finger that stops before lifting reports a velocity near zero.

use std::collections::VecDeque;

use crate::events::PointerEvent;

const HISTORY_LIMIT_MS: u64 = 100;

#[derive(Debug, Clone, Copy)]
struct Sample {
    x: f32,
    y: f32,
    timestamp_ms: u64,
}

/// Windowed pointer velocity tracker (pixels per second)
#[derive(Debug, Clone, Default)]
pub struct VelocityTracker {
    history: VecDeque<Sample>,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self {
            history: VecDeque::new(),
        }
    }

    /// Add a pointer sample.
    pub fn push(&mut self, event: &PointerEvent) {
        // Timestamps must increase monotonically within a gesture.
        if let Some(last) = self.history.back() {
            if event.timestamp_ms < last.timestamp_ms {
                tracing::trace!(
                    "ignoring pointer sample at {}ms earlier than last {}ms",
                    event.timestamp_ms,
                    last.timestamp_ms
                );
                return;
            }
        }

        self.history.push_back(Sample {
            x: event.raw_x,
            y: event.raw_y,
            timestamp_ms: event.timestamp_ms,
        });

        self.trim_history();
    }

    /// Forget all samples
    pub fn clear(&mut self) {
        self.history.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Vertical velocity; positive when the pointer moves down the screen.
    pub fn velocity_y(&self) -> f32 {
        self.velocity(|s| s.y)
    }

    /// Horizontal velocity; positive when the pointer moves right.
    pub fn velocity_x(&self) -> f32 {
        self.velocity(|s| s.x)
    }

    fn velocity(&self, axis: impl Fn(&Sample) -> f32) -> f32 {
        let (Some(first), Some(last)) = (self.history.front(), self.history.back()) else {
            return 0.0;
        };

        let elapsed_ms = last.timestamp_ms - first.timestamp_ms;
        if elapsed_ms == 0 {
            return 0.0;
        }

        (axis(last) - axis(first)) / elapsed_ms as f32 * 1000.0
    }

    fn trim_history(&mut self) {
        let Some(&Sample { timestamp_ms, .. }) = self.history.back() else {
            return;
        };

        while let Some(first) = self.history.front() {
            if timestamp_ms <= first.timestamp_ms + HISTORY_LIMIT_MS {
                break;
            }

            let _ = self.history.pop_front();
        }
    }
}
