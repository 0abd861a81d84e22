//! Settle animations
//!
//! A settle animation moves one value from where it is to a rest position
//! over a fixed duration, shaped by an easing curve.

use crate::easing::Easing;

/// How a settle animation ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettleOutcome {
    /// Reached its target
    Finished,
    /// Stopped early (owner detached or animation cancelled)
    Cancelled,
}

/// A timed transition of a single value
#[derive(Clone, Debug)]
pub struct SettleAnimation {
    from: f32,
    to: f32,
    duration_ms: u32,
    elapsed_ms: f32,
    easing: Easing,
    playing: bool,
}

impl SettleAnimation {
    pub fn new(from: f32, to: f32, duration_ms: u32) -> Self {
        Self {
            from,
            to,
            duration_ms,
            elapsed_ms: 0.0,
            easing: Easing::default(),
            playing: false,
        }
    }

    /// Builder: set the easing curve
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn start(&mut self) {
        self.elapsed_ms = 0.0;
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether the full duration has elapsed
    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    pub fn start_value(&self) -> f32 {
        self.from
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Linear progress (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        (self.elapsed_ms / self.duration_ms as f32).clamp(0.0, 1.0)
    }

    /// Get the current interpolated value
    pub fn value(&self) -> f32 {
        if self.is_finished() {
            return self.to;
        }
        let eased = self.easing.apply(self.progress());
        self.from + (self.to - self.from) * eased
    }

    /// Advance the animation by delta time (in milliseconds) and return the
    /// new value
    pub fn tick(&mut self, dt_ms: f32) -> f32 {
        if self.playing {
            self.elapsed_ms += dt_ms.max(0.0);
            if self.elapsed_ms >= self.duration_ms as f32 {
                self.elapsed_ms = self.duration_ms as f32;
                self.playing = false;
            }
        }
        self.value()
    }
}
