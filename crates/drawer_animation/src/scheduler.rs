//! Animation scheduler
//!
//! Owns the settle animations and the one-shot deferred tasks of a single
//! owner. The host drives it with frame timestamps; nothing runs between
//! frames. Clearing the scheduler drops every pending animation and task, so
//! nothing fires after the owner is torn down.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::settle::SettleAnimation;

new_key_type! {
    pub struct SettleId;
}

/// Value produced by one animation on one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSample {
    pub id: SettleId,
    pub value: f32,
    /// The animation reached its target on this frame and was removed
    pub finished: bool,
}

/// Everything that became due on a frame
#[derive(Debug)]
pub struct Frame<T> {
    /// Milliseconds since the previous frame (0 on the first frame)
    pub dt_ms: f32,
    /// Deferred tasks posted before this frame, in posting order
    pub tasks: SmallVec<[T; 2]>,
    pub samples: SmallVec<[FrameSample; 2]>,
}

/// Frame-driven scheduler for settle animations and deferred tasks
#[derive(Debug)]
pub struct AnimationScheduler<T> {
    animations: SlotMap<SettleId, SettleAnimation>,
    tasks: SmallVec<[T; 2]>,
    last_frame_ms: Option<u64>,
}

impl<T> AnimationScheduler<T> {
    pub fn new() -> Self {
        Self {
            animations: SlotMap::with_key(),
            tasks: SmallVec::new(),
            last_frame_ms: None,
        }
    }

    /// Start an animation; it is sampled from the next frame on
    pub fn start(&mut self, mut animation: SettleAnimation) -> SettleId {
        animation.start();
        self.animations.insert(animation)
    }

    /// Stop and remove an animation
    pub fn cancel(&mut self, id: SettleId) -> Option<SettleAnimation> {
        self.animations.remove(id).map(|mut animation| {
            animation.stop();
            animation
        })
    }

    pub fn is_running(&self, id: SettleId) -> bool {
        self.animations.contains_key(id)
    }

    pub fn get(&self, id: SettleId) -> Option<&SettleAnimation> {
        self.animations.get(id)
    }

    /// Queue a task to run on the next frame
    pub fn post(&mut self, task: T) {
        self.tasks.push(task);
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    /// Check if the next frame has anything to do
    pub fn has_pending_work(&self) -> bool {
        !self.animations.is_empty() || !self.tasks.is_empty()
    }

    /// Advance to `now_ms`, returning due tasks and one sample per animation.
    ///
    /// Finished animations are removed after their last sample.
    pub fn tick(&mut self, now_ms: u64) -> Frame<T> {
        let dt_ms = match self.last_frame_ms {
            Some(last) => now_ms.saturating_sub(last) as f32,
            None => 0.0,
        };

        let tasks = std::mem::take(&mut self.tasks);

        let mut samples = SmallVec::new();
        let mut finished: SmallVec<[SettleId; 2]> = SmallVec::new();
        for (id, animation) in self.animations.iter_mut() {
            let value = animation.tick(dt_ms);
            let done = !animation.is_playing();
            if done {
                finished.push(id);
            }
            samples.push(FrameSample {
                id,
                value,
                finished: done,
            });
        }
        for id in finished {
            self.animations.remove(id);
        }

        // Idle frames do not accumulate time into the next animation.
        self.last_frame_ms = if self.animations.is_empty() {
            None
        } else {
            Some(now_ms)
        };

        Frame {
            dt_ms,
            tasks,
            samples,
        }
    }

    /// Drop every animation and task, returning the ids of the animations
    /// that were still running
    pub fn clear(&mut self) -> SmallVec<[SettleId; 2]> {
        let cancelled = self.animations.keys().collect();
        if !self.animations.is_empty() || !self.tasks.is_empty() {
            tracing::debug!(
                "scheduler cleared with {} animations and {} tasks pending",
                self.animations.len(),
                self.tasks.len()
            );
        }
        self.animations.clear();
        self.tasks.clear();
        self.last_frame_ms = None;
        cancelled
    }
}

impl<T> Default for AnimationScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
