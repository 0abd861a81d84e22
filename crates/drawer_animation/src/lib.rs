//! Drawer Animation System
//!
//! Timed settle animations and the frame scheduler that ticks them.
//!
//! # Features
//!
//! - **Easing**: deceleration and ease-out curves
//! - **Settle Animations**: single-value transitions toward a rest position
//! - **Frame Scheduler**: host-clocked ticking plus one-shot deferred tasks,
//!   all dropped at once when the owner is torn down

pub mod easing;
pub mod scheduler;
pub mod settle;

pub use easing::Easing;
pub use scheduler::{AnimationScheduler, Frame, FrameSample, SettleId};
pub use settle::{SettleAnimation, SettleOutcome};
