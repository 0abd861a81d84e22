//! Drawer Core
//!
//! Foundational primitives shared by the Drawer sheet container:
//!
//! - **Geometry**: points, sizes and rectangles in logical pixels
//! - **Pointer Events**: the down/move/up/cancel stream a sheet consumes
//! - **Velocity Tracking**: windowed estimate of pointer velocity
//! - **State Machines**: typed transitions for gesture arbitration
//! - **Configuration**: the sheet's tunables, loadable from TOML
//!
//! # Example
//!
//! ```rust
//! use drawer_core::{PointerAction, PointerEvent, VelocityTracker};
//!
//! let mut tracker = VelocityTracker::new();
//! tracker.push(&PointerEvent::new(PointerAction::Down, 0.0, 100.0, 0));
//! tracker.push(&PointerEvent::new(PointerAction::Move, 0.0, 200.0, 50));
//!
//! // 100px in 50ms
//! assert_eq!(tracker.velocity_y(), 2000.0);
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod fsm;
pub mod geometry;
pub mod velocity;

pub use config::{SheetConfig, SheetDirection};
pub use error::{Result, SheetError};
pub use events::{PointerAction, PointerEvent};
pub use fsm::{EventId, StateMachine, StateTransitions};
pub use geometry::{Point, Rect, Size};
pub use velocity::VelocityTracker;
