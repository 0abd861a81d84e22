//! Sheet and gesture states

use drawer_core::fsm::{EventId, StateTransitions};
use serde::{Deserialize, Serialize};

/// Named rest position the sheet last settled at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowState {
    /// Never settled
    #[default]
    Init,
    Hidden,
    Peek,
    Expanded,
}

/// Whether the sheet is following a finger or coming to rest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollingState {
    Dragging,
    #[default]
    Settling,
}

/// Events driving [`GestureState`]
pub mod gesture_events {
    use drawer_core::fsm::EventId;

    pub const POINTER_DOWN: EventId = 1;
    /// Vertical movement passed the touch slop
    pub const CLAIM_VERTICAL: EventId = 2;
    /// Content can scroll further, so it receives the moves
    pub const HANDOFF_TO_CONTENT: EventId = 3;
    /// Content reached its edge, so the sheet moves again
    pub const RECLAIM_BY_SHEET: EventId = 4;
    /// Pointer up or cancel
    pub const POINTER_RELEASE: EventId = 5;
}

/// Ownership of the current gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureState {
    /// No pointer down
    #[default]
    Idle,
    /// Pointer down, axis not yet decided; events pass through to content
    Arbitrating,
    /// The sheet's translation follows the pointer
    SheetOwns,
    /// The content scrolls; the sheet stays put
    ContentOwns,
}

impl GestureState {
    pub fn is_active(&self) -> bool {
        !matches!(self, GestureState::Idle)
    }
}

impl StateTransitions for GestureState {
    fn on_event(&self, event: EventId) -> Option<Self> {
        use gesture_events::*;
        match (self, event) {
            (GestureState::Idle, POINTER_DOWN) => Some(GestureState::Arbitrating),
            (GestureState::Arbitrating, CLAIM_VERTICAL) => Some(GestureState::SheetOwns),
            (GestureState::SheetOwns, HANDOFF_TO_CONTENT) => Some(GestureState::ContentOwns),
            (GestureState::ContentOwns, RECLAIM_BY_SHEET) => Some(GestureState::SheetOwns),
            (
                GestureState::Arbitrating | GestureState::SheetOwns | GestureState::ContentOwns,
                POINTER_RELEASE,
            ) => Some(GestureState::Idle),
            _ => None,
        }
    }
}
