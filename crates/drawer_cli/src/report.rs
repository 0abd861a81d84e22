//! Replay report model

use std::io::Write;

use anyhow::Result;
use drawer_layout::{GestureState, ScrollingState, SheetEvent, ShowState};
use serde::Serialize;

/// A notification tagged with the step that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecordedEvent {
    /// Index into the scenario steps; `None` while setting up the sheet
    pub step: Option<usize>,
    #[serde(flatten)]
    pub event: SheetEvent,
}

/// Sheet and content state once every step ran
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalState {
    pub translation: f32,
    pub show_state: ShowState,
    pub scrolling_state: ScrollingState,
    pub gesture_state: GestureState,
    pub animating: bool,
    pub list_scroll_y: f32,
    pub header_offset: Option<f32>,
    pub elapsed_ms: u64,
}

/// Machine-readable result of a replay
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub events: Vec<RecordedEvent>,
    /// Settle requests refused because another settle was running
    pub rejected_steps: Vec<usize>,
    #[serde(rename = "final")]
    pub final_state: FinalState,
}

impl ReplayReport {
    /// Events emitted while running step `index`
    pub fn events_for_step(&self, index: usize) -> impl Iterator<Item = &SheetEvent> + '_ {
        self.events
            .iter()
            .filter(move |recorded| recorded.step == Some(index))
            .map(|recorded| &recorded.event)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let payload = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(payload)
    }

    pub fn write_to_writer<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<()> {
        writer.write_all(self.to_json(pretty)?.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}
