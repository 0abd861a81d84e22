//! Replay scenario format
//!
//! A scenario describes the sheet, the synthetic content inside it and the
//! steps to replay:
//!
//! ```json
//! {
//!   "height": 800,
//!   "list": { "top": 200, "viewport_height": 600, "content_height": 2400 },
//!   "header": { "height": 200 },
//!   "initial_translation": 300,
//!   "steps": [
//!     { "type": "down", "x": 100, "y": 400, "t": 0 },
//!     { "type": "move", "x": 100, "y": 360, "t": 16 },
//!     { "type": "up", "x": 100, "y": 360, "t": 32 },
//!     { "type": "peek", "offset": 300 },
//!     { "type": "frame", "ms": 48, "until_idle": true }
//!   ]
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

/// Problems with a scenario that parsed but cannot be replayed
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("sheet height must be positive, got {0}")]
    InvalidHeight(f32),

    #[error("list {field} must be non-negative, got {value}")]
    InvalidList { field: &'static str, value: f32 },

    #[error("header height must be positive, got {0}")]
    InvalidHeader(f32),
}

/// A pointer/animation script replayed against one sheet
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Container height; also the hidden offset
    #[serde(default = "default_height")]
    pub height: f32,
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default)]
    pub list: ListSpec,
    /// Collapsible header placed above the list
    #[serde(default)]
    pub header: Option<HeaderSpec>,
    /// Translation of the content before the first step
    #[serde(default)]
    pub initial_translation: f32,
    pub steps: Vec<ScenarioStep>,
}

fn default_height() -> f32 {
    800.0
}

fn default_width() -> f32 {
    400.0
}

/// Scrollable list inside the sheet content
#[derive(Debug, Clone, Deserialize)]
pub struct ListSpec {
    /// Distance from the top of the content
    #[serde(default)]
    pub top: f32,
    pub viewport_height: f32,
    pub content_height: f32,
    /// Starting scroll offset
    #[serde(default)]
    pub scroll_y: f32,
}

impl Default for ListSpec {
    fn default() -> Self {
        Self {
            top: 0.0,
            viewport_height: default_height(),
            content_height: default_height(),
            scroll_y: 0.0,
        }
    }
}

impl ListSpec {
    pub fn scroll_range(&self) -> f32 {
        (self.content_height - self.viewport_height).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HeaderSpec {
    pub height: f32,
}

/// Supported replay steps
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    Down { x: f32, y: f32, t: u64 },
    Move { x: f32, y: f32, t: u64 },
    Up { x: f32, y: f32, t: u64 },
    Cancel { x: f32, y: f32, t: u64 },
    /// Run one frame at `ms`, or keep ticking every 16ms until the sheet is
    /// idle when `until_idle` is set
    Frame {
        ms: u64,
        #[serde(default)]
        until_idle: bool,
    },
    Expand {
        #[serde(default)]
        duration_ms: Option<u32>,
    },
    Peek {
        offset: f32,
        #[serde(default)]
        duration_ms: Option<u32>,
    },
    /// Hide to the sheet height, or to `offset` when given
    Hide {
        #[serde(default)]
        offset: Option<f32>,
        #[serde(default)]
        duration_ms: Option<u32>,
    },
    /// Move the list's scroll position directly
    ScrollContent { scroll_y: f32 },
    /// Report a new offset from the collapsible header
    CollapseHeader { offset: f32 },
}

impl Scenario {
    /// Parse and validate scenario JSON
    pub fn from_json(input: &str) -> Result<Self> {
        let scenario: Scenario =
            serde_json::from_str(input).context("failed to parse replay scenario JSON")?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario file: {}", path.display()))?;
        Self::from_json(&raw)
    }

    pub fn validate(&self) -> std::result::Result<(), ScenarioError> {
        if !(self.height > 0.0 && self.height.is_finite()) {
            return Err(ScenarioError::InvalidHeight(self.height));
        }
        for (field, value) in [
            ("top", self.list.top),
            ("viewport_height", self.list.viewport_height),
            ("content_height", self.list.content_height),
            ("scroll_y", self.list.scroll_y),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ScenarioError::InvalidList { field, value });
            }
        }
        if let Some(header) = self.header {
            if !(header.height > 0.0 && header.height.is_finite()) {
                return Err(ScenarioError::InvalidHeader(header.height));
            }
        }
        Ok(())
    }
}
