//! Sheet configuration
//!
//! Every field has a default, so a TOML file only needs the values it
//! changes:
//!
//! ```toml
//! direction = "bottom_only"
//! damping_down = 0.5
//! lock_top = 120.0
//! settle_duration_ms = 250
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetError};

/// Directions the sheet may be dragged away from its rest position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetDirection {
    /// Free movement in both directions
    #[default]
    All,
    /// The sheet may only rise above its rest position (translation <= 0)
    TopOnly,
    /// The sheet may only sink below its rest position (translation >= 0)
    BottomOnly,
}

impl SheetDirection {
    /// Whether a translation is allowed under this constraint
    pub fn allows(self, translation: f32) -> bool {
        match self {
            SheetDirection::All => true,
            SheetDirection::TopOnly => translation <= 0.0,
            SheetDirection::BottomOnly => translation >= 0.0,
        }
    }
}

/// Tunables for a sheet container
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Direction constraint applied to committed translations
    pub direction: SheetDirection,
    /// Scale applied to the pointer delta when the finger moves down
    pub damping_up: f32,
    /// Scale applied to the pointer delta when the finger moves up
    pub damping_down: f32,
    /// Smallest translation a drag may reach
    pub lock_top: Option<f32>,
    /// Largest translation a drag may reach
    pub lock_bottom: Option<f32>,
    /// Require the pointer to lie within a node's on-screen bounds before
    /// that node counts as scrollable or hit
    pub require_touch_under_target: bool,
    /// Whether the sheet intercepts pointer events at all
    pub intercept_enabled: bool,
    /// Distance in pixels before a drag claims an axis
    pub touch_slop: f32,
    /// Multiple of `touch_slop` a horizontal drag needs before it is reported
    pub horizontal_slop_factor: f32,
    /// Default duration of settle animations
    pub settle_duration_ms: u32,
    /// Release velocity (px/s) separating a settle from a fling. Observed
    /// only; the host decides where the sheet lands.
    pub min_fling_velocity: f32,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            direction: SheetDirection::All,
            damping_up: 1.0,
            damping_down: 1.0,
            lock_top: None,
            lock_bottom: None,
            require_touch_under_target: true,
            intercept_enabled: true,
            touch_slop: 8.0,
            horizontal_slop_factor: 8.0,
            settle_duration_ms: 300,
            min_fling_velocity: 50.0,
        }
    }
}

impl SheetConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: SheetConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Check every value is in range
    pub fn validate(&self) -> Result<()> {
        if !is_positive(self.damping_up) {
            return Err(SheetError::InvalidConfig(format!(
                "damping_up must be positive, got {}",
                self.damping_up
            )));
        }
        if !is_positive(self.damping_down) {
            return Err(SheetError::InvalidConfig(format!(
                "damping_down must be positive, got {}",
                self.damping_down
            )));
        }
        if !(self.touch_slop >= 0.0 && self.touch_slop.is_finite()) {
            return Err(SheetError::InvalidConfig(format!(
                "touch_slop must be non-negative, got {}",
                self.touch_slop
            )));
        }
        if !is_positive(self.horizontal_slop_factor) {
            return Err(SheetError::InvalidConfig(format!(
                "horizontal_slop_factor must be positive, got {}",
                self.horizontal_slop_factor
            )));
        }
        if let (Some(top), Some(bottom)) = (self.lock_top, self.lock_bottom) {
            if top > bottom {
                return Err(SheetError::InvalidConfig(format!(
                    "lock_top ({top}) must not exceed lock_bottom ({bottom})"
                )));
            }
        }
        Ok(())
    }

    /// Horizontal distance before a horizontal drag is reported
    pub fn horizontal_slop(&self) -> f32 {
        self.touch_slop * self.horizontal_slop_factor
    }

    /// Scale a vertical delta (measured down minus current) by the damping
    /// for its direction
    pub fn damp(&self, delta_y: f32) -> f32 {
        if delta_y > 0.0 {
            delta_y * self.damping_down
        } else if delta_y < 0.0 {
            delta_y * self.damping_up
        } else {
            delta_y
        }
    }

    /// Clamp a candidate translation against the enabled locks
    pub fn clamp_to_locks(&self, translation: f32) -> f32 {
        let mut value = translation;
        if let Some(top) = self.lock_top {
            value = value.max(top);
        }
        if let Some(bottom) = self.lock_bottom {
            value = value.min(bottom);
        }
        value
    }
}

fn is_positive(value: f32) -> bool {
    value > 0.0 && value.is_finite()
}
