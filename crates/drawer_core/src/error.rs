//! Sheet error types

use thiserror::Error;

/// Errors surfaced by the sheet container.
///
/// Runtime anomalies (unmeasured trees, unknown node kinds, missing header
/// bindings) never become errors; they degrade to "not scrollable" or no-op.
#[derive(Error, Debug)]
pub enum SheetError {
    /// A sheet owns exactly one content node
    #[error("sheet already has a child; a sheet owns exactly one content node")]
    ChildAlreadyAttached,

    /// A configuration value is out of range
    #[error("invalid sheet configuration: {0}")]
    InvalidConfig(String),

    /// Failed to parse a TOML configuration
    #[error("failed to parse sheet configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Failed to read a configuration file
    #[error("failed to read sheet configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sheet operations
pub type Result<T> = std::result::Result<T, SheetError>;
