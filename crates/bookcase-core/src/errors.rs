//! Error types for the bookcase configurator.

use thiserror::Error;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum BookcaseError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Problems with a configuration record.
///
/// The layout and geometry stages never fail on these; they clamp or skip.
/// Hosts use [`crate::Configuration::validate`] to surface them to users.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid color: {value:?}")]
    InvalidColor { value: String },

    #[error("Dimension {name} must be a positive number, got {value}")]
    NonPositiveDimension { name: &'static str, value: f64 },

    #[error("Thickness {thickness} is too large (limit {limit})")]
    ThicknessTooLarge { thickness: f64, limit: f64 },

    #[error("{count} {name} leave a pitch of {pitch}, below the {minimum} a panel needs")]
    DividersTooDense {
        name: &'static str,
        count: u32,
        pitch: f64,
        minimum: f64,
    },

    #[error("Drawer at row {row}, column {column} is outside the {rows}x{columns} grid")]
    DrawerOutOfRange {
        row: u32,
        column: u32,
        rows: u32,
        columns: u32,
    },

    #[error("Invalid configuration record: {reason}")]
    InvalidRecord { reason: String },
}

/// Errors while acquiring or releasing graphics resources.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("Render resource initialization failed: {reason}")]
    ResourceInit { reason: String },

    #[error("Scene is unavailable after an earlier fatal error: {reason}")]
    Poisoned { reason: String },
}

/// Errors during export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No geometry to export")]
    NoGeometry,

    #[error("I/O error during export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {reason}")]
    Serialization { reason: String },
}
