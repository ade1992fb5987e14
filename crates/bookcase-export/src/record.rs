//! The configuration as a flat JSON record.

use bookcase_core::{ConfigError, Configuration, ExportError};
use tracing::warn;

/// Serialize a configuration to pretty-printed JSON.
pub fn config_to_json(config: &Configuration) -> Result<String, ExportError> {
    serde_json::to_string_pretty(config).map_err(|e| ExportError::Serialization {
        reason: e.to_string(),
    })
}

/// Parse a configuration record.
///
/// A missing `drawers` list means no drawers. Out-of-range values are
/// accepted and logged; the layout clamps them.
pub fn config_from_json(json: &str) -> Result<Configuration, ConfigError> {
    let config: Configuration = serde_json::from_str(json).map_err(|e| ConfigError::InvalidRecord {
        reason: e.to_string(),
    })?;
    for problem in config.validate() {
        warn!(%problem, "imported configuration needs clamping");
    }
    Ok(config)
}
