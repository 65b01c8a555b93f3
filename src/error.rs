//! Error types

use thiserror::Error;

use crate::frame::AssetKind;

/// Frame loop failures
#[derive(Debug, Error, PartialEq)]
pub enum LoopError {
    /// Some images never reported ready within the startup timeout
    #[error("assets not ready after {waited_ms:.0} ms: {missing:?}")]
    AssetTimeout {
        missing: Vec<AssetKind>,
        waited_ms: f64,
    },
}

/// Settings could not be loaded
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
