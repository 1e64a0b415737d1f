//! Editor configuration and viewport constants.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Logical canvas width. Canvas height is `VIEWPORT_SIZE * viewport_ratio`.
pub const VIEWPORT_SIZE: f64 = 1000.0;

/// Default height/width ratio of a deck (16:9).
pub const DEFAULT_VIEWPORT_RATIO: f64 = 0.5625;

/// Distance in canvas units within which a dragged edge snaps to a guide.
pub const SNAP_TOLERANCE: f64 = 5.0;

/// Pointer travel in screen units below which a drag is treated as a misclick.
pub const MISCLICK_THRESHOLD: f64 = 5.0;

/// How far a displayed guide extends past the elements it aligns.
pub const GUIDE_OVERHANG: f64 = 50.0;

/// Maximum number of retained history snapshots.
pub const HISTORY_LIMIT: usize = 20;

pub const RECORD_DEBOUNCE_MS: u64 = 300;
pub const UNDO_THROTTLE_MS: u64 = 100;

/// Errors from loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunable editor behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub viewport_size: f64,
    pub snap_tolerance: f64,
    pub misclick_threshold: f64,
    pub guide_overhang: f64,
    pub history_limit: usize,
    pub record_debounce_ms: u64,
    pub undo_throttle_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            viewport_size: VIEWPORT_SIZE,
            snap_tolerance: SNAP_TOLERANCE,
            misclick_threshold: MISCLICK_THRESHOLD,
            guide_overhang: GUIDE_OVERHANG,
            history_limit: HISTORY_LIMIT,
            record_debounce_ms: RECORD_DEBOUNCE_MS,
            undo_throttle_ms: UNDO_THROTTLE_MS,
        }
    }
}

impl EditorConfig {
    pub fn record_debounce(&self) -> Duration {
        Duration::from_millis(self.record_debounce_ms)
    }

    pub fn undo_throttle(&self) -> Duration {
        Duration::from_millis(self.undo_throttle_ms)
    }

    /// Parse a config from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.viewport_size.is_nan() || self.viewport_size <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "viewportSize",
                reason: format!("must be positive, got {}", self.viewport_size),
            });
        }
        if self.history_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "historyLimit",
                reason: "must keep at least one snapshot".to_string(),
            });
        }
        if self.snap_tolerance < 0.0 || self.misclick_threshold < 0.0 {
            return Err(ConfigError::Invalid {
                field: "snapTolerance",
                reason: "tolerances cannot be negative".to_string(),
            });
        }
        Ok(())
    }
}
