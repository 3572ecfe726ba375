//! Application settings

use crate::ControllerError;
use config::{Config, Environment, File};
use event_bus::DEFAULT_CAPACITY;
use gesture::GestureConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Environment variable prefix; nested keys are separated by `__`
pub const ENV_PREFIX: &str = "GAZE_OVERLAY";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when RUST_LOG is not set
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Application settings.
///
/// Sources, lowest priority first: built-in defaults, an optional settings
/// file (TOML, JSON or YAML by extension), then `GAZE_OVERLAY__*` environment
/// variables such as `GAZE_OVERLAY__GESTURES__HISTORY_SIZE=10`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub gestures: GestureConfig,
    /// Smooth gaze samples on startup
    pub smoothing: bool,
    /// Run gesture detection while tracking
    pub face_triggers: bool,
    /// Display tick period in milliseconds
    pub tick_interval_ms: u64,
    /// Events buffered per bus subscriber
    pub event_capacity: usize,
    pub logging: LoggingConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gestures: GestureConfig::default(),
            smoothing: true,
            face_triggers: true,
            tick_interval_ms: 16,
            event_capacity: DEFAULT_CAPACITY,
            logging: LoggingConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ControllerError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            info!("Loading settings from {:?}", path);
            builder = builder.add_source(File::from(path));
        }
        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Tick period, at least one millisecond
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}
