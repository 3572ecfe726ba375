//! Gaze overlay controller
//!
//! Accepts control commands and raw gaze samples as newline-delimited JSON,
//! keeps the tracker state, runs gesture detection on a display tick, and
//! publishes gaze and gesture events on the event bus.

pub mod protocol;
pub mod runtime;
pub mod settings;
pub mod tracker;

pub use protocol::{envelope, parse_inbound, Command, Inbound, RawGaze, Response, EXTENSION_SOURCE};
pub use runtime::{pump_lines, run};
pub use settings::{LoggingConfig, Settings, ENV_PREFIX};
pub use tracker::{Tracker, TrackerStatus};

use gesture::GestureError;
use thiserror::Error;

/// Controller error types
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Gesture detection error: {0}")]
    Gesture(#[from] GestureError),

    #[error("Tracker not initialized")]
    NotInitialized,
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Logs go to stderr
/// so stdout stays reserved for the event stream.
pub fn init_logging(config: &LoggingConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
}
