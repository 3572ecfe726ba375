//! Control protocol
//!
//! Inbound lines are either command envelopes
//! (`{"source": "webgazer-extension-content", "action": "...", "value": ...}`)
//! or raw gaze samples (`{"x": ..., "y": ..., "timestamp": ...}`).

use crate::tracker::TrackerStatus;
use crate::ControllerError;
use gaze_filter::{GazeSample, SmoothedGaze};
use gesture::{GestureConfigPatch, PerformanceMode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Only envelopes from this source are accepted
pub const EXTENSION_SOURCE: &str = "webgazer-extension-content";

/// Control command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "camelCase")]
pub enum Command {
    Start,
    Stop,
    ToggleVideo(bool),
    TogglePoints(bool),
    /// Set the listener state, or flip it when no value is given
    ToggleGazeListener(Option<bool>),
    GetCurrentPrediction,
    StartCalibration,
    ToggleFilter(bool),
    ClearFilterBuffer,
    ToggleFaceTriggers(bool),
    ToggleDebugScreen(bool),
    SetPerformanceMode(PerformanceMode),
    SetCustom(GestureConfigPatch),
    GetStatus,
}

/// Reply to a command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Response {
    Ok,
    AlreadyActive,
    Prediction { prediction: Option<SmoothedGaze> },
    Status(TrackerStatus),
    Rejected { reason: String },
}

/// Raw gaze sample as received; missing coordinates mean no prediction
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct RawGaze {
    pub x: Option<f64>,
    pub y: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl RawGaze {
    /// Sample with the given fallback timestamp, or None if a coordinate is missing
    pub fn into_sample(self, fallback_timestamp: i64) -> Option<GazeSample> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(GazeSample::new(
                x,
                y,
                self.timestamp.unwrap_or(fallback_timestamp),
            )),
            _ => None,
        }
    }
}

/// One parsed inbound line
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Command(Command),
    Gaze(RawGaze),
}

/// Parse one inbound JSON line.
///
/// Envelopes from any other source and unrecognised objects yield `Ok(None)`.
pub fn parse_inbound(line: &str) -> Result<Option<Inbound>, ControllerError> {
    let value: Value = serde_json::from_str(line)?;

    if value.get("action").is_some() {
        let source = value.get("source").and_then(Value::as_str);
        if source != Some(EXTENSION_SOURCE) {
            debug!("Ignoring message from source {:?}", source);
            return Ok(None);
        }
        let command: Command = serde_json::from_value(value)?;
        return Ok(Some(Inbound::Command(command)));
    }

    if value.get("x").is_some() || value.get("y").is_some() {
        let raw: RawGaze = serde_json::from_value(value)?;
        return Ok(Some(Inbound::Gaze(raw)));
    }

    debug!("Ignoring unrecognised message");
    Ok(None)
}

/// Command wrapped in an accepted envelope
pub fn envelope(command: &Command) -> Result<Value, ControllerError> {
    let mut value = serde_json::to_value(command)?;
    if let Value::Object(map) = &mut value {
        map.insert("source".to_string(), Value::String(EXTENSION_SOURCE.to_string()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(line: &str) -> Command {
        match parse_inbound(line).unwrap() {
            Some(Inbound::Command(command)) => command,
            other => panic!("expected command, got {:?}", other),
        }
    }

    #[test]
    fn test_commands_parse() {
        assert_eq!(
            command(r#"{"source":"webgazer-extension-content","action":"start"}"#),
            Command::Start
        );
        assert_eq!(
            command(r#"{"source":"webgazer-extension-content","action":"stop","value":null}"#),
            Command::Stop
        );
        assert_eq!(
            command(r#"{"source":"webgazer-extension-content","action":"toggleGazeListener","value":null}"#),
            Command::ToggleGazeListener(None)
        );
        assert_eq!(
            command(r#"{"source":"webgazer-extension-content","action":"toggleFilter","value":false}"#),
            Command::ToggleFilter(false)
        );
        assert_eq!(
            command(r#"{"source":"webgazer-extension-content","action":"setPerformanceMode","value":"fast"}"#),
            Command::SetPerformanceMode(PerformanceMode::Fast)
        );
        assert_eq!(
            command(r#"{"source":"webgazer-extension-content","action":"setCustom","value":{"historySize":4}}"#),
            Command::SetCustom(GestureConfigPatch {
                history_size: Some(4),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_foreign_source_ignored() {
        assert_eq!(parse_inbound(r#"{"source":"some-page","action":"stop"}"#).unwrap(), None);
        assert_eq!(parse_inbound(r#"{"action":"stop"}"#).unwrap(), None);
    }

    #[test]
    fn test_unknown_action_is_an_error() {
        assert!(matches!(
            parse_inbound(r#"{"source":"webgazer-extension-content","action":"selfDestruct"}"#),
            Err(ControllerError::Protocol(_))
        ));
        assert!(parse_inbound("not json").is_err());
    }

    #[test]
    fn test_gaze_lines() {
        let parsed = parse_inbound(r#"{"x":100.5,"y":20,"timestamp":1234}"#).unwrap();
        let Some(Inbound::Gaze(raw)) = parsed else {
            panic!("expected gaze sample");
        };
        assert_eq!(raw.into_sample(0), Some(GazeSample::new(100.5, 20.0, 1234)));

        let parsed = parse_inbound(r#"{"x":null,"y":null}"#).unwrap();
        let Some(Inbound::Gaze(raw)) = parsed else {
            panic!("expected gaze sample");
        };
        assert_eq!(raw.into_sample(0), None);
    }

    #[test]
    fn test_missing_timestamp_uses_fallback() {
        let raw = RawGaze { x: Some(1.0), y: Some(2.0), timestamp: None };
        assert_eq!(raw.into_sample(77).map(|s| s.timestamp), Some(77));
    }

    #[test]
    fn test_envelope_round_trip() {
        let value = envelope(&Command::ToggleDebugScreen(true)).unwrap();
        let parsed = parse_inbound(&value.to_string()).unwrap();
        assert_eq!(parsed, Some(Inbound::Command(Command::ToggleDebugScreen(true))));
    }

    #[test]
    fn test_response_wire_format() {
        let json = serde_json::to_value(Response::Rejected { reason: "nope".into() }).unwrap();
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["reason"], "nope");
        assert_eq!(serde_json::to_value(Response::Ok).unwrap()["status"], "ok");
    }
}
