//! Gesture events and per-frame analysis results

use crate::state::{EyeSide, HeadPosition};
use serde::{Deserialize, Serialize};

/// Detected gesture; durations are in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GestureKind {
    LeftEyeClosed,
    LeftEyeOpened { duration: i64 },
    RightEyeClosed,
    RightEyeOpened { duration: i64 },
    LongBlink { duration: i64 },
    /// Mouth closed after staying open longer than the debounce
    MouthOpen { duration: i64 },
    Nod,
    ShakeHead,
}

impl GestureKind {
    pub fn eye_closed(side: EyeSide) -> Self {
        match side {
            EyeSide::Left => GestureKind::LeftEyeClosed,
            EyeSide::Right => GestureKind::RightEyeClosed,
        }
    }

    pub fn eye_opened(side: EyeSide, duration: i64) -> Self {
        match side {
            EyeSide::Left => GestureKind::LeftEyeOpened { duration },
            EyeSide::Right => GestureKind::RightEyeOpened { duration },
        }
    }

    /// Wire name of the gesture
    pub fn name(&self) -> &'static str {
        match self {
            GestureKind::LeftEyeClosed => "leftEyeClosed",
            GestureKind::LeftEyeOpened { .. } => "leftEyeOpened",
            GestureKind::RightEyeClosed => "rightEyeClosed",
            GestureKind::RightEyeOpened { .. } => "rightEyeOpened",
            GestureKind::LongBlink { .. } => "longBlink",
            GestureKind::MouthOpen { .. } => "mouthOpen",
            GestureKind::Nod => "nod",
            GestureKind::ShakeHead => "shakeHead",
        }
    }

    pub fn duration(&self) -> Option<i64> {
        match self {
            GestureKind::LeftEyeOpened { duration }
            | GestureKind::RightEyeOpened { duration }
            | GestureKind::LongBlink { duration }
            | GestureKind::MouthOpen { duration } => Some(*duration),
            _ => None,
        }
    }
}

impl std::fmt::Display for GestureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.duration() {
            Some(ms) => write!(f, "{} ({}ms)", self.name(), ms),
            None => f.write_str(self.name()),
        }
    }
}

/// A gesture stamped with the wall-clock time of the frame that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureEvent {
    pub gesture: GestureKind,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// Everything measured on one analyzed frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameAnalysis {
    pub timestamp: i64,
    pub left_eye_brightness: f64,
    pub right_eye_brightness: f64,
    pub mouth_brightness: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_position: Option<HeadPosition>,
    /// Events in detection order: eyes, long blink, mouth, head
    pub events: Vec<GestureEvent>,
}

impl FrameAnalysis {
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn gestures(&self) -> impl Iterator<Item = GestureKind> + '_ {
        self.events.iter().map(|e| e.gesture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_format() {
        let event = GestureEvent {
            gesture: GestureKind::LongBlink { duration: 900 },
            timestamp: 1_700_000_000_000,
        };
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["gesture"]["type"], "longBlink");
        assert_eq!(json["gesture"]["duration"], 900);
        assert_eq!(json["timestamp"], 1_700_000_000_000i64);

        let nod = serde_json::to_value(GestureKind::Nod).unwrap();
        assert_eq!(nod, serde_json::json!({ "type": "nod" }));
    }

    #[test]
    fn test_names_match_wire_tags() {
        for kind in [
            GestureKind::LeftEyeClosed,
            GestureKind::RightEyeOpened { duration: 10 },
            GestureKind::MouthOpen { duration: 600 },
            GestureKind::ShakeHead,
        ] {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json["type"], kind.name());
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(GestureKind::MouthOpen { duration: 600 }.to_string(), "mouthOpen (600ms)");
        assert_eq!(GestureKind::Nod.to_string(), "nod");
    }
}
