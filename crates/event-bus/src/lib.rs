//! Tracker event bus
//!
//! Everything the tracker produces is published as a [`TrackerEvent`]:
//! - Smoothed gaze points
//! - Gesture events
//! - Tracking lifecycle and feature toggles
//!
//! Consumers (overlay, relay, debug panel) subscribe independently; the
//! producer never knows who is listening.

mod bus;
mod stream;

pub use bus::{EventBus, Subscription, DEFAULT_CAPACITY};
pub use stream::GazeDataStream;

use gaze_filter::SmoothedGaze;
use gesture::{GestureConfig, GestureEvent};
use serde::{Deserialize, Serialize};

/// Features that can be switched on and off at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    GazeListener,
    Filter,
    FaceTriggers,
    Video,
    Points,
    DebugScreen,
}

/// Event published by the tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum TrackerEvent {
    TrackingStarted,
    TrackingStopped,
    Gaze(SmoothedGaze),
    Gesture(GestureEvent),
    FeatureToggled { feature: Feature, enabled: bool },
    CalibrationStarted,
    ConfigUpdated(GestureConfig),
}

impl TrackerEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            TrackerEvent::TrackingStarted => "trackingStarted",
            TrackerEvent::TrackingStopped => "trackingStopped",
            TrackerEvent::Gaze(_) => "gaze",
            TrackerEvent::Gesture(_) => "gesture",
            TrackerEvent::FeatureToggled { .. } => "featureToggled",
            TrackerEvent::CalibrationStarted => "calibrationStarted",
            TrackerEvent::ConfigUpdated(_) => "configUpdated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gesture::GestureKind;

    #[test]
    fn test_gaze_event_wire_format() {
        let event = TrackerEvent::Gaze(SmoothedGaze {
            x: 10.0,
            y: 20.0,
            raw_x: 12.0,
            raw_y: 18.0,
            timestamp: 99,
            filtered: true,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "gaze");
        assert_eq!(json["data"]["rawX"], 12.0);
        assert_eq!(json["data"]["filtered"], true);
    }

    #[test]
    fn test_gesture_event_wire_format() {
        let event = TrackerEvent::Gesture(GestureEvent {
            gesture: GestureKind::MouthOpen { duration: 650 },
            timestamp: 7,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "gesture");
        assert_eq!(json["data"]["gesture"]["type"], "mouthOpen");
        assert_eq!(json["data"]["gesture"]["duration"], 650);
    }

    #[test]
    fn test_names_match_tags() {
        for event in [
            TrackerEvent::TrackingStarted,
            TrackerEvent::CalibrationStarted,
            TrackerEvent::FeatureToggled { feature: Feature::DebugScreen, enabled: true },
            TrackerEvent::ConfigUpdated(GestureConfig::default()),
        ] {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["event"], event.name());
        }
    }

    #[test]
    fn test_feature_toggle_round_trip() {
        let json = r#"{"event":"featureToggled","data":{"feature":"faceTriggers","enabled":false}}"#;
        let event: TrackerEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            TrackerEvent::FeatureToggled { feature: Feature::FaceTriggers, enabled: false }
        );
    }
}
