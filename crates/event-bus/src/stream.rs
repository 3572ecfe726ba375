//! Latest-value view of the event stream

use crate::TrackerEvent;
use gaze_filter::SmoothedGaze;
use gesture::GestureEvent;
use serde::Serialize;

/// Most recent gaze point and gesture, folded from bus events
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GazeDataStream {
    current_gaze: Option<SmoothedGaze>,
    last_gesture: Option<GestureEvent>,
    /// Timestamp of the newest gaze point or gesture
    last_update: Option<i64>,
    is_tracking: bool,
}

impl GazeDataStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the aggregate
    pub fn apply(&mut self, event: &TrackerEvent) {
        match event {
            TrackerEvent::Gaze(gaze) => {
                self.current_gaze = Some(*gaze);
                self.last_update = Some(gaze.timestamp);
            }
            TrackerEvent::Gesture(gesture) => {
                self.last_gesture = Some(*gesture);
                self.last_update = Some(gesture.timestamp);
            }
            TrackerEvent::TrackingStarted => self.is_tracking = true,
            TrackerEvent::TrackingStopped => self.is_tracking = false,
            _ => {}
        }
    }

    pub fn current_gaze(&self) -> Option<&SmoothedGaze> {
        self.current_gaze.as_ref()
    }

    pub fn last_gesture(&self) -> Option<&GestureEvent> {
        self.last_gesture.as_ref()
    }

    pub fn last_update(&self) -> Option<i64> {
        self.last_update
    }

    pub fn is_tracking(&self) -> bool {
        self.is_tracking
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gesture::GestureKind;

    fn gaze(x: f64, timestamp: i64) -> TrackerEvent {
        TrackerEvent::Gaze(SmoothedGaze {
            x,
            y: 0.0,
            raw_x: x,
            raw_y: 0.0,
            timestamp,
            filtered: false,
        })
    }

    #[test]
    fn test_tracks_latest_values() {
        let mut stream = GazeDataStream::new();
        stream.apply(&TrackerEvent::TrackingStarted);
        stream.apply(&gaze(1.0, 10));
        stream.apply(&gaze(2.0, 20));
        stream.apply(&TrackerEvent::Gesture(GestureEvent {
            gesture: GestureKind::Nod,
            timestamp: 25,
        }));

        assert!(stream.is_tracking());
        assert_eq!(stream.current_gaze().map(|g| g.x), Some(2.0));
        assert_eq!(stream.last_gesture().map(|g| g.gesture), Some(GestureKind::Nod));
        assert_eq!(stream.last_update(), Some(25));

        stream.apply(&TrackerEvent::TrackingStopped);
        assert!(!stream.is_tracking());
        // Last values survive a stop
        assert!(stream.current_gaze().is_some());
    }

    #[test]
    fn test_reset() {
        let mut stream = GazeDataStream::new();
        stream.apply(&gaze(1.0, 10));
        stream.reset();
        assert_eq!(stream, GazeDataStream::default());
    }

    #[test]
    fn test_json_shape() {
        let mut stream = GazeDataStream::new();
        stream.apply(&TrackerEvent::TrackingStarted);
        stream.apply(&gaze(5.0, 3));

        let json = serde_json::to_value(&stream).unwrap();
        assert_eq!(json["isTracking"], true);
        assert_eq!(json["currentGaze"]["x"], 5.0);
        assert_eq!(json["lastUpdate"], 3);
        assert!(json["lastGesture"].is_null());
    }
}
