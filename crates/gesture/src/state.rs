//! Per-feature tracking state

use serde::{Deserialize, Serialize};

/// Which eye
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EyeSide {
    Left,
    Right,
}

impl EyeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            EyeSide::Left => "left",
            EyeSide::Right => "right",
        }
    }
}

/// Eye openness as seen on the last analyzed frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EyeOpenness {
    #[default]
    Open,
    Closed,
}

/// One eye's state machine memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EyeState {
    pub openness: EyeOpenness,
    /// Timestamp of the last open/closed transition
    pub last_change: Option<i64>,
    /// Set while the eye is closed
    pub closed_since: Option<i64>,
}

impl EyeState {
    pub fn is_closed(&self) -> bool {
        self.openness == EyeOpenness::Closed
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Mouth state machine memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MouthState {
    pub open: bool,
    /// Set while the mouth is open
    pub opened_since: Option<i64>,
}

impl MouthState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Brightness-weighted centroid of the head region, in frame pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadPosition {
    pub x: f64,
    pub y: f64,
    pub timestamp: i64,
}

/// Mean displacement between the newest and oldest head samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadMovement {
    pub delta_x: f64,
    pub delta_y: f64,
}

impl HeadMovement {
    /// Dominantly horizontal motion past the threshold
    pub fn is_shake(&self, threshold: f64) -> bool {
        self.delta_x > threshold && self.delta_x > self.delta_y * 2.0
    }

    /// Dominantly vertical motion past the threshold
    pub fn is_nod(&self, threshold: f64) -> bool {
        self.delta_y > threshold && self.delta_y > self.delta_x * 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_exclusivity() {
        let horizontal = HeadMovement { delta_x: 20.0, delta_y: 5.0 };
        assert!(horizontal.is_shake(15.0));
        assert!(!horizontal.is_nod(15.0));

        let vertical = HeadMovement { delta_x: 5.0, delta_y: 20.0 };
        assert!(vertical.is_nod(15.0));
        assert!(!vertical.is_shake(15.0));

        let diagonal = HeadMovement { delta_x: 20.0, delta_y: 15.0 };
        assert!(!diagonal.is_shake(15.0));
        assert!(!diagonal.is_nod(15.0));
    }

    #[test]
    fn test_threshold_is_strict() {
        let movement = HeadMovement { delta_x: 15.0, delta_y: 0.0 };
        assert!(!movement.is_shake(15.0));
    }
}
