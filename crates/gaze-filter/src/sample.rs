//! Gaze sample types

use serde::{Deserialize, Serialize};

/// One raw prediction from the gaze engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeSample {
    pub x: f64,
    pub y: f64,
    /// Wall-clock timestamp (milliseconds)
    pub timestamp: i64,
}

impl GazeSample {
    pub fn new(x: f64, y: f64, timestamp: i64) -> Self {
        Self { x, y, timestamp }
    }

    pub fn point(&self) -> GazePoint {
        GazePoint { x: self.x, y: self.y }
    }
}

/// A screen coordinate
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GazePoint {
    pub x: f64,
    pub y: f64,
}

/// Output of the smoother for one raw sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmoothedGaze {
    pub x: f64,
    pub y: f64,
    pub raw_x: f64,
    pub raw_y: f64,
    pub timestamp: i64,
    /// Whether the weighted filter was applied
    pub filtered: bool,
}

impl SmoothedGaze {
    pub fn point(&self) -> GazePoint {
        GazePoint { x: self.x, y: self.y }
    }
}
