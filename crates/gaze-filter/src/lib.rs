//! Gaze Smoothing
//!
//! Stabilizes the raw (x, y) predictions of the external gaze engine with a
//! recency-weighted average over the last few samples.

mod filter;
mod sample;
mod smoother;

pub use filter::{WeightedAverageFilter, BUFFER_SIZE, FILTER_WEIGHTS};
pub use sample::{GazePoint, GazeSample, SmoothedGaze};
pub use smoother::GazeSmoother;
