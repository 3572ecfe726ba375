//! Weighted Average Filter for Gaze Stabilization

use crate::sample::{GazePoint, GazeSample};
use sample_window::SlidingWindow;

/// Number of recent samples kept by the filter
pub const BUFFER_SIZE: usize = 6;

/// Per-position weights, newest first
pub const FILTER_WEIGHTS: [f64; BUFFER_SIZE] = [0.4, 0.25, 0.15, 0.1, 0.06, 0.04];

/// Recency-weighted average over the last [`BUFFER_SIZE`] samples
#[derive(Debug, Clone)]
pub struct WeightedAverageFilter {
    buffer: SlidingWindow<GazeSample>,
}

impl WeightedAverageFilter {
    pub fn new() -> Self {
        Self {
            buffer: SlidingWindow::new(BUFFER_SIZE),
        }
    }

    /// Add a sample and get the filtered output
    pub fn filter(&mut self, sample: GazeSample) -> GazePoint {
        self.buffer.push(sample);
        self.weighted_average().unwrap_or(sample.point())
    }

    /// Weighted average of the buffered samples.
    ///
    /// During warm-up only the weights of the occupied positions are summed,
    /// so the result is renormalized instead of pulled toward zero. Falls back
    /// to the newest sample when the used weights sum to zero.
    pub fn weighted_average(&self) -> Option<GazePoint> {
        let newest = self.buffer.newest()?;

        let mut total_x = 0.0;
        let mut total_y = 0.0;
        let mut total_weight = 0.0;

        for (sample, weight) in self.buffer.iter_newest_first().zip(FILTER_WEIGHTS.iter()) {
            total_x += sample.x * weight;
            total_y += sample.y * weight;
            total_weight += weight;
        }

        if total_weight > 0.0 {
            Some(GazePoint {
                x: total_x / total_weight,
                y: total_y / total_weight,
            })
        } else {
            Some(newest.point())
        }
    }

    /// Buffered samples, newest first
    pub fn samples(&self) -> impl Iterator<Item = &GazeSample> {
        self.buffer.iter_newest_first()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Reset the filter
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

impl Default for WeightedAverageFilter {
    fn default() -> Self {
        Self::new()
    }
}
