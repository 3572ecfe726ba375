//! Gaze smoother with an on/off switch

use crate::filter::WeightedAverageFilter;
use crate::sample::{GazePoint, GazeSample, SmoothedGaze};
use tracing::{debug, info};

/// Stabilizes raw gaze predictions.
///
/// When disabled, samples pass through unmodified and nothing is buffered.
#[derive(Debug, Clone)]
pub struct GazeSmoother {
    filter: WeightedAverageFilter,
    enabled: bool,
}

impl GazeSmoother {
    /// Create an enabled smoother
    pub fn new() -> Self {
        Self {
            filter: WeightedAverageFilter::new(),
            enabled: true,
        }
    }

    /// Smooth one raw coordinate pair
    pub fn observe(&mut self, raw_x: f64, raw_y: f64) -> GazePoint {
        self.observe_sample(GazeSample::new(raw_x, raw_y, 0)).point()
    }

    /// Smooth one timestamped sample
    pub fn observe_sample(&mut self, sample: GazeSample) -> SmoothedGaze {
        let point = if self.enabled {
            self.filter.filter(sample)
        } else {
            sample.point()
        };

        SmoothedGaze {
            x: point.x,
            y: point.y,
            raw_x: sample.x,
            raw_y: sample.y,
            timestamp: sample.timestamp,
            filtered: self.enabled,
        }
    }

    /// Smooth a sample that may be missing; a missing sample changes nothing
    pub fn observe_optional(&mut self, sample: Option<GazeSample>) -> Option<SmoothedGaze> {
        match sample {
            Some(sample) => Some(self.observe_sample(sample)),
            None => {
                debug!("Ignoring missing gaze sample");
                None
            }
        }
    }

    /// Enable or disable smoothing; disabling clears the buffer immediately
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.filter.reset();
        }
        info!("Gaze filter {}", if enabled { "enabled" } else { "disabled" });
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of samples currently buffered
    pub fn buffered(&self) -> usize {
        self.filter.len()
    }

    /// Empty the buffer without changing the enabled state
    pub fn clear(&mut self) {
        self.filter.reset();
    }
}

impl Default for GazeSmoother {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disable_clears_and_passes_through() {
        let mut smoother = GazeSmoother::new();
        smoother.observe(100.0, 100.0);
        smoother.observe(200.0, 200.0);
        assert_eq!(smoother.buffered(), 2);

        smoother.set_enabled(false);
        assert_eq!(smoother.buffered(), 0);

        let out = smoother.observe(10.0, 20.0);
        assert_eq!(out, GazePoint { x: 10.0, y: 20.0 });
        assert_eq!(smoother.buffered(), 0);
    }

    #[test]
    fn test_re_enable_starts_from_empty_buffer() {
        let mut smoother = GazeSmoother::new();
        smoother.observe(500.0, 500.0);
        smoother.set_enabled(false);
        smoother.set_enabled(true);

        // No memory of the sample seen before disabling
        let out = smoother.observe(10.0, 10.0);
        assert_eq!(out, GazePoint { x: 10.0, y: 10.0 });
    }

    #[test]
    fn test_missing_sample_is_ignored() {
        let mut smoother = GazeSmoother::new();
        smoother.observe(1.0, 1.0);

        assert!(smoother.observe_optional(None).is_none());
        assert_eq!(smoother.buffered(), 1);
    }

    #[test]
    fn test_payload_carries_raw_values() {
        let mut smoother = GazeSmoother::new();
        smoother.observe_sample(GazeSample::new(90.0, 0.0, 1));
        let out = smoother.observe_sample(GazeSample::new(100.0, 0.0, 2));

        assert_eq!(out.raw_x, 100.0);
        assert_eq!(out.timestamp, 2);
        assert!(out.filtered);
        assert!(out.x < 100.0 && out.x > 90.0);
    }

    #[test]
    fn test_clear_keeps_enabled_state() {
        let mut smoother = GazeSmoother::new();
        smoother.observe(1.0, 1.0);
        smoother.clear();
        assert!(smoother.is_enabled());
        assert_eq!(smoother.buffered(), 0);
    }
}
