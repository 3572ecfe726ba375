//! Gesture detection configuration

use serde::{Deserialize, Serialize};

/// Gesture detection configuration.
///
/// Field names serialize to the camelCase option names used by the control
/// protocol; snake_case names are accepted on input so settings files and
/// environment overrides can use them. Values are never validated;
/// out-of-range thresholds simply make a detector fire always or never.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GestureConfig {
    /// Both eyes must stay closed longer than this for a long blink (milliseconds)
    #[serde(alias = "long_blink_threshold")]
    pub long_blink_threshold: i64,

    /// Left eye region brightness below this counts as closed (0-1)
    #[serde(alias = "left_eye_threshold")]
    pub left_eye_threshold: f64,

    /// Right eye region brightness below this counts as closed (0-1)
    #[serde(alias = "right_eye_threshold")]
    pub right_eye_threshold: f64,

    /// Both-eyes brightness threshold (not used by the brightness classifier)
    #[serde(alias = "both_eyes_threshold")]
    pub both_eyes_threshold: f64,

    /// Mouth region brightness below this counts as open (0-1)
    #[serde(alias = "mouth_open_threshold")]
    pub mouth_open_threshold: f64,

    /// Head centroid displacement for a nod or shake (frame pixels, not viewport pixels)
    #[serde(alias = "head_shake_threshold")]
    pub head_shake_threshold: f64,

    /// Head position history length (samples)
    #[serde(alias = "history_size")]
    pub history_size: usize,

    /// Analyze one frame every N ticks
    #[serde(alias = "analysis_interval")]
    pub analysis_interval: u32,

    /// Probability of emitting a diagnostic record per analyzed frame (0-1)
    #[serde(alias = "debug_log_rate")]
    pub debug_log_rate: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            long_blink_threshold: 800,
            left_eye_threshold: 0.25,
            right_eye_threshold: 0.25,
            both_eyes_threshold: 0.25,
            mouth_open_threshold: 0.4,
            head_shake_threshold: 15.0,
            history_size: 8,
            analysis_interval: 2,
            debug_log_rate: 0.001,
        }
    }
}

impl GestureConfig {
    /// Shallow-merge a partial update into this config
    pub fn apply(&mut self, patch: &GestureConfigPatch) {
        patch.apply_to(self);
    }

    /// Config with a performance preset applied on top of the defaults
    pub fn with_mode(mode: PerformanceMode) -> Self {
        let mut config = Self::default();
        config.apply(&mode.patch());
        config
    }
}

/// Partial configuration update; absent fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GestureConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_blink_threshold: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_eye_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_eye_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub both_eyes_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mouth_open_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_shake_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_log_rate: Option<f64>,
}

impl GestureConfigPatch {
    /// Patch that replaces every field
    pub fn full(config: &GestureConfig) -> Self {
        Self {
            long_blink_threshold: Some(config.long_blink_threshold),
            left_eye_threshold: Some(config.left_eye_threshold),
            right_eye_threshold: Some(config.right_eye_threshold),
            both_eyes_threshold: Some(config.both_eyes_threshold),
            mouth_open_threshold: Some(config.mouth_open_threshold),
            head_shake_threshold: Some(config.head_shake_threshold),
            history_size: Some(config.history_size),
            analysis_interval: Some(config.analysis_interval),
            debug_log_rate: Some(config.debug_log_rate),
        }
    }

    pub fn apply_to(&self, config: &mut GestureConfig) {
        if let Some(v) = self.long_blink_threshold {
            config.long_blink_threshold = v;
        }
        if let Some(v) = self.left_eye_threshold {
            config.left_eye_threshold = v;
        }
        if let Some(v) = self.right_eye_threshold {
            config.right_eye_threshold = v;
        }
        if let Some(v) = self.both_eyes_threshold {
            config.both_eyes_threshold = v;
        }
        if let Some(v) = self.mouth_open_threshold {
            config.mouth_open_threshold = v;
        }
        if let Some(v) = self.head_shake_threshold {
            config.head_shake_threshold = v;
        }
        if let Some(v) = self.history_size {
            config.history_size = v;
        }
        if let Some(v) = self.analysis_interval {
            config.analysis_interval = v;
        }
        if let Some(v) = self.debug_log_rate {
            config.debug_log_rate = v;
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Display refresh rate assumed when reporting analysis rates
pub const NOMINAL_DISPLAY_FPS: u32 = 60;

/// Speed/accuracy presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceMode {
    /// Every 3rd frame, short history, no diagnostics (~20 fps)
    Fast,
    /// Every 2nd frame (~30 fps)
    Balanced,
    /// Every frame, long history (~60 fps)
    Accurate,
}

impl PerformanceMode {
    /// The (analysisInterval, historySize, debugLogRate) triple for this preset
    pub fn patch(self) -> GestureConfigPatch {
        let (interval, history, rate) = match self {
            PerformanceMode::Fast => (3, 5, 0.0),
            PerformanceMode::Balanced => (2, 6, 0.001),
            PerformanceMode::Accurate => (1, 10, 0.005),
        };
        GestureConfigPatch {
            analysis_interval: Some(interval),
            history_size: Some(history),
            debug_log_rate: Some(rate),
            ..Default::default()
        }
    }

    /// Classify an analysis interval by its approximate analysis rate
    pub fn classify(analysis_interval: u32) -> Self {
        let fps = approximate_fps(analysis_interval);
        if fps > 50 {
            PerformanceMode::Accurate
        } else if fps > 25 {
            PerformanceMode::Balanced
        } else {
            PerformanceMode::Fast
        }
    }
}

/// Approximate analyzed frames per second at the nominal display rate.
///
/// An interval of 0 never analyzes, so it reports 0.
pub fn approximate_fps(analysis_interval: u32) -> u32 {
    if analysis_interval == 0 {
        return 0;
    }
    (NOMINAL_DISPLAY_FPS as f64 / analysis_interval as f64).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_update_is_shallow_merge() {
        let mut config = GestureConfig::default();
        let patch = GestureConfigPatch {
            mouth_open_threshold: Some(0.3),
            history_size: Some(12),
            ..Default::default()
        };
        config.apply(&patch);

        assert_eq!(config.mouth_open_threshold, 0.3);
        assert_eq!(config.history_size, 12);
        assert_eq!(config.long_blink_threshold, 800);
        assert_eq!(config.analysis_interval, 2);
    }

    #[test]
    fn test_out_of_range_values_accepted() {
        let mut config = GestureConfig::default();
        config.apply(&GestureConfigPatch {
            left_eye_threshold: Some(-1.0),
            long_blink_threshold: Some(-50),
            ..Default::default()
        });
        assert_eq!(config.left_eye_threshold, -1.0);
        assert_eq!(config.long_blink_threshold, -50);
    }

    #[test]
    fn test_presets() {
        let fast = GestureConfig::with_mode(PerformanceMode::Fast);
        assert_eq!((fast.analysis_interval, fast.history_size), (3, 5));
        assert_eq!(fast.debug_log_rate, 0.0);

        let balanced = GestureConfig::with_mode(PerformanceMode::Balanced);
        assert_eq!((balanced.analysis_interval, balanced.history_size), (2, 6));

        let accurate = GestureConfig::with_mode(PerformanceMode::Accurate);
        assert_eq!((accurate.analysis_interval, accurate.history_size), (1, 10));
        assert_eq!(accurate.debug_log_rate, 0.005);

        // Thresholds untouched by presets
        assert_eq!(accurate.mouth_open_threshold, 0.4);
    }

    #[test]
    fn test_classify_by_rate() {
        assert_eq!(PerformanceMode::classify(1), PerformanceMode::Accurate);
        assert_eq!(PerformanceMode::classify(2), PerformanceMode::Balanced);
        assert_eq!(PerformanceMode::classify(3), PerformanceMode::Fast);
        assert_eq!(PerformanceMode::classify(0), PerformanceMode::Fast);
        assert_eq!(approximate_fps(3), 20);
        assert_eq!(approximate_fps(4), 15);
    }

    #[test]
    fn test_patch_deserializes_camel_case_subset() {
        let patch: GestureConfigPatch =
            serde_json::from_str(r#"{"analysisInterval": 4, "headShakeThreshold": 20}"#).unwrap();
        assert_eq!(patch.analysis_interval, Some(4));
        assert_eq!(patch.head_shake_threshold, Some(20.0));
        assert!(patch.history_size.is_none());
        assert!(!patch.is_empty());
        assert!(GestureConfigPatch::default().is_empty());
    }

    #[test]
    fn test_full_patch_round_trips_config() {
        let source = GestureConfig::with_mode(PerformanceMode::Accurate);
        let mut target = GestureConfig::default();
        target.apply(&GestureConfigPatch::full(&source));
        assert_eq!(target, source);
    }
}
