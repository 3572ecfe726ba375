//! Brightness-heuristic gesture classifier

use crate::analysis::{FrameAnalysis, GestureEvent};
use crate::config::{GestureConfig, GestureConfigPatch};
use crate::detector::{EyeDetector, HeadMovementDetector, LongBlinkTimer, MouthDetector};
use crate::region::{average_brightness, brightness_centroid, RegionCache, EYE_SAMPLE_STRIDE};
use crate::state::{EyeSide, HeadPosition};
use crate::GestureError;
use frame_capture::PixelBuffer;
use std::sync::Arc;
use tracing::info;

/// Turns captured frames into gesture events.
///
/// Implementations keep their own transition state between frames.
pub trait GestureBackend: Send {
    fn name(&self) -> &str;

    fn analyze(&mut self, frame: &PixelBuffer, now: i64) -> FrameAnalysis;

    fn config(&self) -> &GestureConfig;

    fn update_config(&mut self, patch: &GestureConfigPatch);

    /// Forget cached geometry after the frame size changes
    fn invalidate_regions(&mut self);

    /// Clear all transition state
    fn reset(&mut self);
}

/// Builds a backend from a configuration
pub type BackendFactory =
    Arc<dyn Fn(&GestureConfig) -> Result<Box<dyn GestureBackend>, GestureError> + Send + Sync>;

/// Factory for the built-in brightness classifier
pub fn brightness_backend_factory() -> BackendFactory {
    Arc::new(
        |config: &GestureConfig| -> Result<Box<dyn GestureBackend>, GestureError> {
            Ok(Box::new(GestureClassifier::new(config.clone())))
        },
    )
}

/// Region-brightness classifier.
///
/// Eyes are closed when their region is darker than the eye threshold, the
/// mouth is open when its region is darker than the mouth threshold, and the
/// head position is the brightness centroid of the central region.
#[derive(Debug)]
pub struct GestureClassifier {
    config: GestureConfig,
    regions: RegionCache,
    left_eye: EyeDetector,
    right_eye: EyeDetector,
    long_blink: LongBlinkTimer,
    mouth: MouthDetector,
    head: HeadMovementDetector,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            regions: RegionCache::new(),
            left_eye: EyeDetector::new(EyeSide::Left),
            right_eye: EyeDetector::new(EyeSide::Right),
            long_blink: LongBlinkTimer::new(),
            mouth: MouthDetector::new(),
            head: HeadMovementDetector::new(config.history_size),
            config,
        }
    }

    pub fn head(&self) -> &HeadMovementDetector {
        &self.head
    }

    pub fn left_eye(&self) -> &EyeDetector {
        &self.left_eye
    }

    pub fn right_eye(&self) -> &EyeDetector {
        &self.right_eye
    }
}

impl GestureBackend for GestureClassifier {
    fn name(&self) -> &str {
        "brightness"
    }

    fn analyze(&mut self, frame: &PixelBuffer, now: i64) -> FrameAnalysis {
        let bounds = self.regions.bounds(frame.width(), frame.height());
        let mut gestures = Vec::new();

        let left = average_brightness(frame, &bounds.left_eye, EYE_SAMPLE_STRIDE);
        let right = average_brightness(frame, &bounds.right_eye, EYE_SAMPLE_STRIDE);
        let left_closed = left < self.config.left_eye_threshold;
        let right_closed = right < self.config.right_eye_threshold;

        gestures.extend(self.left_eye.update(left_closed, now));
        gestures.extend(self.right_eye.update(right_closed, now));
        gestures.extend(self.long_blink.update(
            left_closed && right_closed,
            now,
            self.config.long_blink_threshold,
        ));

        let mouth = average_brightness(frame, &bounds.mouth, 1);
        gestures.extend(self.mouth.update(mouth < self.config.mouth_open_threshold, now));

        let head_position = brightness_centroid(frame, &bounds.head_center)
            .map(|(x, y)| HeadPosition { x, y, timestamp: now });
        if let Some(position) = head_position {
            gestures.extend(self.head.update(position, self.config.head_shake_threshold));
        }

        let events: Vec<GestureEvent> = gestures
            .into_iter()
            .map(|gesture| GestureEvent { gesture, timestamp: now })
            .collect();
        for event in &events {
            info!("Gesture detected: {}", event.gesture);
        }

        FrameAnalysis {
            timestamp: now,
            left_eye_brightness: left,
            right_eye_brightness: right,
            mouth_brightness: mouth,
            head_position,
            events,
        }
    }

    fn config(&self) -> &GestureConfig {
        &self.config
    }

    fn update_config(&mut self, patch: &GestureConfigPatch) {
        self.config.apply(patch);
        self.head.set_history_size(self.config.history_size);
    }

    fn invalidate_regions(&mut self) {
        self.regions.invalidate();
    }

    fn reset(&mut self) {
        self.left_eye.reset();
        self.right_eye.reset();
        self.long_blink.reset();
        self.mouth.reset();
        self.head.reset();
    }
}
