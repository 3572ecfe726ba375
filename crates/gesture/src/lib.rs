//! Facial gesture detection
//!
//! Cheap brightness heuristics over fixed facial regions of each sampled
//! video frame:
//! - Per-eye open/closed transitions
//! - Long blinks (both eyes closed past a threshold)
//! - Mouth openings longer than a debounce, reported on closing
//! - Head nod and shake from the motion of a brightness centroid
//!
//! Regions assume a centered, frontal face. Brightness is not a reliable
//! proxy for eye or mouth state under uneven lighting.

pub mod analysis;
pub mod classifier;
pub mod clock;
pub mod config;
pub mod detector;
pub mod region;
pub mod state;

pub use analysis::{FrameAnalysis, GestureEvent, GestureKind};
pub use classifier::{brightness_backend_factory, BackendFactory, GestureBackend, GestureClassifier};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{approximate_fps, GestureConfig, GestureConfigPatch, PerformanceMode};
pub use state::{EyeSide, HeadPosition};

use frame_capture::{CaptureError, FrameSampler, FrameSource, SampleOutcome};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Gesture detection error types
#[derive(Error, Debug)]
pub enum GestureError {
    #[error("Backend initialization failed: {0}")]
    Backend(String),

    #[error("Frame capture failed: {0}")]
    Capture(#[from] CaptureError),
}

/// Result of one scheduler tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Detector is stopped
    Stopped,
    /// Video source has no frame yet
    NotReady,
    /// Frame skipped by the analysis interval
    Skipped,
    /// Frame could not be read; nothing was analyzed
    CaptureFailed,
    Analyzed(FrameAnalysis),
}

impl TickOutcome {
    pub fn events(&self) -> &[GestureEvent] {
        match self {
            TickOutcome::Analyzed(analysis) => &analysis.events,
            _ => &[],
        }
    }
}

/// Snapshot of detector state for status reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectorStatus {
    pub is_running: bool,
    pub backend: String,
    pub config: GestureConfig,
    pub approximate_fps: u32,
    pub performance_mode: PerformanceMode,
    pub frames_analyzed: u64,
}

/// Frame-driven gesture detector.
///
/// Owns the frame sampler and the gesture backend. The caller drives it by
/// calling [`GestureDetector::tick`] once per display frame with the current
/// video source.
pub struct GestureDetector {
    sampler: FrameSampler,
    backend: Box<dyn GestureBackend>,
    clock: Arc<dyn Clock>,
    running: bool,
    frames_analyzed: u64,
}

impl GestureDetector {
    /// Brightness detector stamped with the system clock
    pub fn new(config: GestureConfig) -> Self {
        Self::with_backend(Box::new(GestureClassifier::new(config)), Arc::new(SystemClock))
    }

    pub fn with_backend(backend: Box<dyn GestureBackend>, clock: Arc<dyn Clock>) -> Self {
        let sampler = FrameSampler::new(backend.config().analysis_interval);
        Self {
            sampler,
            backend,
            clock,
            running: false,
            frames_analyzed: 0,
        }
    }

    pub fn from_factory(
        factory: &BackendFactory,
        config: &GestureConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, GestureError> {
        let backend = factory(config)?;
        info!("Gesture backend '{}' initialized", backend.name());
        Ok(Self::with_backend(backend, clock))
    }

    /// Begin analyzing frames; a running detector is left as is
    pub fn start(&mut self) {
        if self.running {
            debug!("Gesture detector already running");
            return;
        }
        self.running = true;
        info!(
            "Gesture detection started (interval {}, history {})",
            self.sampler.interval(),
            self.backend.config().history_size
        );
    }

    /// Stop analyzing, release the frame buffer and clear transition state
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.sampler.release();
        self.backend.reset();
        info!("Gesture detection stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run one tick; capture failures are logged and treated as a skipped frame
    pub fn tick<S: FrameSource + ?Sized>(&mut self, source: &mut S) -> TickOutcome {
        match self.try_tick(source) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Frame analysis skipped: {}", e);
                TickOutcome::CaptureFailed
            }
        }
    }

    /// Run one tick, surfacing capture failures
    pub fn try_tick<S: FrameSource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> Result<TickOutcome, GestureError> {
        if !self.running {
            return Ok(TickOutcome::Stopped);
        }

        let resized = match self.sampler.sample(source)? {
            SampleOutcome::NotReady => return Ok(TickOutcome::NotReady),
            SampleOutcome::Skipped => return Ok(TickOutcome::Skipped),
            SampleOutcome::Captured { resized } => resized,
        };

        if resized {
            self.backend.invalidate_regions();
        }

        let now = self.clock.now_ms();
        let analysis = self.backend.analyze(self.sampler.buffer(), now);
        self.frames_analyzed += 1;
        Ok(TickOutcome::Analyzed(analysis))
    }

    pub fn config(&self) -> &GestureConfig {
        self.backend.config()
    }

    /// Merge a partial config update; takes effect on the next tick
    pub fn update_config(&mut self, patch: &GestureConfigPatch) {
        self.backend.update_config(patch);
        self.sampler.set_interval(self.backend.config().analysis_interval);
        info!("Gesture config updated: {:?}", patch);
    }

    pub fn set_performance_mode(&mut self, mode: PerformanceMode) {
        info!("Performance mode set to {:?}", mode);
        self.update_config(&mode.patch());
    }

    pub fn status(&self) -> DetectorStatus {
        let interval = self.backend.config().analysis_interval;
        DetectorStatus {
            is_running: self.running,
            backend: self.backend.name().to_string(),
            config: self.backend.config().clone(),
            approximate_fps: approximate_fps(interval),
            performance_mode: PerformanceMode::classify(interval),
            frames_analyzed: self.frames_analyzed,
        }
    }
}

impl std::fmt::Debug for GestureDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureDetector")
            .field("backend", &self.backend.name())
            .field("running", &self.running)
            .field("frames_analyzed", &self.frames_analyzed)
            .finish()
    }
}
