//! Page-context tracker state

use crate::protocol::{Command, RawGaze, Response};
use crate::settings::Settings;
use crate::ControllerError;
use diagnostics::{Diagnostics, RateMeter};
use event_bus::{EventBus, Feature, GazeDataStream, TrackerEvent};
use frame_capture::FrameSource;
use gaze_filter::{GazeSample, GazeSmoother, SmoothedGaze};
use gesture::{
    approximate_fps, brightness_backend_factory, BackendFactory, Clock, GestureConfig,
    GestureConfigPatch, GestureDetector, GestureEvent, PerformanceMode, SystemClock, TickOutcome,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Snapshot returned by `getStatus`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerStatus {
    pub initialized: bool,
    pub listener_active: bool,
    pub filter_enabled: bool,
    pub face_triggers_enabled: bool,
    pub detector_running: bool,
    pub debug_enabled: bool,
    pub video_visible: bool,
    pub points_visible: bool,
    pub performance_mode: PerformanceMode,
    /// Expected analysis rate from the analysis interval
    pub approximate_fps: u32,
    /// Measured gaze updates per second
    pub update_rate: u32,
    pub config: GestureConfig,
    pub current_gaze: Option<SmoothedGaze>,
    pub last_gesture: Option<GestureEvent>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Flags {
    initialized: bool,
    listener_active: bool,
    face_triggers: bool,
    debug_screen: bool,
    video: bool,
    points: bool,
}

/// Owns everything the page context holds between ticks: the gaze smoother,
/// the gesture detector while it runs, feature flags, and the event bus.
///
/// All methods run on one task; nothing here is shared or locked.
pub struct Tracker {
    config: GestureConfig,
    smoother: GazeSmoother,
    detector: Option<GestureDetector>,
    factory: BackendFactory,
    clock: Arc<dyn Clock>,
    bus: EventBus,
    stream: GazeDataStream,
    diagnostics: Diagnostics,
    gaze_rate: RateMeter,
    flags: Flags,
}

impl Tracker {
    pub fn new(settings: &Settings, bus: EventBus) -> Self {
        Self::with_parts(
            settings,
            bus,
            brightness_backend_factory(),
            Arc::new(SystemClock),
            Diagnostics::default(),
        )
    }

    pub fn with_parts(
        settings: &Settings,
        bus: EventBus,
        factory: BackendFactory,
        clock: Arc<dyn Clock>,
        diagnostics: Diagnostics,
    ) -> Self {
        let mut smoother = GazeSmoother::new();
        if !settings.smoothing {
            smoother.set_enabled(false);
        }

        Self {
            config: settings.gestures.clone(),
            smoother,
            detector: None,
            factory,
            clock,
            bus,
            stream: GazeDataStream::new(),
            diagnostics,
            gaze_rate: RateMeter::new(Instant::now().into_std()),
            flags: Flags {
                face_triggers: settings.face_triggers,
                points: true,
                ..Default::default()
            },
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn stream(&self) -> &GazeDataStream {
        &self.stream
    }

    pub fn is_initialized(&self) -> bool {
        self.flags.initialized
    }

    pub fn detector(&self) -> Option<&GestureDetector> {
        self.detector.as_ref()
    }

    /// Handle one command; failures become a rejected response
    pub fn handle(&mut self, command: Command) -> Response {
        debug!("Handling command {:?}", command);
        match self.try_handle(command) {
            Ok(response) => response,
            Err(e) => {
                warn!("Command rejected: {}", e);
                Response::Rejected {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn try_handle(&mut self, command: Command) -> Result<Response, ControllerError> {
        match command {
            Command::Start => return Ok(self.start()),
            Command::Stop => {
                self.require_initialized()?;
                self.stop();
            }
            Command::ToggleVideo(visible) => {
                self.require_initialized()?;
                self.flags.video = visible;
                self.publish_toggle(Feature::Video, visible);
            }
            Command::TogglePoints(visible) => {
                self.require_initialized()?;
                self.flags.points = visible;
                self.publish_toggle(Feature::Points, visible);
            }
            Command::ToggleGazeListener(value) => {
                self.require_initialized()?;
                let active = value.unwrap_or(!self.flags.listener_active);
                self.flags.listener_active = active;
                info!("Gaze listener {}", if active { "activated" } else { "deactivated" });
                self.publish_toggle(Feature::GazeListener, active);
            }
            Command::GetCurrentPrediction => {
                self.require_initialized()?;
                return Ok(Response::Prediction {
                    prediction: self.current_prediction(),
                });
            }
            Command::StartCalibration => {
                self.require_initialized()?;
                info!("Calibration started");
                self.publish(TrackerEvent::CalibrationStarted);
            }
            Command::ToggleFilter(enabled) => {
                self.smoother.set_enabled(enabled);
                self.publish_toggle(Feature::Filter, enabled);
            }
            Command::ClearFilterBuffer => {
                self.smoother.clear();
                info!("Gaze filter buffer cleared");
            }
            Command::ToggleFaceTriggers(enabled) => self.set_face_triggers(enabled),
            Command::ToggleDebugScreen(enabled) => {
                self.flags.debug_screen = enabled;
                self.publish_toggle(Feature::DebugScreen, enabled);
            }
            Command::SetPerformanceMode(mode) => {
                info!("Performance mode {:?}", mode);
                self.update_config(&mode.patch());
            }
            Command::SetCustom(patch) => self.update_config(&patch),
            Command::GetStatus => return Ok(Response::Status(self.status())),
        }
        Ok(Response::Ok)
    }

    /// Begin tracking; a second start leaves the running session untouched
    pub fn start(&mut self) -> Response {
        if self.flags.initialized {
            info!("Tracker already active");
            return Response::AlreadyActive;
        }

        self.flags.initialized = true;
        self.flags.listener_active = true;
        if self.flags.face_triggers {
            self.start_detector();
        }
        info!("Tracking started");
        self.publish(TrackerEvent::TrackingStarted);
        Response::Ok
    }

    /// Stop tracking, drop the detector and clear the smoothing buffer
    pub fn stop(&mut self) {
        if !self.flags.initialized {
            return;
        }
        self.flags.initialized = false;
        self.flags.listener_active = false;
        self.flags.debug_screen = false;
        self.smoother.clear();
        self.stop_detector();
        info!("Tracking stopped");
        self.publish(TrackerEvent::TrackingStopped);
    }

    /// Last smoothed gaze point, if any sample has been processed
    pub fn current_prediction(&self) -> Option<SmoothedGaze> {
        self.stream.current_gaze().copied()
    }

    /// Process one raw gaze sample from the prediction stream
    pub fn on_gaze(&mut self, raw: RawGaze) -> Option<SmoothedGaze> {
        let sample = raw.into_sample(self.clock.now_ms());
        self.observe_gaze(sample)
    }

    /// Smooth and publish a sample; ignored unless tracking with the listener on
    pub fn observe_gaze(&mut self, sample: Option<GazeSample>) -> Option<SmoothedGaze> {
        if !self.flags.initialized || !self.flags.listener_active {
            return None;
        }

        let smoothed = self.smoother.observe_optional(sample)?;
        metrics::counter!("gaze_samples_total").increment(1);
        self.gaze_rate.record(Instant::now().into_std());
        self.publish(TrackerEvent::Gaze(smoothed));
        Some(smoothed)
    }

    /// Run one display tick against the video source
    pub fn tick<S: FrameSource + ?Sized>(&mut self, source: &mut S) -> TickOutcome {
        let Some(detector) = self.detector.as_mut() else {
            return TickOutcome::Stopped;
        };

        let outcome = detector.tick(source);
        if let TickOutcome::Analyzed(analysis) = &outcome {
            metrics::counter!("frames_analyzed_total").increment(1);
            self.diagnostics.observe(analysis, self.config.debug_log_rate);
            for event in &analysis.events {
                metrics::counter!("gesture_events_total").increment(1);
                self.publish(TrackerEvent::Gesture(*event));
            }
        }
        outcome
    }

    pub fn status(&self) -> TrackerStatus {
        let interval = self.config.analysis_interval;
        TrackerStatus {
            initialized: self.flags.initialized,
            listener_active: self.flags.listener_active,
            filter_enabled: self.smoother.is_enabled(),
            face_triggers_enabled: self.flags.face_triggers,
            detector_running: self.detector.as_ref().map_or(false, |d| d.is_running()),
            debug_enabled: self.flags.debug_screen,
            video_visible: self.flags.video,
            points_visible: self.flags.points,
            performance_mode: PerformanceMode::classify(interval),
            approximate_fps: approximate_fps(interval),
            update_rate: self.gaze_rate.rate(),
            config: self.config.clone(),
            current_gaze: self.stream.current_gaze().copied(),
            last_gesture: self.stream.last_gesture().copied(),
        }
    }

    /// Stop everything before the tracker is dropped
    pub fn shutdown(&mut self) {
        self.stop();
    }

    fn require_initialized(&self) -> Result<(), ControllerError> {
        if self.flags.initialized {
            Ok(())
        } else {
            Err(ControllerError::NotInitialized)
        }
    }

    fn set_face_triggers(&mut self, enabled: bool) {
        self.flags.face_triggers = enabled;
        if !enabled {
            self.stop_detector();
        } else if self.flags.initialized && self.detector.is_none() {
            self.start_detector();
        }
        self.publish_toggle(Feature::FaceTriggers, enabled);
    }

    fn update_config(&mut self, patch: &GestureConfigPatch) {
        self.config.apply(patch);
        if let Some(detector) = self.detector.as_mut() {
            detector.update_config(patch);
        }
        self.publish(TrackerEvent::ConfigUpdated(self.config.clone()));
    }

    fn start_detector(&mut self) {
        match GestureDetector::from_factory(&self.factory, &self.config, self.clock.clone()) {
            Ok(mut detector) => {
                detector.start();
                self.detector = Some(detector);
            }
            Err(e) => {
                // Gaze tracking keeps working without gestures
                warn!("Face trigger detection unavailable: {}", e);
            }
        }
    }

    fn stop_detector(&mut self) {
        if let Some(mut detector) = self.detector.take() {
            detector.stop();
        }
    }

    fn publish_toggle(&mut self, feature: Feature, enabled: bool) {
        self.publish(TrackerEvent::FeatureToggled { feature, enabled });
    }

    fn publish(&mut self, event: TrackerEvent) {
        self.stream.apply(&event);
        self.bus.publish(event);
    }
}
