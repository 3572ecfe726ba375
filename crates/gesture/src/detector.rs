//! Gesture state machines
//!
//! Each detector consumes one boolean (or one position) per analyzed frame
//! and emits at most one event per transition. Durations are measured with
//! the caller's timestamps in milliseconds.

use crate::analysis::GestureKind;
use crate::state::{EyeOpenness, EyeSide, EyeState, HeadMovement, HeadPosition, MouthState};
use sample_window::SlidingWindow;
use tracing::debug;

/// Mouth openings this short or shorter are ignored (milliseconds)
pub const MOUTH_OPEN_MIN_DURATION_MS: i64 = 500;

/// Samples averaged at each end of the head history
pub const HEAD_WINDOW: usize = 5;

/// Open/closed tracker for one eye
#[derive(Debug, Clone)]
pub struct EyeDetector {
    side: EyeSide,
    state: EyeState,
}

impl EyeDetector {
    pub fn new(side: EyeSide) -> Self {
        Self {
            side,
            state: EyeState::default(),
        }
    }

    pub fn side(&self) -> EyeSide {
        self.side
    }

    pub fn state(&self) -> &EyeState {
        &self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state.is_closed()
    }

    /// Feed this frame's classification; emits only on a state change
    pub fn update(&mut self, closed: bool, now: i64) -> Option<GestureKind> {
        match (closed, self.state.openness) {
            (true, EyeOpenness::Open) => {
                self.state.openness = EyeOpenness::Closed;
                self.state.last_change = Some(now);
                self.state.closed_since = Some(now);
                debug!("{} eye closed", self.side.as_str());
                Some(GestureKind::eye_closed(self.side))
            }
            (false, EyeOpenness::Closed) => {
                let duration = self.state.closed_since.map(|start| now - start).unwrap_or(0);
                self.state.openness = EyeOpenness::Open;
                self.state.last_change = Some(now);
                self.state.closed_since = None;
                debug!("{} eye opened after {}ms", self.side.as_str(), duration);
                Some(GestureKind::eye_opened(self.side, duration))
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }
}

/// Times how long both eyes stay closed together
#[derive(Debug, Clone, Default)]
pub struct LongBlinkTimer {
    started_at: Option<i64>,
}

impl LongBlinkTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Starts when both eyes are closed, stops as soon as either opens.
    ///
    /// Emits a long blink on stop when the closure lasted strictly longer
    /// than `threshold_ms`.
    pub fn update(&mut self, both_closed: bool, now: i64, threshold_ms: i64) -> Option<GestureKind> {
        if both_closed {
            if self.started_at.is_none() {
                self.started_at = Some(now);
            }
            return None;
        }

        let start = self.started_at.take()?;
        let duration = now - start;
        if duration > threshold_ms {
            Some(GestureKind::LongBlink { duration })
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.started_at = None;
    }
}

/// Open/closed tracker for the mouth
#[derive(Debug, Clone, Default)]
pub struct MouthDetector {
    state: MouthState,
}

impl MouthDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &MouthState {
        &self.state
    }

    /// Emits mouthOpen with the open duration when the mouth closes after
    /// more than 500ms; shorter openings produce nothing
    pub fn update(&mut self, open: bool, now: i64) -> Option<GestureKind> {
        if open && !self.state.open {
            self.state.open = true;
            self.state.opened_since = Some(now);
            return None;
        }

        if !open && self.state.open {
            self.state.open = false;
            let duration = self.state.opened_since.take().map(|start| now - start).unwrap_or(0);
            if duration > MOUTH_OPEN_MIN_DURATION_MS {
                return Some(GestureKind::MouthOpen { duration });
            }
            debug!("Mouth closed after {}ms, below debounce", duration);
        }

        None
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }
}

/// Nod/shake detection over a bounded history of head positions.
///
/// Analysis runs only once the history is full, comparing the mean of the
/// newest five samples with the mean of the oldest five. The two windows
/// overlap whenever the history holds fewer than ten samples. The history
/// is cleared after every detection.
#[derive(Debug, Clone)]
pub struct HeadMovementDetector {
    history: SlidingWindow<HeadPosition>,
}

impl HeadMovementDetector {
    pub fn new(history_size: usize) -> Self {
        Self {
            history: SlidingWindow::new(history_size),
        }
    }

    pub fn history(&self) -> &SlidingWindow<HeadPosition> {
        &self.history
    }

    /// Change the history length, dropping the oldest samples if it shrinks
    pub fn set_history_size(&mut self, history_size: usize) {
        self.history.set_capacity(history_size);
    }

    pub fn update(&mut self, position: HeadPosition, threshold: f64) -> Option<GestureKind> {
        self.history.push(position);
        if self.history.len() < self.history.capacity() {
            return None;
        }

        let movement = self.movement()?;
        let gesture = if movement.is_shake(threshold) {
            GestureKind::ShakeHead
        } else if movement.is_nod(threshold) {
            GestureKind::Nod
        } else {
            return None;
        };

        debug!(
            "Head movement dx={:.1} dy={:.1}",
            movement.delta_x, movement.delta_y
        );
        self.history.clear();
        Some(gesture)
    }

    /// Absolute mean displacement between the newest and oldest samples
    pub fn movement(&self) -> Option<HeadMovement> {
        let recent = mean_position(self.history.newest_n(HEAD_WINDOW))?;
        let older = mean_position(self.history.oldest_n(HEAD_WINDOW))?;
        Some(HeadMovement {
            delta_x: (recent.0 - older.0).abs(),
            delta_y: (recent.1 - older.1).abs(),
        })
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }
}

fn mean_position<'a>(positions: impl Iterator<Item = &'a HeadPosition>) -> Option<(f64, f64)> {
    let mut count = 0;
    let mut sum = (0.0, 0.0);
    for p in positions {
        sum.0 += p.x;
        sum.1 += p.y;
        count += 1;
    }
    if count < HEAD_WINDOW {
        return None;
    }
    Some((sum.0 / count as f64, sum.1 / count as f64))
}
