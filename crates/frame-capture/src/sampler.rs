//! Throttled frame sampling

use crate::frame::PixelBuffer;
use crate::source::FrameSource;
use crate::CaptureError;
use tracing::debug;

/// Analyze every second tick by default
pub const DEFAULT_ANALYSIS_INTERVAL: u32 = 2;

/// What happened on one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    /// Source reported zero dimensions; retry next tick
    NotReady,
    /// Tick skipped by the frame-skip policy
    Skipped,
    /// Frame copied into the buffer
    Captured {
        /// Frame dimensions differ from the previous capture
        resized: bool,
    },
}

impl SampleOutcome {
    pub fn is_captured(&self) -> bool {
        matches!(self, SampleOutcome::Captured { .. })
    }
}

/// Decides per tick whether to capture the current frame.
///
/// A frame is captured only when `counter % interval == 0`, with the counter
/// incremented once per ready tick. An interval of 0 never captures.
#[derive(Debug)]
pub struct FrameSampler {
    interval: u32,
    counter: u64,
    buffer: PixelBuffer,
}

impl FrameSampler {
    pub fn new(interval: u32) -> Self {
        Self {
            interval,
            counter: 0,
            buffer: PixelBuffer::default(),
        }
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn set_interval(&mut self, interval: u32) {
        self.interval = interval;
    }

    /// Ready ticks seen so far
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// The most recently captured frame
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Run the frame-skip policy for one tick
    pub fn sample<S: FrameSource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> Result<SampleOutcome, CaptureError> {
        let (width, height) = source.dimensions();
        if width == 0 || height == 0 {
            return Ok(SampleOutcome::NotReady);
        }

        self.counter += 1;
        if self.counter.checked_rem(u64::from(self.interval)) != Some(0) {
            return Ok(SampleOutcome::Skipped);
        }

        let resized = self.buffer.resize(width, height);
        if resized {
            debug!("Frame size changed to {}x{}", width, height);
        }
        source.copy_into(&mut self.buffer)?;

        Ok(SampleOutcome::Captured { resized })
    }

    /// Drop the pixel buffer
    pub fn release(&mut self) {
        self.buffer.release();
    }
}

impl Default for FrameSampler {
    fn default() -> Self {
        Self::new(DEFAULT_ANALYSIS_INTERVAL)
    }
}
