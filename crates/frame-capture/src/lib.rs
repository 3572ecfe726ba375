//! Frame Capture Library for Gesture Analysis
//!
//! Copies the current video frame into a reusable RGBA buffer at a throttled
//! rate. Supports:
//! - In-memory frame queues (replay and tests)
//! - Image sequences on disk (PNG/JPEG/BMP)
//! - Frame-skip sampling driven by a tick counter

pub mod frame;
pub mod sampler;
pub mod source;

pub use frame::{luminance, PixelBuffer, BYTES_PER_PIXEL};
pub use sampler::{FrameSampler, SampleOutcome, DEFAULT_ANALYSIS_INTERVAL};
pub use source::{FrameSource, ImageSequenceSource, MemorySource};

use std::path::PathBuf;
use thiserror::Error;

/// Frame capture error types
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Frame source not ready")]
    NotReady,

    #[error("Failed to read frames: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("No frames found in {0}")]
    EmptySequence(PathBuf),

    #[error("Frame size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}
