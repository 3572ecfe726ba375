//! Video frame sources

use crate::frame::PixelBuffer;
use crate::CaptureError;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A video source queried once per tick.
///
/// `dimensions` reports the intrinsic size of the current frame; (0, 0) means
/// the source is not ready yet. `copy_into` receives a buffer already sized
/// to those dimensions.
pub trait FrameSource {
    fn dimensions(&self) -> (u32, u32);

    fn copy_into(&mut self, buffer: &mut PixelBuffer) -> Result<(), CaptureError>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn dimensions(&self) -> (u32, u32) {
        (**self).dimensions()
    }

    fn copy_into(&mut self, buffer: &mut PixelBuffer) -> Result<(), CaptureError> {
        (**self).copy_into(buffer)
    }
}

/// Queue of in-memory frames.
///
/// Each copy advances to the next queued frame; once the queue drains the
/// last frame keeps being shown.
#[derive(Debug, Default)]
pub struct MemorySource {
    current: PixelBuffer,
    queue: VecDeque<PixelBuffer>,
}

impl MemorySource {
    /// Source with no frame yet (reports zero dimensions)
    pub fn new() -> Self {
        Self::default()
    }

    /// Source showing a single still frame
    pub fn still(frame: PixelBuffer) -> Self {
        Self {
            current: frame,
            queue: VecDeque::new(),
        }
    }

    /// Queue a frame to be shown on a later copy
    pub fn push(&mut self, frame: PixelBuffer) {
        self.queue.push_back(frame);
    }

    /// Frames still waiting in the queue
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    fn upcoming(&self) -> &PixelBuffer {
        self.queue.front().unwrap_or(&self.current)
    }
}

impl FrameSource for MemorySource {
    fn dimensions(&self) -> (u32, u32) {
        self.upcoming().dimensions()
    }

    fn copy_into(&mut self, buffer: &mut PixelBuffer) -> Result<(), CaptureError> {
        if let Some(next) = self.queue.pop_front() {
            self.current = next;
        }
        if self.current.is_empty() {
            return Err(CaptureError::NotReady);
        }
        buffer.copy_from(self.current.data())
    }
}

/// Image files in a directory, replayed in name order
pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
    position: usize,
    looping: bool,
    pending: Option<image::RgbaImage>,
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

impl ImageSequenceSource {
    /// Open every image file in `dir`
    pub fn open(dir: impl AsRef<Path>, looping: bool) -> Result<Self, CaptureError> {
        let dir = dir.as_ref();
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_image = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false);
            if is_image {
                paths.push(path);
            }
        }

        if paths.is_empty() {
            return Err(CaptureError::EmptySequence(dir.to_path_buf()));
        }
        paths.sort();

        info!("Opened image sequence {:?} ({} frames)", dir, paths.len());

        let mut source = Self {
            paths,
            position: 0,
            looping,
            pending: None,
        };
        source.preload();
        Ok(source)
    }

    /// Number of frames in the sequence
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// True once a non-looping sequence has shown its last frame
    pub fn is_finished(&self) -> bool {
        self.pending.is_none()
    }

    /// Decode the next readable frame, skipping files that fail to decode
    fn preload(&mut self) {
        self.pending = None;
        let mut attempts = 0;
        while attempts < self.paths.len() {
            if self.position >= self.paths.len() {
                if !self.looping {
                    debug!("Image sequence finished");
                    return;
                }
                self.position = 0;
            }

            let path = &self.paths[self.position];
            self.position += 1;
            attempts += 1;

            match image::open(path) {
                Ok(img) => {
                    self.pending = Some(img.to_rgba8());
                    return;
                }
                Err(e) => {
                    warn!("Skipping unreadable frame {:?}: {}", path, e);
                }
            }
        }
    }
}

impl FrameSource for ImageSequenceSource {
    fn dimensions(&self) -> (u32, u32) {
        self.pending
            .as_ref()
            .map(|img| img.dimensions())
            .unwrap_or((0, 0))
    }

    fn copy_into(&mut self, buffer: &mut PixelBuffer) -> Result<(), CaptureError> {
        let frame = self.pending.take().ok_or(CaptureError::NotReady)?;
        let result = buffer.copy_from(frame.as_raw());
        self.preload();
        result
    }
}
