//! Pixel buffer types

use crate::CaptureError;

/// Bytes per RGBA pixel
pub const BYTES_PER_PIXEL: usize = 4;

/// Reusable RGBA frame buffer (row-major)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PixelBuffer {
    /// RGBA pixel data (width * height * 4)
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a zeroed buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0; byte_len(width, height)],
            width,
            height,
        }
    }

    /// Create a buffer filled with one color
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut buffer = Self::new(width, height);
        buffer.fill(rgba);
        buffer
    }

    /// Wrap raw RGBA bytes
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Result<Self, CaptureError> {
        let expected = byte_len(width, height);
        if data.len() != expected {
            return Err(CaptureError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { data, width, height })
    }

    /// Convert a decoded image
    pub fn from_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            data: img.into_raw(),
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// True when either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Resize to new dimensions, reallocating only when they change.
    ///
    /// Returns true if the dimensions changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if self.width == width && self.height == height {
            return false;
        }
        self.width = width;
        self.height = height;
        self.data.resize(byte_len(width, height), 0);
        true
    }

    /// Overwrite the whole buffer from a same-sized RGBA slice
    pub fn copy_from(&mut self, rgba: &[u8]) -> Result<(), CaptureError> {
        if rgba.len() != self.data.len() {
            return Err(CaptureError::SizeMismatch {
                expected: self.data.len(),
                actual: rgba.len(),
            });
        }
        self.data.copy_from_slice(rgba);
        Ok(())
    }

    /// Get pixel at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    /// Set pixel at (x, y); out-of-bounds writes are ignored
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = self.index(x, y);
        self.data[idx..idx + BYTES_PER_PIXEL].copy_from_slice(&rgba);
    }

    /// Fill the whole buffer with one color
    pub fn fill(&mut self, rgba: [u8; 4]) {
        for pixel in self.data.chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel.copy_from_slice(&rgba);
        }
    }

    /// Fill the half-open rectangle [x1, x2) x [y1, y2), clipped to the frame
    pub fn fill_rect(&mut self, x1: u32, y1: u32, x2: u32, y2: u32, rgba: [u8; 4]) {
        for y in y1..y2.min(self.height) {
            for x in x1..x2.min(self.width) {
                self.set_pixel(x, y, rgba);
            }
        }
    }

    /// Luminance (0.299R + 0.587G + 0.114B) at (x, y), in 0..=255
    pub fn luminance(&self, x: u32, y: u32) -> Option<f64> {
        self.pixel(x, y).map(|[r, g, b, _]| luminance(r, g, b))
    }

    /// Free the pixel storage
    pub fn release(&mut self) {
        self.data = Vec::new();
        self.width = 0;
        self.height = 0;
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }
}

/// Luminance formula: 0.299*R + 0.587*G + 0.114*B
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    r as f64 * 0.299 + g as f64 * 0.587 + b as f64 * 0.114
}

fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * BYTES_PER_PIXEL
}
