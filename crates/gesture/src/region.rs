//! Facial region layout and brightness sampling
//!
//! Regions are fixed fractions of the frame, which assumes a roughly centered
//! face. All sampling uses luminance normalized to 0..1.

use frame_capture::{luminance, PixelBuffer, BYTES_PER_PIXEL};

/// Eye regions are sampled on every second pixel in both axes
pub const EYE_SAMPLE_STRIDE: u32 = 2;

/// Axis-aligned half-open pixel rectangle [x1, x2) x [y1, y2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl Region {
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Region from fractional frame coordinates, floored to whole pixels
    pub fn from_fractions(width: u32, height: u32, fx1: f64, fy1: f64, fx2: f64, fy2: f64) -> Self {
        let w = width as f64;
        let h = height as f64;
        Self {
            x1: (w * fx1).floor() as u32,
            y1: (h * fy1).floor() as u32,
            x2: (w * fx2).floor() as u32,
            y2: (h * fy2).floor() as u32,
        }
    }

    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Intersect with a width x height frame
    pub fn clipped(&self, width: u32, height: u32) -> Self {
        Self {
            x1: self.x1.min(width),
            y1: self.y1.min(height),
            x2: self.x2.min(width),
            y2: self.y2.min(height),
        }
    }
}

/// The four analysis regions for one frame size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionBounds {
    /// x 30-45%, y 35-50%
    pub left_eye: Region,
    /// x 55-70%, y 35-50%
    pub right_eye: Region,
    /// x 35-65%, y 65-85%
    pub mouth: Region,
    /// Square of side 0.2 * min(w, h) centered on the frame
    pub head_center: Region,
}

impl RegionBounds {
    pub fn for_frame(width: u32, height: u32) -> Self {
        let half = (width.min(height) as f64 * 0.1).floor() as u32;
        let cx = width / 2;
        let cy = height / 2;

        Self {
            left_eye: Region::from_fractions(width, height, 0.30, 0.35, 0.45, 0.50),
            right_eye: Region::from_fractions(width, height, 0.55, 0.35, 0.70, 0.50),
            mouth: Region::from_fractions(width, height, 0.35, 0.65, 0.65, 0.85),
            head_center: Region::new(
                cx.saturating_sub(half),
                cy.saturating_sub(half),
                cx + half,
                cy + half,
            )
            .clipped(width, height),
        }
    }
}

/// Region bounds memoized per frame size
#[derive(Debug, Default)]
pub struct RegionCache {
    cached: Option<((u32, u32), RegionBounds)>,
}

impl RegionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds for this frame size, recomputed only when the size changes
    pub fn bounds(&mut self, width: u32, height: u32) -> RegionBounds {
        match self.cached {
            Some((dims, bounds)) if dims == (width, height) => bounds,
            _ => {
                let bounds = RegionBounds::for_frame(width, height);
                self.cached = Some(((width, height), bounds));
                bounds
            }
        }
    }

    /// Frame size the cached bounds belong to
    pub fn cached_for(&self) -> Option<(u32, u32)> {
        self.cached.map(|(dims, _)| dims)
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

/// Average normalized luminance (0..1) of a region, sampling every
/// `stride`-th pixel in both axes.
///
/// A region containing no pixels reads as fully bright (1.0), so it never
/// registers as a closed eye or open mouth.
pub fn average_brightness(frame: &PixelBuffer, region: &Region, stride: u32) -> f64 {
    let region = region.clipped(frame.width(), frame.height());
    let step = stride.max(1) as usize;
    let data = frame.data();
    let row_bytes = frame.width() as usize * BYTES_PER_PIXEL;

    let mut sum = 0.0;
    let mut count = 0usize;
    for y in (region.y1..region.y2).step_by(step) {
        let row = y as usize * row_bytes;
        for x in (region.x1..region.x2).step_by(step) {
            let idx = row + x as usize * BYTES_PER_PIXEL;
            sum += luminance(data[idx], data[idx + 1], data[idx + 2]);
            count += 1;
        }
    }

    if count == 0 {
        return 1.0;
    }
    sum / count as f64 / 255.0
}

/// Luminance-weighted centroid of a region in frame coordinates.
///
/// None when the region is empty or entirely black.
pub fn brightness_centroid(frame: &PixelBuffer, region: &Region) -> Option<(f64, f64)> {
    let region = region.clipped(frame.width(), frame.height());
    let data = frame.data();
    let row_bytes = frame.width() as usize * BYTES_PER_PIXEL;

    let mut total = 0.0;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    for y in region.y1..region.y2 {
        let row = y as usize * row_bytes;
        for x in region.x1..region.x2 {
            let idx = row + x as usize * BYTES_PER_PIXEL;
            let weight = luminance(data[idx], data[idx + 1], data[idx + 2]);
            total += weight;
            sum_x += x as f64 * weight;
            sum_y += y as f64 * weight;
        }
    }

    if total > 0.0 {
        Some((sum_x / total, sum_y / total))
    } else {
        None
    }
}
