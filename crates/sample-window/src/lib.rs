//! Bounded Sliding Window
//!
//! Fixed-capacity recency window used for the gaze smoothing buffer and the
//! head-position history. Oldest entries are evicted once capacity is exceeded.

mod window;

pub use window::SlidingWindow;
