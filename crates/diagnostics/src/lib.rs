//! Diagnostics
//!
//! Probabilistically sampled per-frame diagnostic records and a windowed
//! analysis rate meter.

mod rate;
mod sink;

pub use rate::{RateMeter, RATE_WINDOW};
pub use sink::{
    DiagnosticRecord, DiagnosticSampler, DiagnosticSink, Diagnostics, MemorySink, TracingSink,
};
