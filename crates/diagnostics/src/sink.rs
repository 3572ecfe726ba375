//! Sampled diagnostic records

use gesture::{FrameAnalysis, HeadPosition};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Region measurements from one analyzed frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticRecord {
    pub timestamp: i64,
    pub left_eye_brightness: f64,
    pub right_eye_brightness: f64,
    pub mouth_brightness: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_position: Option<HeadPosition>,
    pub event_count: usize,
}

impl From<&FrameAnalysis> for DiagnosticRecord {
    fn from(analysis: &FrameAnalysis) -> Self {
        Self {
            timestamp: analysis.timestamp,
            left_eye_brightness: analysis.left_eye_brightness,
            right_eye_brightness: analysis.right_eye_brightness,
            mouth_brightness: analysis.mouth_brightness,
            head_position: analysis.head_position,
            event_count: analysis.events.len(),
        }
    }
}

/// Destination for diagnostic records
pub trait DiagnosticSink: Send {
    fn emit(&mut self, record: &DiagnosticRecord);
}

/// Writes records as debug-level tracing events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, record: &DiagnosticRecord) {
        debug!(
            left_eye = record.left_eye_brightness,
            right_eye = record.right_eye_brightness,
            mouth = record.mouth_brightness,
            head_x = record.head_position.map(|p| p.x),
            head_y = record.head_position.map(|p| p.y),
            events = record.event_count,
            "Frame diagnostics"
        );
    }
}

/// Collects records in memory; clones share the same storage
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<DiagnosticRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<DiagnosticRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&mut self, record: &DiagnosticRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record.clone());
        }
    }
}

/// Bernoulli sampler: each frame is kept with probability `rate`
#[derive(Debug, Clone)]
pub struct DiagnosticSampler<R: Rng = StdRng> {
    rng: R,
}

impl DiagnosticSampler<StdRng> {
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Reproducible sampler
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> DiagnosticSampler<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Rates at or below 0 never sample; rates at or above 1 always do
    pub fn should_sample(&mut self, rate: f64) -> bool {
        if rate.is_nan() || rate <= 0.0 {
            return false;
        }
        if rate >= 1.0 {
            return true;
        }
        self.rng.gen::<f64>() < rate
    }
}

impl Default for DiagnosticSampler<StdRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Sampler and sink together
pub struct Diagnostics {
    sampler: DiagnosticSampler,
    sink: Box<dyn DiagnosticSink>,
    emitted: u64,
}

impl Diagnostics {
    pub fn new(sink: Box<dyn DiagnosticSink>) -> Self {
        Self::with_sampler(DiagnosticSampler::default(), sink)
    }

    pub fn with_sampler(sampler: DiagnosticSampler, sink: Box<dyn DiagnosticSink>) -> Self {
        Self {
            sampler,
            sink,
            emitted: 0,
        }
    }

    /// Offer one analyzed frame; returns true if a record was emitted
    pub fn observe(&mut self, analysis: &FrameAnalysis, rate: f64) -> bool {
        if !self.sampler.should_sample(rate) {
            return false;
        }
        self.sink.emit(&DiagnosticRecord::from(analysis));
        self.emitted += 1;
        true
    }

    /// Records emitted so far
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(Box::new(TracingSink))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(ts: i64) -> FrameAnalysis {
        FrameAnalysis {
            timestamp: ts,
            left_eye_brightness: 0.6,
            right_eye_brightness: 0.55,
            mouth_brightness: 0.7,
            head_position: None,
            events: Vec::new(),
        }
    }

    #[test]
    fn test_zero_rate_never_emits() {
        let sink = MemorySink::new();
        let mut diagnostics =
            Diagnostics::with_sampler(DiagnosticSampler::seeded(7), Box::new(sink.clone()));
        for ts in 0..1_000 {
            assert!(!diagnostics.observe(&analysis(ts), 0.0));
        }
        assert!(sink.is_empty());
    }

    #[test]
    fn test_full_rate_always_emits() {
        let sink = MemorySink::new();
        let mut diagnostics =
            Diagnostics::with_sampler(DiagnosticSampler::seeded(7), Box::new(sink.clone()));
        for ts in 0..10 {
            assert!(diagnostics.observe(&analysis(ts), 1.0));
        }
        assert_eq!(sink.len(), 10);
        assert_eq!(diagnostics.emitted(), 10);
        assert_eq!(sink.records()[3].timestamp, 3);
    }

    #[test]
    fn test_partial_rate_is_roughly_proportional() {
        let mut sampler = DiagnosticSampler::seeded(42);
        let hits = (0..10_000).filter(|_| sampler.should_sample(0.1)).count();
        assert!((700..1_300).contains(&hits), "hits = {hits}");
    }

    #[test]
    fn test_nan_rate_never_samples() {
        let mut sampler = DiagnosticSampler::seeded(1);
        assert!(!sampler.should_sample(f64::NAN));
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = DiagnosticRecord::from(&analysis(5));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["leftEyeBrightness"], 0.6);
        assert_eq!(json["eventCount"], 0);
        assert!(json.get("headPosition").is_none());
    }
}
