//! Validation metrics.
//!
//! # Metrics
//! - `request_gate_outcomes_total` (counter): requests by source, outcome
//! - `request_gate_duration_seconds` (histogram): time spent decoding and
//!   validating, by source
//!
//! # Design Decisions
//! - Emitted through the `metrics` facade; the host picks the exporter
//! - The handler's own time is not included in the histogram

use std::time::Instant;

use crate::source::Source;

/// How a request left the validation middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Published,
    DecodeFailed,
    ValidationFailed,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Published => "published",
            Outcome::DecodeFailed => "decode_failed",
            Outcome::ValidationFailed => "validation_failed",
        }
    }
}

/// Record one request that entered the middleware at `started`.
pub fn record(source: Source, outcome: Outcome, started: Instant) {
    ::metrics::counter!(
        "request_gate_outcomes_total",
        "source" => source.as_str(),
        "outcome" => outcome.as_str()
    )
    .increment(1);

    ::metrics::histogram!("request_gate_duration_seconds", "source" => source.as_str())
        .record(started.elapsed().as_secs_f64());
}
