//! Tests for the QA analyzer
//!
//! Shared fixtures plus one test module per check, and one for the
//! combined analyzer entry point.

pub mod analyzer_tests;
pub mod spike_tests;

use crate::app::models::{HistoricalSeries, Sample, SampleState};

/// Build samples from wire-shaped values: `Some(v)` is a transmitted value
/// (with `-1.0` classifying as the no-reading sentinel), `None` is an
/// absent field.
pub fn samples_from(wire: &[Option<f64>]) -> Vec<Sample> {
    wire.iter()
        .map(|v| Sample {
            at: None,
            state: SampleState::from_wire(*v),
        })
        .collect()
}

/// Samples where every value was transmitted.
pub fn present(values: &[f64]) -> Vec<Sample> {
    samples_from(&values.iter().map(|v| Some(*v)).collect::<Vec<_>>())
}

/// A series for the combined analyzer tests.
pub fn series_from(station_id: &str, wire: &[Option<f64>]) -> HistoricalSeries {
    HistoricalSeries::new(station_id, samples_from(wire))
}
