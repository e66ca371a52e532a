//! Core data structures for the detection pipeline.

mod series;

pub use series::{DailySeries, RawObservation};
