//! The end-to-end detection pipeline.
//!
//! A strictly linear computation: raw observations -> normalized daily
//! series -> STL decomposition -> standardized residuals -> spike windows
//! -> filtered major events -> report. Each stage consumes the previous
//! stage's complete, immutable output; nothing is retained between runs.

use chrono::NaiveDate;
use tracing::debug;

use crate::config::DetectorConfig;
use crate::core::{DailySeries, RawObservation};
use crate::decompose::StlDecomposer;
use crate::detect::{cluster_spikes, filter_windows, standardize};
use crate::error::{DetectError, Result};
use crate::report::SurgeReport;

/// Stateless event detector, safe to share across threads.
///
/// Holds only the configuration; every [`detect`](Self::detect) call
/// allocates its own working arrays.
#[derive(Debug, Clone)]
pub struct EventDetector {
    config: DetectorConfig,
}

impl EventDetector {
    /// Create a detector with a validated configuration.
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run the full pipeline for one query.
    pub fn detect(&self, query: &str, observations: &[RawObservation]) -> Result<SurgeReport> {
        self.detect_in_range(query, observations, None, None)
    }

    /// Run the full pipeline, clamping analysis to an explicit date range.
    pub fn detect_in_range(
        &self,
        query: &str,
        observations: &[RawObservation],
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<SurgeReport> {
        let series = DailySeries::from_observations_in_range(observations, start, end)?;
        let needed = self.config.min_series_len();
        if series.len() < needed {
            return Err(DetectError::InsufficientData {
                needed,
                got: series.len(),
            });
        }
        debug!(query, days = series.len(), "normalized daily series");

        let decomposition = StlDecomposer::new(self.config.stl_period).decompose(series.values())?;

        let (stats, points) = standardize(&decomposition.residual);
        debug!(
            mean = stats.mean,
            stddev = stats.stddev,
            "standardized residuals"
        );

        let windows = cluster_spikes(
            &points,
            &series,
            self.config.z_threshold,
            self.config.cluster_gap_days,
        );
        debug!(candidates = windows.len(), "clustered spike windows");

        let events = filter_windows(windows, series.total_volume(), &self.config);
        debug!(events = events.len(), "windows survived filtering");

        Ok(SurgeReport::assemble(query, &series, &decomposition, events))
    }
}

/// Convenience wrapper: run one detection with the given configuration.
pub fn detect_events(
    query: &str,
    observations: &[RawObservation],
    config: &DetectorConfig,
) -> Result<SurgeReport> {
    EventDetector::new(config.clone())?.detect(query, observations)
}
