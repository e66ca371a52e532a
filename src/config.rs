//! Detection pipeline configuration.

use crate::error::{DetectError, Result};

/// Tunable parameters for one detection run.
///
/// A plain immutable parameter object: construct one per call, nothing here
/// is mutated at runtime. Defaults match the documented methodology (90-day
/// STL period, z > 3 spike days, 5-day cluster gap).
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    /// STL seasonal period in days. 90 covers one quarter.
    pub stl_period: usize,
    /// Z-score above which a day counts as a spike.
    pub z_threshold: f64,
    /// Maximum gap in days between spike days merged into one window.
    pub cluster_gap_days: i64,
    /// Minimum peak z-score a window must reach to survive filtering.
    pub min_peak_z: f64,
    /// Minimum share of the whole series' volume a window must carry.
    pub min_total_volume_ratio: f64,
    /// If more than this fraction of candidate windows is weak, the whole
    /// series is treated as noise and no events are reported.
    pub max_noise_window_fraction: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            stl_period: 90,
            z_threshold: 3.0,
            cluster_gap_days: 5,
            min_peak_z: 3.0,
            min_total_volume_ratio: 0.05,
            max_noise_window_fraction: 0.5,
        }
    }
}

impl DetectorConfig {
    /// Create a configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the STL seasonal period in days.
    pub fn with_stl_period(mut self, period: usize) -> Self {
        self.stl_period = period;
        self
    }

    /// Set the spike-day z-score threshold. Also raises `min_peak_z` to the
    /// same value when it would otherwise fall below the detection threshold.
    pub fn with_z_threshold(mut self, threshold: f64) -> Self {
        self.z_threshold = threshold;
        if self.min_peak_z < threshold {
            self.min_peak_z = threshold;
        }
        self
    }

    /// Set the maximum gap in days between merged spike days.
    pub fn with_cluster_gap_days(mut self, gap: i64) -> Self {
        self.cluster_gap_days = gap;
        self
    }

    /// Set the minimum peak z-score for a window to survive filtering.
    pub fn with_min_peak_z(mut self, min_peak_z: f64) -> Self {
        self.min_peak_z = min_peak_z;
        self
    }

    /// Set the minimum share of total series volume a window must carry.
    pub fn with_min_total_volume_ratio(mut self, ratio: f64) -> Self {
        self.min_total_volume_ratio = ratio;
        self
    }

    /// Set the weak-window fraction above which the series counts as noise.
    pub fn with_max_noise_window_fraction(mut self, fraction: f64) -> Self {
        self.max_noise_window_fraction = fraction;
        self
    }

    /// Minimum number of daily observations the pipeline accepts.
    ///
    /// STL needs at least two full periods to separate seasonal structure
    /// from trend.
    pub fn min_series_len(&self) -> usize {
        2 * self.stl_period
    }

    /// Check all parameters for validity.
    pub fn validate(&self) -> Result<()> {
        if self.stl_period < 2 {
            return Err(DetectError::InvalidParameter(
                "stl_period must be at least 2".to_string(),
            ));
        }
        if !self.z_threshold.is_finite() || self.z_threshold <= 0.0 {
            return Err(DetectError::InvalidParameter(
                "z_threshold must be positive and finite".to_string(),
            ));
        }
        if self.cluster_gap_days < 0 {
            return Err(DetectError::InvalidParameter(
                "cluster_gap_days must be non-negative".to_string(),
            ));
        }
        if !self.min_peak_z.is_finite() || self.min_peak_z < 0.0 {
            return Err(DetectError::InvalidParameter(
                "min_peak_z must be non-negative and finite".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_total_volume_ratio) {
            return Err(DetectError::InvalidParameter(
                "min_total_volume_ratio must be in [0, 1]".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.max_noise_window_fraction) {
            return Err(DetectError::InvalidParameter(
                "max_noise_window_fraction must be in [0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}
