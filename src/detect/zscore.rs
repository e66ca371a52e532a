//! Residual standardization.

use crate::stats;

/// Spread below which a residual series counts as flat.
const DEGENERATE_STDDEV: f64 = 1e-10;

/// Mean and sample standard deviation of a residual series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResidualStats {
    pub mean: f64,
    /// Sample standard deviation (n-1 denominator).
    pub stddev: f64,
}

impl ResidualStats {
    /// Compute stats over the full residual array.
    pub fn from_residuals(residuals: &[f64]) -> Self {
        if residuals.len() < 2 {
            return Self {
                mean: stats::mean(residuals),
                stddev: 0.0,
            };
        }
        Self {
            mean: stats::mean(residuals),
            stddev: stats::std_dev(residuals),
        }
    }

    /// A flat residual: no spike can be detected against zero spread.
    pub fn is_degenerate(&self) -> bool {
        self.stddev < DEGENERATE_STDDEV
    }
}

/// One residual observation with its standardized score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZScoredPoint {
    /// Index into the normalized daily series.
    pub index: usize,
    pub residual: f64,
    pub z: f64,
}

/// Standardize every residual against the series-wide stats.
///
/// A degenerate (flat) residual maps every z to 0 so the downstream detector
/// finds no spikes instead of dividing by zero.
pub fn standardize(residuals: &[f64]) -> (ResidualStats, Vec<ZScoredPoint>) {
    let stats = ResidualStats::from_residuals(residuals);

    let points = residuals
        .iter()
        .enumerate()
        .map(|(index, &residual)| {
            let z = if stats.is_degenerate() {
                0.0
            } else {
                (residual - stats.mean) / stats.stddev
            };
            ZScoredPoint { index, residual, z }
        })
        .collect();

    (stats, points)
}
