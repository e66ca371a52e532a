//! STL (Seasonal-Trend decomposition using LOESS).
//!
//! Splits an observed series into additive trend, seasonal, and residual
//! components. The residual is what the downstream spike detector scores:
//! it holds everything the trend and the periodic cycle cannot explain.

use crate::error::{DetectError, Result};
use crate::stats;

/// Additive decomposition of an observed series.
///
/// All three components are index-aligned with the input and satisfy
/// `trend[i] + seasonal[i] + residual[i] == observed[i]` within floating
/// point tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    /// Low-frequency component: long-term changes in attention.
    pub trend: Vec<f64>,
    /// Periodic component with the configured period.
    pub seasonal: Vec<f64>,
    /// Irregular fluctuations left over after trend and seasonal removal.
    pub residual: Vec<f64>,
}

impl Decomposition {
    /// Number of observations the decomposition covers.
    pub fn len(&self) -> usize {
        self.trend.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trend.is_empty()
    }

    fn is_finite(&self) -> bool {
        self.trend
            .iter()
            .chain(self.seasonal.iter())
            .chain(self.residual.iter())
            .all(|v| v.is_finite())
    }
}

/// STL decomposition with the classical inner/outer loop structure.
///
/// Smoothing spans default to the Cleveland et al. (1990) recommendations
/// for the configured period; all spans are forced odd.
#[derive(Debug, Clone)]
pub struct StlDecomposer {
    period: usize,
    seasonal_span: usize,
    trend_span: usize,
    low_pass_span: usize,
    inner_iterations: usize,
    outer_iterations: usize,
}

impl StlDecomposer {
    /// Create a decomposer for the given seasonal period.
    pub fn new(period: usize) -> Self {
        let period = period.max(2);
        let trend_span = (1.5 * period as f64 / (1.0 - 1.5 / period as f64)).ceil() as usize;
        Self {
            period,
            seasonal_span: period | 1,
            trend_span: trend_span | 1,
            low_pass_span: period | 1,
            inner_iterations: 2,
            outer_iterations: 0,
        }
    }

    /// The configured seasonal period.
    pub fn period(&self) -> usize {
        self.period
    }

    /// Override the seasonal smoothing span (forced odd).
    pub fn with_seasonal_span(mut self, span: usize) -> Self {
        self.seasonal_span = span | 1;
        self
    }

    /// Override the trend smoothing span (forced odd).
    pub fn with_trend_span(mut self, span: usize) -> Self {
        self.trend_span = span | 1;
        self
    }

    /// Set the number of inner iterations.
    pub fn with_inner_iterations(mut self, n: usize) -> Self {
        self.inner_iterations = n.max(1);
        self
    }

    /// Enable robustness iterations: residual-based bisquare weights
    /// down-weight outlying days when re-estimating trend and seasonal.
    pub fn with_outer_iterations(mut self, n: usize) -> Self {
        self.outer_iterations = n;
        self
    }

    /// Enable robust fitting with the customary six outer iterations.
    pub fn robust(self) -> Self {
        self.with_outer_iterations(6)
    }

    /// Decompose the observed series.
    ///
    /// Fails with [`DetectError::InsufficientData`] when the series is
    /// shorter than two full periods, and with [`DetectError::Computation`]
    /// if the smoothing ever produces a non-finite value.
    pub fn decompose(&self, observed: &[f64]) -> Result<Decomposition> {
        let n = observed.len();
        let needed = 2 * self.period;
        if n < needed {
            return Err(DetectError::InsufficientData { needed, got: n });
        }

        let mut trend = vec![0.0; n];
        let mut seasonal = vec![0.0; n];
        let mut robustness = vec![1.0; n];

        for pass in 0..=self.outer_iterations {
            for _ in 0..self.inner_iterations {
                // Detrend, then estimate the seasonal from cycle-subseries.
                let detrended: Vec<f64> = observed
                    .iter()
                    .zip(trend.iter())
                    .map(|(y, t)| y - t)
                    .collect();
                let cycle = self.smooth_cycle_subseries(&detrended, &robustness);

                // Remove low-frequency drift from the seasonal estimate so
                // it ends up in the trend instead.
                let drift = self.low_pass(&cycle);
                for ((s, c), d) in seasonal.iter_mut().zip(cycle.iter()).zip(drift.iter()) {
                    *s = c - d;
                }

                // Deseasonalize and re-estimate the trend.
                let deseasonalized: Vec<f64> = observed
                    .iter()
                    .zip(seasonal.iter())
                    .map(|(y, s)| y - s)
                    .collect();
                trend = loess_smooth(&deseasonalized, self.trend_span, &robustness);
            }

            if pass < self.outer_iterations {
                let residual = residual_of(observed, &trend, &seasonal);
                robustness = bisquare_weights(&residual);
            }
        }

        let residual = residual_of(observed, &trend, &seasonal);
        let decomposition = Decomposition {
            trend,
            seasonal,
            residual,
        };
        if !decomposition.is_finite() {
            return Err(DetectError::Computation(
                "decomposition produced non-finite values".to_string(),
            ));
        }
        Ok(decomposition)
    }

    /// Smooth each cycle-subseries (all days sharing a position in the
    /// seasonal cycle) and scatter the results back to series order.
    fn smooth_cycle_subseries(&self, detrended: &[f64], weights: &[f64]) -> Vec<f64> {
        let n = detrended.len();
        let mut smoothed = vec![0.0; n];

        for phase in 0..self.period {
            let indices: Vec<usize> = (phase..n).step_by(self.period).collect();
            let sub: Vec<f64> = indices.iter().map(|&i| detrended[i]).collect();
            let sub_weights: Vec<f64> = indices.iter().map(|&i| weights[i]).collect();
            let sub_smoothed = loess_smooth(&sub, self.seasonal_span, &sub_weights);
            for (&i, &value) in indices.iter().zip(sub_smoothed.iter()) {
                smoothed[i] = value;
            }
        }

        smoothed
    }

    /// Low-pass filter: MA(period) twice, MA(3), then a LOESS pass.
    fn low_pass(&self, series: &[f64]) -> Vec<f64> {
        let pass = moving_average(series, self.period);
        let pass = moving_average(&pass, self.period);
        let pass = moving_average(&pass, 3);
        let unit = vec![1.0; series.len()];
        loess_smooth(&pass, self.low_pass_span, &unit)
    }
}

fn residual_of(observed: &[f64], trend: &[f64], seasonal: &[f64]) -> Vec<f64> {
    observed
        .iter()
        .zip(trend.iter())
        .zip(seasonal.iter())
        .map(|((y, t), s)| y - t - s)
        .collect()
}

/// Tricube-weighted local smoothing with externally supplied robustness
/// weights. Windows shrink at the series edges.
fn loess_smooth(values: &[f64], span: usize, weights: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }

    let half = span / 2;
    let reach = half as f64 + 1.0;
    let mut smoothed = Vec::with_capacity(n);

    for i in 0..n {
        let lo = i.saturating_sub(half);
        let hi = (i + half + 1).min(n);

        let mut weight_sum = 0.0;
        let mut value_sum = 0.0;
        for j in lo..hi {
            let u = (i as f64 - j as f64).abs() / reach;
            let w = tricube(u) * weights[j];
            weight_sum += w;
            value_sum += w * values[j];
        }

        smoothed.push(if weight_sum > 0.0 {
            value_sum / weight_sum
        } else {
            values[i]
        });
    }

    smoothed
}

fn tricube(u: f64) -> f64 {
    if u < 1.0 {
        (1.0 - u.powi(3)).powi(3)
    } else {
        0.0
    }
}

/// Centered moving average; windows shrink at the edges.
fn moving_average(series: &[f64], window: usize) -> Vec<f64> {
    let n = series.len();
    let half = window / 2;
    let mut averaged = Vec::with_capacity(n);

    for i in 0..n {
        let lo = i.saturating_sub(half);
        let hi = (i + half + 1).min(n);
        let sum: f64 = series[lo..hi].iter().sum();
        averaged.push(sum / (hi - lo) as f64);
    }

    averaged
}

/// Bisquare robustness weights scaled by six times the median absolute
/// residual.
fn bisquare_weights(residual: &[f64]) -> Vec<f64> {
    let abs_residual: Vec<f64> = residual.iter().map(|r| r.abs()).collect();
    let h = 6.0 * stats::median(&abs_residual);

    residual
        .iter()
        .map(|r| {
            if h < 1e-10 {
                return 1.0;
            }
            let u = r.abs() / h;
            if u < 1.0 {
                (1.0 - u * u).powi(2)
            } else {
                0.0
            }
        })
        .collect()
}
