//! Spike detection, clustering, and filtering on standardized residuals.

mod cluster;
mod filter;
mod zscore;

pub use cluster::{cluster_spikes, EventWindow};
pub use filter::filter_windows;
pub use zscore::{standardize, ResidualStats, ZScoredPoint};
