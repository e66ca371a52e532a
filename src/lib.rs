//! # surge-detect
//!
//! Event detection for daily media-coverage time series.
//!
//! Given daily `(date, count)` observations for a query, the pipeline
//! normalizes them into a gap-free daily series, decomposes it with STL,
//! standardizes the residual into z-scores, thresholds spike days, clusters
//! nearby spikes into event windows, filters out weak or noisy windows, and
//! reports the surviving major events together with a chartable trend series.
//!
//! The engine is pure and stateless: each run is observations in, report
//! out, with no shared mutable state, so detectors can be invoked
//! concurrently across queries without locking. Fetching the volume series,
//! retries, and persistence all belong to the caller.
//!
//! ```
//! use chrono::NaiveDate;
//! use surge_detect::prelude::*;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let observations: Vec<RawObservation> = (0..365)
//!     .map(|i| {
//!         let value = if (200..205).contains(&i) { 500 } else { 10 };
//!         RawObservation::new(start + chrono::Duration::days(i), value)
//!     })
//!     .collect();
//!
//! let report = detect_events("mine protests", &observations, &DetectorConfig::default())?;
//! assert_eq!(report.event_count(), 1);
//! # Ok::<(), DetectError>(())
//! ```

pub mod config;
pub mod core;
pub mod decompose;
pub mod detect;
pub mod detector;
pub mod error;
pub mod report;
pub mod stats;

pub use error::{DetectError, Result};

pub mod prelude {
    pub use crate::config::DetectorConfig;
    pub use crate::core::{DailySeries, RawObservation};
    pub use crate::detect::EventWindow;
    pub use crate::detector::{detect_events, EventDetector};
    pub use crate::error::{DetectError, Result};
    pub use crate::report::{SurgeReport, TimelinePoint};
}
