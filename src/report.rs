//! Final report assembly.
//!
//! Pure assembly of the pipeline's outputs into the payload consumed by
//! callers and charting layers. No filtering happens here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::DailySeries;
use crate::decompose::Decomposition;
use crate::detect::EventWindow;

/// One chartable day of the analyzed series. Sequential and gap-free.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    /// Normalized observed volume.
    pub observed: f64,
    /// Observed minus residual: trend plus seasonal.
    pub smoothed: f64,
    pub trend: f64,
}

/// Complete result of one detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurgeReport {
    /// The query the volume series was fetched for.
    pub query: String,
    /// Human-readable summary: event count and the range analyzed.
    pub summary: String,
    /// The full analyzed series with its smoothed and trend components.
    pub timeline: Vec<TimelinePoint>,
    /// Surviving major events, in chronological order.
    pub events: Vec<EventWindow>,
}

impl SurgeReport {
    pub(crate) fn assemble(
        query: &str,
        series: &DailySeries,
        decomposition: &Decomposition,
        events: Vec<EventWindow>,
    ) -> Self {
        let timeline = series
            .values()
            .iter()
            .enumerate()
            .map(|(i, &observed)| TimelinePoint {
                date: series.date_at(i),
                observed,
                smoothed: decomposition.trend[i] + decomposition.seasonal[i],
                trend: decomposition.trend[i],
            })
            .collect();

        let summary = match events.len() {
            0 => format!(
                "no major events detected between {} and {} ({} days analyzed)",
                series.start_date(),
                series.end_date(),
                series.len()
            ),
            n => format!(
                "{} major event(s) detected between {} and {} ({} days analyzed)",
                n,
                series.start_date(),
                series.end_date(),
                series.len()
            ),
        };

        Self {
            query: query.to_string(),
            summary,
            timeline,
            events,
        }
    }

    /// Number of major events in the report.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// First and last analyzed day, if any data was analyzed.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.timeline.first(), self.timeline.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}
