//! Spike thresholding and gap-tolerant clustering into event windows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::DailySeries;
use crate::detect::zscore::ZScoredPoint;

/// A contiguous window of elevated coverage built from merged spike days.
///
/// Windows are emitted in chronological order, never overlap, and are
/// separated from each other by more than the configured cluster gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Highest z-score among the merged spike days.
    pub peak_z: f64,
    /// Observed daily volume on the peak-z day.
    pub peak_volume: f64,
    /// Sum of observed daily volumes across the window.
    pub total_volume: f64,
    /// Inclusive day count: `end_date - start_date + 1`.
    pub duration_days: i64,
    /// Monotone combination of peak z and total volume.
    pub strength: f64,
}

/// Threshold z-scores into spike days and merge nearby spikes into windows.
///
/// Merging is greedy and transitive: a spike day extends the current window
/// whenever its distance to the window's end is at most `cluster_gap_days`,
/// so day 0 and day 9 still share a window when day 4 bridges them.
/// Ties on z are broken toward the earlier day throughout.
pub fn cluster_spikes(
    points: &[ZScoredPoint],
    series: &DailySeries,
    z_threshold: f64,
    cluster_gap_days: i64,
) -> Vec<EventWindow> {
    let spikes: Vec<&ZScoredPoint> = points.iter().filter(|p| p.z > z_threshold).collect();
    if spikes.is_empty() {
        return Vec::new();
    }

    // Group spike indices; one index per calendar day, so index distance
    // equals day distance.
    let mut groups: Vec<Vec<&ZScoredPoint>> = Vec::new();
    for spike in spikes {
        if let Some(group) = groups.last_mut() {
            let last_index = group[group.len() - 1].index;
            if (spike.index - last_index) as i64 <= cluster_gap_days {
                group.push(spike);
                continue;
            }
        }
        groups.push(vec![spike]);
    }

    groups
        .into_iter()
        .map(|group| summarize_window(&group, series))
        .collect()
}

fn summarize_window(spikes: &[&ZScoredPoint], series: &DailySeries) -> EventWindow {
    let first = spikes[0].index;
    let last = spikes[spikes.len() - 1].index;

    // Strictly-greater comparison keeps the earliest day on z ties.
    let mut peak = spikes[0];
    for &spike in &spikes[1..] {
        if spike.z > peak.z {
            peak = spike;
        }
    }

    let values = series.values();
    let total_volume: f64 = values[first..=last].iter().sum();

    EventWindow {
        start_date: series.date_at(first),
        end_date: series.date_at(last),
        peak_z: peak.z,
        peak_volume: values[peak.index],
        total_volume,
        duration_days: (last - first) as i64 + 1,
        strength: strength(peak.z, total_volume),
    }
}

/// Event strength: peak z damped by log total volume, monotonically
/// increasing in both. The log keeps very large but statistically mild
/// series from dominating on scale alone.
fn strength(peak_z: f64, total_volume: f64) -> f64 {
    peak_z * (1.0 + total_volume).ln()
}
