//! Window strength filtering and global noise rejection.

use tracing::debug;

use crate::config::DetectorConfig;
use crate::detect::cluster::EventWindow;

/// Drop weak candidate windows and apply the series-wide noise rule.
///
/// A window is weak when its peak z falls below `min_peak_z` or its total
/// volume falls below `min_total_volume_ratio` of the whole series' volume.
/// When the weak fraction of the original candidates exceeds
/// `max_noise_window_fraction`, the entire result is discarded: a series
/// dominated by marginal spikes is indistinguishable from noise, and
/// reporting any one of them would be misleading.
///
/// Survivors keep their chronological order.
pub fn filter_windows(
    windows: Vec<EventWindow>,
    series_total_volume: f64,
    config: &DetectorConfig,
) -> Vec<EventWindow> {
    if windows.is_empty() {
        return windows;
    }

    let candidate_count = windows.len();
    let volume_floor = config.min_total_volume_ratio * series_total_volume;

    let survivors: Vec<EventWindow> = windows
        .into_iter()
        .filter(|w| w.peak_z >= config.min_peak_z && w.total_volume >= volume_floor)
        .collect();

    let weak_count = candidate_count - survivors.len();
    let weak_fraction = weak_count as f64 / candidate_count as f64;
    if weak_fraction > config.max_noise_window_fraction {
        debug!(
            candidates = candidate_count,
            weak = weak_count,
            "weak-window fraction over the noise limit, discarding all windows"
        );
        return Vec::new();
    }

    survivors
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn window(day: u32, peak_z: f64, total_volume: f64) -> EventWindow {
        let date = NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        EventWindow {
            start_date: date,
            end_date: date,
            peak_z,
            peak_volume: total_volume,
            total_volume,
            duration_days: 1,
            strength: peak_z * (1.0 + total_volume).ln(),
        }
    }

    fn config() -> DetectorConfig {
        // 5% volume floor over a total of 10_000 -> floor of 500.
        DetectorConfig::default()
    }

    #[test]
    fn strong_windows_survive() {
        let windows = vec![window(1, 6.0, 2_000.0), window(10, 5.0, 1_000.0)];
        let kept = filter_windows(windows.clone(), 10_000.0, &config());
        assert_eq!(kept, windows);
    }

    #[test]
    fn low_peak_z_is_weak() {
        let windows = vec![window(1, 6.0, 2_000.0), window(10, 2.0, 2_000.0)];
        let kept = filter_windows(windows, 10_000.0, &config());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].start_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn low_volume_share_is_weak() {
        let windows = vec![window(1, 6.0, 2_000.0), window(10, 6.0, 100.0)];
        let kept = filter_windows(windows, 10_000.0, &config());
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn mostly_weak_candidates_discard_everything() {
        // Two of three windows are weak: 2/3 > 0.5, so even the strong one goes.
        let windows = vec![
            window(1, 6.0, 2_000.0),
            window(10, 1.0, 50.0),
            window(20, 1.2, 60.0),
        ];
        let kept = filter_windows(windows, 10_000.0, &config());
        assert!(kept.is_empty());
    }

    #[test]
    fn weak_fraction_at_the_limit_is_tolerated() {
        // One of two windows is weak: 0.5 is not over the 0.5 limit.
        let windows = vec![window(1, 6.0, 2_000.0), window(10, 1.0, 50.0)];
        let kept = filter_windows(windows, 10_000.0, &config());
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn empty_input_stays_empty() {
        let kept = filter_windows(Vec::new(), 10_000.0, &config());
        assert!(kept.is_empty());
    }

    #[test]
    fn survivors_stay_chronological() {
        let windows = vec![
            window(1, 4.0, 1_000.0),
            window(10, 8.0, 3_000.0),
            window(20, 5.0, 2_000.0),
        ];
        let kept = filter_windows(windows, 10_000.0, &config());
        let dates: Vec<_> = kept.iter().map(|w| w.start_date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
        assert_eq!(kept.len(), 3);
    }
}
