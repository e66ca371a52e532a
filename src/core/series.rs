//! Daily series normalization.
//!
//! Upstream volume sources report sparse, possibly unordered daily counts.
//! [`DailySeries`] turns them into a gap-free series at daily cadence, the
//! discrete time index every downstream stage works on.

use crate::error::{DetectError, Result};
use chrono::{Duration, NaiveDate};

/// One raw daily coverage count as reported by the upstream volume source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawObservation {
    /// Calendar day the count applies to.
    pub date: NaiveDate,
    /// Number of documents matching the query on that day.
    pub value: u64,
}

impl RawObservation {
    pub fn new(date: NaiveDate, value: u64) -> Self {
        Self { date, value }
    }
}

/// A gap-free daily series spanning an inclusive date range.
///
/// Index `i` always corresponds to `start + i` days. Days missing from the
/// source are filled by linear interpolation between the nearest known
/// neighbors; a gap touching a series boundary holds the nearest known value
/// instead. Duplicate input dates are rejected rather than silently merged.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    start: NaiveDate,
    values: Vec<f64>,
}

impl DailySeries {
    /// Normalize observations over their full `[min(date), max(date)]` range.
    pub fn from_observations(observations: &[RawObservation]) -> Result<Self> {
        Self::from_observations_in_range(observations, None, None)
    }

    /// Normalize observations, optionally clamped to an explicit range.
    ///
    /// Observations outside `[start, end]` are ignored; days inside the range
    /// without any observation are imputed like any other gap.
    pub fn from_observations_in_range(
        observations: &[RawObservation],
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self> {
        if observations.is_empty() {
            return Err(DetectError::EmptyInput);
        }

        let mut sorted = observations.to_vec();
        sorted.sort_by_key(|obs| obs.date);
        for pair in sorted.windows(2) {
            if pair[0].date == pair[1].date {
                return Err(DetectError::DuplicateObservation { date: pair[0].date });
            }
        }

        let range_start = start.unwrap_or(sorted[0].date);
        let range_end = end.unwrap_or(sorted[sorted.len() - 1].date);
        if range_start > range_end {
            return Err(DetectError::InvalidParameter(
                "range start must not be after range end".to_string(),
            ));
        }

        let len = (range_end - range_start).num_days() as usize + 1;
        let mut values = vec![f64::NAN; len];
        let mut covered = 0usize;
        for obs in &sorted {
            if obs.date < range_start || obs.date > range_end {
                continue;
            }
            let index = (obs.date - range_start).num_days() as usize;
            values[index] = obs.value as f64;
            covered += 1;
        }
        if covered == 0 {
            return Err(DetectError::EmptyInput);
        }

        fill_gaps(&mut values);
        Ok(Self {
            start: range_start,
            values,
        })
    }

    /// Number of days in the series.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// First day of the series.
    pub fn start_date(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the series.
    pub fn end_date(&self) -> NaiveDate {
        self.start + Duration::days(self.values.len() as i64 - 1)
    }

    /// Calendar date of index `i`.
    pub fn date_at(&self, index: usize) -> NaiveDate {
        self.start + Duration::days(index as i64)
    }

    /// The normalized daily values, one per day, no gaps.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Sum of all daily values.
    pub fn total_volume(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Fill NaN gaps in place: linear interpolation between known neighbors,
/// boundary hold at the edges.
fn fill_gaps(values: &mut [f64]) {
    let n = values.len();
    let mut i = 0;
    while i < n {
        if !values[i].is_nan() {
            i += 1;
            continue;
        }

        let gap_start = i;
        while i < n && values[i].is_nan() {
            i += 1;
        }
        let gap_end = i; // exclusive

        let left = (gap_start > 0).then(|| values[gap_start - 1]);
        let right = (gap_end < n).then(|| values[gap_end]);

        match (left, right) {
            (Some(l), Some(r)) => {
                let segments = (gap_end - gap_start + 1) as f64;
                for (offset, slot) in (gap_start..gap_end).enumerate() {
                    let t = (offset + 1) as f64 / segments;
                    values[slot] = l + t * (r - l);
                }
            }
            (Some(l), None) => values[gap_start..gap_end].fill(l),
            (None, Some(r)) => values[gap_start..gap_end].fill(r),
            // All-NaN input is rejected before this point.
            (None, None) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(n as i64 - 1)
    }

    #[test]
    fn contiguous_observations_pass_through() {
        let obs: Vec<_> = (1..=5).map(|i| RawObservation::new(day(i), i as u64)).collect();
        let series = DailySeries::from_observations(&obs).unwrap();

        assert_eq!(series.len(), 5);
        assert_eq!(series.start_date(), day(1));
        assert_eq!(series.end_date(), day(5));
        assert_eq!(series.values(), &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_relative_eq!(series.total_volume(), 15.0, epsilon = 1e-12);
    }

    #[test]
    fn unordered_input_is_sorted() {
        let obs = vec![
            RawObservation::new(day(3), 30),
            RawObservation::new(day(1), 10),
            RawObservation::new(day(2), 20),
        ];
        let series = DailySeries::from_observations(&obs).unwrap();
        assert_eq!(series.values(), &[10.0, 20.0, 30.0]);
    }

    #[test]
    fn interior_gaps_are_linearly_interpolated() {
        let obs = vec![
            RawObservation::new(day(1), 10),
            RawObservation::new(day(4), 40),
        ];
        let series = DailySeries::from_observations(&obs).unwrap();

        assert_eq!(series.len(), 4);
        assert_relative_eq!(series.values()[1], 20.0, epsilon = 1e-10);
        assert_relative_eq!(series.values()[2], 30.0, epsilon = 1e-10);
    }

    #[test]
    fn boundary_gaps_hold_the_nearest_value() {
        let obs = vec![
            RawObservation::new(day(3), 7),
            RawObservation::new(day(5), 9),
        ];
        let series = DailySeries::from_observations_in_range(&obs, Some(day(1)), Some(day(7)))
            .unwrap();

        assert_eq!(series.len(), 7);
        assert_relative_eq!(series.values()[0], 7.0, epsilon = 1e-12);
        assert_relative_eq!(series.values()[1], 7.0, epsilon = 1e-12);
        assert_relative_eq!(series.values()[3], 8.0, epsilon = 1e-12);
        assert_relative_eq!(series.values()[5], 9.0, epsilon = 1e-12);
        assert_relative_eq!(series.values()[6], 9.0, epsilon = 1e-12);
    }

    #[test]
    fn duplicate_dates_are_rejected() {
        let obs = vec![
            RawObservation::new(day(1), 10),
            RawObservation::new(day(2), 20),
            RawObservation::new(day(2), 25),
        ];
        let result = DailySeries::from_observations(&obs);
        assert_eq!(
            result,
            Err(DetectError::DuplicateObservation { date: day(2) })
        );
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(
            DailySeries::from_observations(&[]),
            Err(DetectError::EmptyInput)
        );
    }

    #[test]
    fn range_clamp_drops_outside_observations() {
        let obs: Vec<_> = (1..=10).map(|i| RawObservation::new(day(i), i as u64)).collect();
        let series = DailySeries::from_observations_in_range(&obs, Some(day(3)), Some(day(6)))
            .unwrap();

        assert_eq!(series.len(), 4);
        assert_eq!(series.start_date(), day(3));
        assert_eq!(series.values(), &[3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn range_with_no_covered_observations_is_rejected() {
        let obs = vec![RawObservation::new(day(1), 10)];
        let result = DailySeries::from_observations_in_range(&obs, Some(day(5)), Some(day(8)));
        assert_eq!(result, Err(DetectError::EmptyInput));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let obs = vec![RawObservation::new(day(1), 10)];
        let result = DailySeries::from_observations_in_range(&obs, Some(day(5)), Some(day(2)));
        assert!(matches!(result, Err(DetectError::InvalidParameter(_))));
    }

    #[test]
    fn date_index_round_trip() {
        let obs = vec![
            RawObservation::new(day(1), 1),
            RawObservation::new(day(10), 2),
        ];
        let series = DailySeries::from_observations(&obs).unwrap();
        for i in 0..series.len() {
            assert_eq!(series.date_at(i), day(1 + i as u32));
        }
    }
}
