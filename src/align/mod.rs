//! Time alignment of two irregularly sampled series.
//!
//! Reference and observation wells are rarely measured at the same instant.
//! Alignment merges both series on the time axis and splits the merged
//! sequence into *time-equivalent groups*: maximal runs of timestamps whose
//! consecutive gaps never exceed the offset tolerance. Readings inside one
//! group are treated as the same real-world measurement instant.
//!
//! Per group, each source series contributes the arithmetic mean of its
//! readings; groups missing either source are dropped. The output is the
//! paired sample the regression runs on.

use chrono::{DateTime, Duration, Utc};

/// Equal-length paired values produced by [`align`], in group order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedPairs {
    pub ref_values: Vec<f64>,
    pub obs_values: Vec<f64>,
}

impl AlignedPairs {
    /// Number of aligned pairs.
    pub fn len(&self) -> usize {
        self.ref_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ref_values.is_empty()
    }
}

/// One reading in the merged sequence, tagged with its source series.
#[derive(Debug, Clone, Copy)]
struct Tagged {
    at: DateTime<Utc>,
    value: f64,
    is_ref: bool,
}

/// Pair up two time-ordered series within the offset tolerance.
///
/// A gap strictly greater than `offset` starts a new group; a gap exactly
/// equal to the tolerance merges. Zero surviving groups is a valid result
/// (disjoint measurement campaigns), not an error.
pub fn align(
    reference: &[(DateTime<Utc>, f64)],
    observation: &[(DateTime<Utc>, f64)],
    offset: Duration,
) -> AlignedPairs {
    let merged = merge_sorted(reference, observation);

    let mut pairs = AlignedPairs::default();
    let mut group = GroupAccumulator::default();
    let mut prev: Option<DateTime<Utc>> = None;

    for reading in merged {
        if let Some(prev) = prev {
            if reading.at - prev > offset {
                group.flush_into(&mut pairs);
            }
        }
        group.add(reading);
        prev = Some(reading.at);
    }
    group.flush_into(&mut pairs);

    pairs
}

/// Merge the two already-sorted series into one timestamp-ordered sequence.
fn merge_sorted(
    reference: &[(DateTime<Utc>, f64)],
    observation: &[(DateTime<Utc>, f64)],
) -> Vec<Tagged> {
    let mut merged = Vec::with_capacity(reference.len() + observation.len());
    let (mut i, mut j) = (0, 0);
    while i < reference.len() && j < observation.len() {
        if reference[i].0 <= observation[j].0 {
            merged.push(Tagged {
                at: reference[i].0,
                value: reference[i].1,
                is_ref: true,
            });
            i += 1;
        } else {
            merged.push(Tagged {
                at: observation[j].0,
                value: observation[j].1,
                is_ref: false,
            });
            j += 1;
        }
    }
    for &(at, value) in &reference[i..] {
        merged.push(Tagged {
            at,
            value,
            is_ref: true,
        });
    }
    for &(at, value) in &observation[j..] {
        merged.push(Tagged {
            at,
            value,
            is_ref: false,
        });
    }
    merged
}

/// Per-group running sums for each source series.
#[derive(Debug, Default)]
struct GroupAccumulator {
    ref_sum: f64,
    ref_count: usize,
    obs_sum: f64,
    obs_count: usize,
}

impl GroupAccumulator {
    fn add(&mut self, reading: Tagged) {
        if reading.is_ref {
            self.ref_sum += reading.value;
            self.ref_count += 1;
        } else {
            self.obs_sum += reading.value;
            self.obs_count += 1;
        }
    }

    /// Emit the group means if both sources contributed, then reset.
    fn flush_into(&mut self, pairs: &mut AlignedPairs) {
        if self.ref_count > 0 && self.obs_count > 0 {
            pairs.ref_values.push(self.ref_sum / self.ref_count as f64);
            pairs.obs_values.push(self.obs_sum / self.obs_count as f64);
        }
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn dt(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn series(points: &[(DateTime<Utc>, f64)]) -> Vec<(DateTime<Utc>, f64)> {
        points.to_vec()
    }

    #[test]
    fn pairs_monthly_readings_within_tolerance() {
        let obs = series(&[
            (dt(2023, 1, 7), 11.4),
            (dt(2023, 2, 1), 11.7),
            (dt(2023, 2, 25), 11.8),
        ]);
        let reference = series(&[
            (dt(2023, 1, 8), 8.9),
            (dt(2023, 2, 3), 9.2),
            (dt(2023, 2, 8), 9.3),
            (dt(2023, 2, 25), 9.3),
            (dt(2023, 2, 28), 9.5),
        ]);

        // 3.5 days: the 02-08 reference reading has no observation partner
        // and is dropped; 02-25 and 02-28 fall into one group and average.
        let pairs = align(&reference, &obs, Duration::hours(84));

        assert_eq!(pairs.len(), 3);
        assert_relative_eq!(pairs.ref_values[0], 8.9);
        assert_relative_eq!(pairs.ref_values[1], 9.2);
        assert_relative_eq!(pairs.ref_values[2], 9.4);
        assert_eq!(pairs.obs_values, vec![11.4, 11.7, 11.8]);
    }

    #[test]
    fn disjoint_campaigns_produce_no_pairs() {
        let obs = series(&[(dt(2020, 3, 1), 10.0), (dt(2020, 9, 1), 10.2)]);
        let reference = series(&[(dt(2024, 3, 1), 7.0), (dt(2024, 9, 1), 7.2)]);

        let pairs = align(&reference, &obs, Duration::days(7));
        assert_eq!(pairs.len(), 0);
        assert!(pairs.ref_values.is_empty());
        assert!(pairs.obs_values.is_empty());
    }

    #[test]
    fn gap_exactly_at_tolerance_merges() {
        let reference = series(&[(dt(2023, 1, 1), 5.0)]);
        let obs = series(&[(dt(2023, 1, 4), 6.0)]);

        let merged = align(&reference, &obs, Duration::days(3));
        assert_eq!(merged.len(), 1);

        let split = align(&reference, &obs, Duration::days(3) - Duration::seconds(1));
        assert_eq!(split.len(), 0);
    }

    #[test]
    fn pair_count_never_exceeds_shorter_input() {
        let reference = series(&[
            (dt(2023, 1, 1), 1.0),
            (dt(2023, 1, 2), 2.0),
            (dt(2023, 1, 3), 3.0),
            (dt(2023, 1, 10), 4.0),
            (dt(2023, 1, 20), 5.0),
        ]);
        let obs = series(&[(dt(2023, 1, 2), 9.0), (dt(2023, 1, 19), 9.5)]);

        for days in [1, 2, 5, 30] {
            let pairs = align(&reference, &obs, Duration::days(days));
            assert!(pairs.len() <= obs.len().min(reference.len()));
        }
    }

    #[test]
    fn empty_inputs_are_not_an_error() {
        let reference = series(&[(dt(2023, 1, 1), 1.0)]);
        let pairs = align(&reference, &[], Duration::days(1));
        assert!(pairs.is_empty());

        let pairs = align(&[], &[], Duration::days(1));
        assert!(pairs.is_empty());
    }

    #[test]
    fn coincident_timestamps_pair_up() {
        let reference = series(&[(dt(2023, 1, 1), 1.0), (dt(2023, 1, 8), 2.0)]);
        let obs = series(&[(dt(2023, 1, 1), 3.0), (dt(2023, 1, 8), 4.0)]);

        let pairs = align(&reference, &obs, Duration::days(1));
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs.ref_values, vec![1.0, 2.0]);
        assert_eq!(pairs.obs_values, vec![3.0, 4.0]);
    }
}
