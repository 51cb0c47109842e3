//! Validated head-measurement series.
//!
//! A `TimeSeries` is an ordered sequence of `(timestamp, head)` points.
//! Validation happens once, at construction, so every consumer (alignment,
//! regression, persistence) can rely on the invariants:
//!
//! - at least one point
//! - timestamps strictly increasing (hence unique)
//! - head values finite

use chrono::{DateTime, Utc};

use crate::error::{GwrefError, Result};

/// An ordered series of head measurements with unique timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    points: Vec<(DateTime<Utc>, f64)>,
}

impl TimeSeries {
    /// Build a series from `(timestamp, value)` pairs, validating the
    /// ordering and value invariants.
    pub fn new(points: Vec<(DateTime<Utc>, f64)>) -> Result<Self> {
        if points.is_empty() {
            return Err(GwrefError::Validation(
                "time series cannot be empty".to_string(),
            ));
        }
        for window in points.windows(2) {
            if window[1].0 <= window[0].0 {
                return Err(GwrefError::Validation(format!(
                    "time series timestamps must be strictly increasing ({} followed by {})",
                    window[0].0, window[1].0
                )));
            }
        }
        if let Some((t, v)) = points.iter().find(|(_, v)| !v.is_finite()) {
            return Err(GwrefError::Validation(format!(
                "time series value at {t} is not finite ({v})"
            )));
        }
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points, in timestamp order.
    pub fn points(&self) -> &[(DateTime<Utc>, f64)] {
        &self.points
    }

    /// The sub-slice of points inside the inclusive `[tmin, tmax]` window.
    ///
    /// `None` bounds are open on that side. The result can be empty; that is
    /// a valid (if unproductive) calibration window, not an error.
    pub fn window(
        &self,
        tmin: Option<DateTime<Utc>>,
        tmax: Option<DateTime<Utc>>,
    ) -> &[(DateTime<Utc>, f64)] {
        let lo = match tmin {
            Some(tmin) => self.points.partition_point(|(t, _)| *t < tmin),
            None => 0,
        };
        let hi = match tmax {
            Some(tmax) => self.points.partition_point(|(t, _)| *t <= tmax),
            None => self.points.len(),
        };
        if lo >= hi { &[] } else { &self.points[lo..hi] }
    }
}
