//! Student-t distribution helpers.
//!
//! Thin wrappers around `statrs` so fit code deals in the two quantities it
//! actually needs: a critical value for a two-sided interval and a two-sided
//! tail probability for a t statistic.

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::{GwrefError, Result};

/// Inverse Student-t CDF, negated.
///
/// Called with the lower-tail probability `(1 - p) / 2`, the negation turns
/// the (negative) lower quantile into the positive critical value used for a
/// two-sided interval at confidence level `p`.
pub fn t_inv(probability: f64, degrees_freedom: f64) -> Result<f64> {
    if !(probability > 0.0 && probability < 1.0) {
        return Err(GwrefError::Validation(format!(
            "t quantile probability must be in (0, 1), got {probability}"
        )));
    }
    let dist = student_t(degrees_freedom)?;
    Ok(-dist.inverse_cdf(probability))
}

/// Two-sided tail probability of a t statistic.
pub fn two_sided_p_value(t_stat: f64, degrees_freedom: f64) -> Result<f64> {
    let dist = student_t(degrees_freedom)?;
    Ok(2.0 * (1.0 - dist.cdf(t_stat.abs())))
}

fn student_t(degrees_freedom: f64) -> Result<StudentsT> {
    StudentsT::new(0.0, 1.0, degrees_freedom).map_err(|e| {
        GwrefError::Validation(format!(
            "invalid Student-t degrees of freedom {degrees_freedom}: {e}"
        ))
    })
}
