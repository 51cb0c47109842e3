//! Ordinary least squares for a single regressor.
//!
//! The fit is the classic closed form over centered sums:
//!
//! ```text
//! slope     = Sxy / Sxx
//! intercept = mean(y) - slope * mean(x)
//! r         = Sxy / sqrt(Sxx * Syy)
//! ```
//!
//! with the two-sided p-value of the slope from the t statistic
//! `r * sqrt((n-2) / (1 - r^2))` and the slope standard error from the
//! residual sum of squares. Centering before summing keeps the sums well
//! conditioned for head levels far from zero.

use crate::error::{GwrefError, Result};
use crate::math::student::two_sided_p_value;

/// Summary of a simple linear regression `y ≈ slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRegression {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation coefficient.
    pub rvalue: f64,
    /// Two-sided p-value for the hypothesis that the slope is zero.
    pub pvalue: f64,
    /// Standard error of the slope estimate.
    pub stderr: f64,
}

/// Fit `y` on `x` by ordinary least squares.
///
/// Requires at least three pairs (the p-value has `n - 2` degrees of
/// freedom) and a regressor with non-zero variance.
pub fn linear_regression(x: &[f64], y: &[f64]) -> Result<LinearRegression> {
    if x.len() != y.len() {
        return Err(GwrefError::Validation(format!(
            "regression inputs must have equal length ({} vs {})",
            x.len(),
            y.len()
        )));
    }
    let n = x.len();
    if n < 3 {
        return Err(GwrefError::InsufficientData(format!(
            "linear regression needs at least 3 pairs, got {n}"
        )));
    }

    let n_f = n as f64;
    let x_mean = x.iter().sum::<f64>() / n_f;
    let y_mean = y.iter().sum::<f64>() / n_f;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    if sxx <= 0.0 {
        return Err(GwrefError::Validation(
            "regressor has zero variance; slope is undefined".to_string(),
        ));
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    // A constant response is a legitimate (flat) fit with no correlation.
    let rvalue = if syy <= 0.0 {
        0.0
    } else {
        (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
    };

    let df = (n - 2) as f64;
    let one_minus_r2 = 1.0 - rvalue * rvalue;
    let pvalue = if one_minus_r2 <= f64::EPSILON {
        // Perfect correlation: the t statistic diverges.
        0.0
    } else {
        two_sided_p_value(rvalue * (df / one_minus_r2).sqrt(), df)?
    };

    // Residual sum of squares, guarded against tiny negative rounding.
    let rss = (syy - slope * sxy).max(0.0);
    let stderr = (rss / df / sxx).sqrt();

    Ok(LinearRegression {
        slope,
        intercept,
        rvalue,
        pvalue,
        stderr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn recovers_exact_line() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v + 2.0).collect();

        let fit = linear_regression(&x, &y).unwrap();
        assert_relative_eq!(fit.slope, 3.0, max_relative = 1e-12);
        assert_relative_eq!(fit.intercept, 2.0, max_relative = 1e-12);
        assert_relative_eq!(fit.rvalue, 1.0, max_relative = 1e-12);
        assert_relative_eq!(fit.pvalue, 0.0);
        assert_relative_eq!(fit.stderr, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn matches_hand_computed_summary() {
        // Worked example: x = 1..5, y as below.
        //   slope = 0.6, intercept = 2.2, r = 6/sqrt(60)
        //   stderr = sqrt((1 - r^2) * Syy / Sxx / 3) = sqrt(0.08)
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];

        let fit = linear_regression(&x, &y).unwrap();
        assert_relative_eq!(fit.slope, 0.6, max_relative = 1e-12);
        assert_relative_eq!(fit.intercept, 2.2, max_relative = 1e-12);
        assert_relative_eq!(fit.rvalue, 6.0 / 60.0_f64.sqrt(), max_relative = 1e-12);
        assert_relative_eq!(fit.stderr, 0.08_f64.sqrt(), max_relative = 1e-12);
        // t = r * sqrt(3 / (1 - r^2)) ≈ 2.1213 on 3 degrees of freedom.
        assert!(fit.pvalue > 0.11 && fit.pvalue < 0.14, "p = {}", fit.pvalue);
    }

    #[test]
    fn negative_association_has_negative_r() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y = [10.0, 8.1, 6.2, 3.9, 2.0];

        let fit = linear_regression(&x, &y).unwrap();
        assert!(fit.slope < 0.0);
        assert!(fit.rvalue < -0.99);
        assert!(fit.pvalue < 0.01);
    }

    #[test]
    fn constant_response_is_a_flat_fit() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [5.0, 5.0, 5.0, 5.0];

        let fit = linear_regression(&x, &y).unwrap();
        assert_relative_eq!(fit.slope, 0.0);
        assert_relative_eq!(fit.intercept, 5.0);
        assert_relative_eq!(fit.rvalue, 0.0);
        assert_relative_eq!(fit.pvalue, 1.0, max_relative = 1e-9);
    }

    #[test]
    fn rejects_degenerate_regressor() {
        let x = [2.0, 2.0, 2.0];
        let y = [1.0, 2.0, 3.0];
        let err = linear_regression(&x, &y).unwrap_err();
        assert!(matches!(err, GwrefError::Validation(_)));
    }

    #[test]
    fn rejects_too_few_pairs() {
        let err = linear_regression(&[1.0, 2.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, GwrefError::InsufficientData(_)));
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let err = linear_regression(&[1.0, 2.0, 3.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, GwrefError::Validation(_)));
    }
}
