//! One alignment + regression between two wells.
//!
//! The engine is a pure computation: restrict both series to the calibration
//! window, align them within the offset tolerance, regress, and derive the
//! prediction-interval statistics. Every precondition failure raises a typed
//! error; recording the outcome in a fit history is the caller's job.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::align::align;
use crate::domain::Well;
use crate::error::{GwrefError, Result};
use crate::fit::result::{FitMethod, FitMethodKind, FitResult, LinRegParams};
use crate::math::{linear_regression, t_inv};

/// Default confidence level for prediction intervals.
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Settings for one fit attempt.
#[derive(Debug, Clone)]
pub struct FitParams {
    /// Maximum time gap for two readings to count as the same instant.
    pub offset: Duration,
    /// Confidence level for the prediction interval, `0 < p < 1`.
    pub p: f64,
    /// Inclusive calibration window; `None` bounds are open.
    pub tmin: Option<DateTime<Utc>>,
    pub tmax: Option<DateTime<Utc>>,
    /// Regression method to use.
    pub method: FitMethodKind,
}

impl FitParams {
    pub fn new(offset: Duration) -> Self {
        Self {
            offset,
            p: DEFAULT_CONFIDENCE,
            tmin: None,
            tmax: None,
            method: FitMethodKind::default(),
        }
    }
}

/// Fit the observation well on the reference well by linear regression.
///
/// Preconditions, all checked before any computation: `p` in range, correct
/// roles on both wells, a time series on both wells. Fewer than three
/// aligned pairs is `InsufficientData` — the residual standard error divides
/// by `n - 2` and must never silently produce NaN.
pub fn linear_fit(ref_well: &Well, obs_well: &Well, params: &FitParams) -> Result<FitResult> {
    if !(params.p > 0.0 && params.p < 1.0) {
        return Err(GwrefError::Validation(format!(
            "confidence level must be in (0, 1), got {}",
            params.p
        )));
    }
    if !ref_well.is_reference() {
        return Err(GwrefError::Validation(format!(
            "well '{}' is not a reference well",
            ref_well.name()
        )));
    }
    if obs_well.is_reference() {
        return Err(GwrefError::Validation(format!(
            "well '{}' is not an observation well",
            obs_well.name()
        )));
    }

    let ref_series = ref_well.timeseries().ok_or_else(|| {
        GwrefError::Validation(format!("well '{}' has no time series", ref_well.name()))
    })?;
    let obs_series = obs_well.timeseries().ok_or_else(|| {
        GwrefError::Validation(format!("well '{}' has no time series", obs_well.name()))
    })?;

    let pairs = align(
        ref_series.window(params.tmin, params.tmax),
        obs_series.window(params.tmin, params.tmax),
        params.offset,
    );
    let n = pairs.len();
    if n <= 2 {
        return Err(GwrefError::InsufficientData(format!(
            "only {n} aligned pairs between '{}' and '{}'; need at least 3",
            ref_well.name(),
            obs_well.name()
        )));
    }

    let x = &pairs.ref_values;
    let y = &pairs.obs_values;
    let linreg = linear_regression(x, y)?;

    let stderr = residual_std_error(x, y, linreg.slope, linreg.intercept, n);
    let rmse = root_mean_square_error(x, y, linreg.slope, linreg.intercept);

    let n_f = n as f64;
    let t_a = t_inv((1.0 - params.p) / 2.0, n_f - 1.0)?;
    let pred_const = t_a * stderr * (1.0 + 1.0 / n_f).sqrt();

    debug!(
        ref_well = ref_well.name(),
        obs_well = obs_well.name(),
        n,
        rmse,
        "linear fit completed"
    );

    Ok(FitResult {
        ref_well: ref_well.name().to_string(),
        obs_well: obs_well.name().to_string(),
        method: FitMethod::LinearRegression(LinRegParams {
            slope: linreg.slope,
            intercept: linreg.intercept,
            rvalue: linreg.rvalue,
            pvalue: linreg.pvalue,
            stderr: linreg.stderr,
        }),
        n,
        rmse,
        t_a,
        stderr,
        pred_const,
        p: params.p,
        offset: params.offset,
        tmin: params.tmin,
        tmax: params.tmax,
    })
}

/// Residual standard error on `n - 2` degrees of freedom.
///
/// The middle term removes the residual variation explained by the
/// regressor; for an exact least-squares line it vanishes, since OLS
/// residuals are orthogonal to the regressor.
fn residual_std_error(x: &[f64], y: &[f64], slope: f64, intercept: f64, n: usize) -> f64 {
    let x_mean = x.iter().sum::<f64>() / n as f64;

    let mut rr = 0.0;
    let mut rx = 0.0;
    let mut xx = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let r = yi - (slope * xi + intercept);
        let dx = xi - x_mean;
        rr += r * r;
        rx += r * dx;
        xx += dx * dx;
    }

    let adjusted = (rr - rx * rx / xx).max(0.0);
    (adjusted / (n - 2) as f64).sqrt()
}

/// Root-mean-square of the calibration residuals; the fit quality metric.
fn root_mean_square_error(x: &[f64], y: &[f64], slope: f64, intercept: f64) -> f64 {
    let sse: f64 = x
        .iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| {
            let r = yi - (slope * xi + intercept);
            r * r
        })
        .sum();
    (sse / x.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TimeSeries, WellRole};
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn dt(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn well_with_series(
        name: &str,
        role: WellRole,
        points: Vec<(DateTime<Utc>, f64)>,
    ) -> Well {
        let mut well = Well::new(name, role).unwrap();
        well.set_timeseries(TimeSeries::new(points).unwrap());
        well
    }

    fn daily_points(values: &[f64]) -> Vec<(DateTime<Utc>, f64)> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| (dt(2023, 1, 1) + Duration::days(i as i64), v))
            .collect()
    }

    fn params() -> FitParams {
        FitParams::new(Duration::hours(12))
    }

    #[test]
    fn exact_linear_relation_fits_perfectly() {
        let reference = well_with_series(
            "R-1",
            WellRole::Reference,
            daily_points(&[1.0, 2.0, 3.0, 4.0, 5.0]),
        );
        let obs = well_with_series(
            "O-1",
            WellRole::Observation,
            daily_points(&[3.0, 5.0, 7.0, 9.0, 11.0]),
        );

        let fit = linear_fit(&reference, &obs, &params()).unwrap();
        assert_eq!(fit.n(), 5);
        let FitMethod::LinearRegression(lin) = *fit.method();
        assert_relative_eq!(lin.slope, 2.0, max_relative = 1e-12);
        assert_relative_eq!(lin.intercept, 1.0, max_relative = 1e-12);
        assert_relative_eq!(fit.rmse(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(fit.stderr(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(fit.pred_const(), 0.0, epsilon = 1e-9);
        assert!(fit.t_a() > 0.0);
    }

    #[test]
    fn interval_statistics_match_worked_example() {
        let reference = well_with_series(
            "R-1",
            WellRole::Reference,
            daily_points(&[1.0, 2.0, 3.0, 4.0, 5.0]),
        );
        let obs = well_with_series(
            "O-1",
            WellRole::Observation,
            daily_points(&[2.0, 4.0, 5.0, 4.0, 5.0]),
        );

        let fit = linear_fit(&reference, &obs, &params()).unwrap();
        assert_eq!(fit.n(), 5);
        // Residual sum of squares is 2.4 on 3 degrees of freedom.
        assert_relative_eq!(fit.stderr(), 0.8_f64.sqrt(), max_relative = 1e-9);
        assert_relative_eq!(fit.rmse(), 0.48_f64.sqrt(), max_relative = 1e-9);
        // t_a on n - 1 = 4 degrees of freedom at 95%.
        assert_relative_eq!(fit.t_a(), 2.7764, max_relative = 1e-3);
        assert_relative_eq!(
            fit.pred_const(),
            fit.t_a() * fit.stderr() * 1.2_f64.sqrt(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn calibration_window_restricts_pairs() {
        let reference = well_with_series(
            "R-1",
            WellRole::Reference,
            daily_points(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
        );
        let obs = well_with_series(
            "O-1",
            WellRole::Observation,
            daily_points(&[2.0, 4.0, 6.0, 8.0, 10.0, 12.0]),
        );

        let mut p = params();
        p.tmin = Some(dt(2023, 1, 2));
        p.tmax = Some(dt(2023, 1, 5));

        let fit = linear_fit(&reference, &obs, &p).unwrap();
        assert_eq!(fit.n(), 4);
        assert_eq!(fit.tmin(), Some(dt(2023, 1, 2)));
        assert_eq!(fit.tmax(), Some(dt(2023, 1, 5)));
    }

    #[test]
    fn too_few_pairs_is_insufficient_data() {
        let reference = well_with_series(
            "R-1",
            WellRole::Reference,
            daily_points(&[1.0, 2.0]),
        );
        let obs = well_with_series(
            "O-1",
            WellRole::Observation,
            daily_points(&[3.0, 5.0]),
        );

        let err = linear_fit(&reference, &obs, &params()).unwrap_err();
        assert!(matches!(err, GwrefError::InsufficientData(_)));
    }

    #[test]
    fn disjoint_series_are_insufficient_not_nan() {
        let reference = well_with_series(
            "R-1",
            WellRole::Reference,
            vec![(dt(2024, 1, 1), 1.0), (dt(2024, 1, 2), 2.0), (dt(2024, 1, 3), 3.0)],
        );
        let obs = well_with_series(
            "O-1",
            WellRole::Observation,
            vec![(dt(2020, 1, 1), 1.0), (dt(2020, 1, 2), 2.0), (dt(2020, 1, 3), 3.0)],
        );

        let err = linear_fit(&reference, &obs, &params()).unwrap_err();
        assert!(matches!(err, GwrefError::InsufficientData(_)));
    }

    #[test]
    fn missing_series_is_a_validation_error() {
        let reference = Well::new("R-1", WellRole::Reference).unwrap();
        let obs = well_with_series(
            "O-1",
            WellRole::Observation,
            daily_points(&[1.0, 2.0, 3.0]),
        );

        let err = linear_fit(&reference, &obs, &params()).unwrap_err();
        assert!(matches!(err, GwrefError::Validation(_)));
    }

    #[test]
    fn role_mismatch_fails_before_any_computation() {
        // Wells without series: a role error must fire first.
        let not_a_reference = Well::new("O-2", WellRole::Observation).unwrap();
        let obs = Well::new("O-1", WellRole::Observation).unwrap();
        let err = linear_fit(&not_a_reference, &obs, &params()).unwrap_err();
        assert!(matches!(err, GwrefError::Validation(_)));

        let reference = Well::new("R-1", WellRole::Reference).unwrap();
        let not_an_observation = Well::new("R-2", WellRole::Reference).unwrap();
        let err = linear_fit(&reference, &not_an_observation, &params()).unwrap_err();
        assert!(matches!(err, GwrefError::Validation(_)));
    }

    #[test]
    fn confidence_level_is_validated() {
        let reference = Well::new("R-1", WellRole::Reference).unwrap();
        let obs = Well::new("O-1", WellRole::Observation).unwrap();

        for p in [0.0, 1.0, -0.5, 1.5] {
            let mut bad = params();
            bad.p = p;
            let err = linear_fit(&reference, &obs, &bad).unwrap_err();
            assert!(matches!(err, GwrefError::Validation(_)), "p = {p}");
        }
    }
}
