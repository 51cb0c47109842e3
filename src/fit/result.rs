//! Immutable fit outcomes.
//!
//! A [`FitResult`] records one completed fit between a reference and an
//! observation well: the method parameters, the interval statistics, and the
//! calibration settings that produced them. It references wells by name —
//! identity, not data — so a result stays valid however the well's series is
//! later displayed or extended, and so persistence can re-link results to
//! reconstructed wells.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GwrefError, Result};

/// Parameters of a fitted regression line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinRegParams {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation coefficient of the calibration pairs.
    pub rvalue: f64,
    /// Two-sided p-value for a zero slope.
    pub pvalue: f64,
    /// Standard error of the slope estimate.
    pub stderr: f64,
}

/// The regression method used for a fit, with its parameters.
///
/// New variants (and their document tags) can be added without touching the
/// surrounding record; decoding an unknown tag is a `NotFound` error rather
/// than a silent default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitMethod {
    LinearRegression(LinRegParams),
}

impl FitMethod {
    /// Document tag for the linear-regression payload.
    pub const LINREG_TAG: &'static str = "LinRegResult";

    /// The tag naming this method's payload in the persisted document.
    pub fn tag(&self) -> &'static str {
        match self {
            FitMethod::LinearRegression(_) => Self::LINREG_TAG,
        }
    }

    /// Apply the fitted transfer function to one reference value.
    pub fn predict_one(&self, x: f64) -> f64 {
        match self {
            FitMethod::LinearRegression(p) => p.slope * x + p.intercept,
        }
    }
}

/// A fit method requested by name, before any parameters exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMethodKind {
    #[default]
    LinearRegression,
}

impl FitMethodKind {
    /// Resolve a user-supplied method name.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "linearregression" => Ok(FitMethodKind::LinearRegression),
            other => Err(GwrefError::UnsupportedOperation(format!(
                "unknown fit method '{other}'"
            ))),
        }
    }
}

/// The immutable record of one fit.
///
/// Created by the regression engine (or rebuilt by the persistence codec);
/// owned by a model's fit history.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    pub(crate) ref_well: String,
    pub(crate) obs_well: String,
    pub(crate) method: FitMethod,
    /// Number of aligned calibration pairs.
    pub(crate) n: usize,
    /// Root-mean-square of the calibration residuals; lower is better.
    pub(crate) rmse: f64,
    /// Critical t-value for the two-sided interval.
    pub(crate) t_a: f64,
    /// Residual standard error.
    pub(crate) stderr: f64,
    /// Prediction-interval half-width.
    pub(crate) pred_const: f64,
    /// Confidence level used for the interval.
    pub(crate) p: f64,
    /// Offset tolerance used for alignment.
    pub(crate) offset: Duration,
    /// Calibration window, inclusive on both ends when set.
    pub(crate) tmin: Option<DateTime<Utc>>,
    pub(crate) tmax: Option<DateTime<Utc>>,
}

impl FitResult {
    pub fn ref_well(&self) -> &str {
        &self.ref_well
    }

    pub fn obs_well(&self) -> &str {
        &self.obs_well
    }

    pub fn method(&self) -> &FitMethod {
        &self.method
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn rmse(&self) -> f64 {
        self.rmse
    }

    pub fn t_a(&self) -> f64 {
        self.t_a
    }

    pub fn stderr(&self) -> f64 {
        self.stderr
    }

    pub fn pred_const(&self) -> f64 {
        self.pred_const
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn offset(&self) -> Duration {
        self.offset
    }

    pub fn tmin(&self) -> Option<DateTime<Utc>> {
        self.tmin
    }

    pub fn tmax(&self) -> Option<DateTime<Utc>> {
        self.tmax
    }

    /// Project reference-well values onto the observation well's scale.
    pub fn predict(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&x| self.method.predict_one(x)).collect()
    }

    /// Fitted values with the prediction band around them:
    /// `(fitted - pred_const, fitted + pred_const)`.
    pub fn prediction_bounds(&self, values: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let fitted = self.predict(values);
        let lower = fitted.iter().map(|v| v - self.pred_const).collect();
        let upper = fitted.iter().map(|v| v + self.pred_const).collect();
        (lower, upper)
    }

    /// Whether the named well is one of this fit's two participants.
    pub fn involves(&self, well_name: &str) -> bool {
        self.ref_well == well_name || self.obs_well == well_name
    }
}
