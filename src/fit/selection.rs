//! Best-fit search over candidate reference wells.
//!
//! The scan fits one observation well against every candidate and keeps all
//! successful results plus the reasons candidates were skipped. Selection is
//! deterministic: minimum quality metric (RMSE), first-encountered minimum
//! wins under the given candidate order.
//!
//! Role errors and an empty candidate set abort the scan up front — they are
//! caller mistakes, not data conditions. Per-candidate failures (no series,
//! too little overlap, degenerate data) are logged and skipped so one bad
//! candidate cannot sink the search.

use tracing::warn;

use crate::domain::Well;
use crate::error::{GwrefError, Result};
use crate::fit::engine::{FitParams, linear_fit};
use crate::fit::result::{FitMethodKind, FitResult};

/// Output of a best-fit scan.
#[derive(Debug)]
pub struct FitScan {
    /// Successful fits, in candidate order.
    pub fits: Vec<FitResult>,
    /// Index of the best fit in `fits`.
    pub best: usize,
    /// Candidates that produced no fit, with the reason each was skipped.
    pub skipped: Vec<(String, GwrefError)>,
}

impl FitScan {
    pub fn best_fit(&self) -> &FitResult {
        &self.fits[self.best]
    }
}

/// Fit `obs_well` against every candidate and select the best result.
pub fn best_fit_scan(
    obs_well: &Well,
    candidates: &[&Well],
    params: &FitParams,
) -> Result<FitScan> {
    if candidates.is_empty() {
        return Err(GwrefError::Validation(
            "no candidate reference wells to scan".to_string(),
        ));
    }
    if obs_well.is_reference() {
        return Err(GwrefError::Validation(format!(
            "well '{}' is not an observation well",
            obs_well.name()
        )));
    }
    for candidate in candidates {
        if !candidate.is_reference() {
            return Err(GwrefError::Validation(format!(
                "candidate well '{}' is not a reference well",
                candidate.name()
            )));
        }
    }

    let mut fits = Vec::new();
    let mut skipped = Vec::new();
    for candidate in candidates {
        match run_fit(candidate, obs_well, params) {
            Ok(fit) => fits.push(fit),
            Err(e) => {
                warn!(
                    candidate = candidate.name(),
                    obs_well = obs_well.name(),
                    error = %e,
                    "skipping candidate"
                );
                skipped.push((candidate.name().to_string(), e));
            }
        }
    }

    if fits.is_empty() {
        return Err(GwrefError::Validation(format!(
            "no usable candidate among {} reference wells for '{}'",
            candidates.len(),
            obs_well.name()
        )));
    }

    // Strict `<` keeps the first-encountered minimum on ties.
    let mut best = 0;
    for (i, fit) in fits.iter().enumerate().skip(1) {
        if fit.rmse < fits[best].rmse {
            best = i;
        }
    }

    Ok(FitScan {
        fits,
        best,
        skipped,
    })
}

fn run_fit(ref_well: &Well, obs_well: &Well, params: &FitParams) -> Result<FitResult> {
    match params.method {
        FitMethodKind::LinearRegression => linear_fit(ref_well, obs_well, params),
    }
}
