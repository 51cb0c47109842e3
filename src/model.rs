//! The model registry: named wells plus the append-only fit history.
//!
//! A model owns its wells by name (names are unique; insertion order is
//! preserved for deterministic iteration and persistence) and owns every
//! fit ever computed through it. Wells never hold references back to a
//! model, so a well can be shared across registries by value without any
//! lifetime entanglement.

use tracing::info;

use crate::domain::Well;
use crate::error::{GwrefError, Result};
use crate::fit::engine::{FitParams, linear_fit};
use crate::fit::result::{FitMethodKind, FitResult};
use crate::fit::selection::best_fit_scan;

/// A named collection of wells and the fits computed between them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    name: String,
    wells: Vec<Well>,
    fits: Vec<FitResult>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wells: Vec::new(),
            fits: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ---------------------------------------------------------- wells

    /// Add a well. The name must be unique within the model.
    pub fn add_well(&mut self, well: Well) -> Result<()> {
        if self.well(well.name()).is_some() {
            return Err(GwrefError::Validation(format!(
                "well name '{}' already exists in model '{}'",
                well.name(),
                self.name
            )));
        }
        info!(model = %self.name, well = well.name(), "added well");
        self.wells.push(well);
        Ok(())
    }

    /// Add several wells; stops at the first duplicate name.
    pub fn add_wells(&mut self, wells: Vec<Well>) -> Result<()> {
        for well in wells {
            self.add_well(well)?;
        }
        Ok(())
    }

    /// All wells, in insertion order.
    pub fn wells(&self) -> &[Well] {
        &self.wells
    }

    pub fn well(&self, name: &str) -> Option<&Well> {
        self.wells.iter().find(|w| w.name() == name)
    }

    pub fn well_mut(&mut self, name: &str) -> Option<&mut Well> {
        self.wells.iter_mut().find(|w| w.name() == name)
    }

    pub fn well_names(&self) -> Vec<&str> {
        self.wells.iter().map(Well::name).collect()
    }

    pub fn ref_wells(&self) -> Vec<&Well> {
        self.wells.iter().filter(|w| w.is_reference()).collect()
    }

    pub fn obs_wells(&self) -> Vec<&Well> {
        self.wells.iter().filter(|w| !w.is_reference()).collect()
    }

    // ----------------------------------------------------------- fits

    /// The fit history, oldest first.
    pub fn fits(&self) -> &[FitResult] {
        &self.fits
    }

    /// Every recorded fit the named well participates in.
    pub fn fits_involving(&self, well_name: &str) -> Vec<&FitResult> {
        self.fits.iter().filter(|f| f.involves(well_name)).collect()
    }

    /// Used by the persistence codec to rebuild history in document order.
    pub(crate) fn push_fit(&mut self, fit: FitResult) {
        self.fits.push(fit);
    }

    /// Fit the named observation well on the named reference well and record
    /// the result in the fit history.
    pub fn fit(&mut self, ref_name: &str, obs_name: &str, params: &FitParams) -> Result<&FitResult> {
        let ref_well = self.well(ref_name).ok_or_else(|| {
            GwrefError::NotFound(format!("no well named '{ref_name}' in model '{}'", self.name))
        })?;
        let obs_well = self.well(obs_name).ok_or_else(|| {
            GwrefError::NotFound(format!("no well named '{obs_name}' in model '{}'", self.name))
        })?;

        let fit = match params.method {
            FitMethodKind::LinearRegression => linear_fit(ref_well, obs_well, params)?,
        };
        info!(
            model = %self.name,
            ref_well = ref_name,
            obs_well = obs_name,
            rmse = fit.rmse(),
            "fit recorded"
        );

        let idx = self.fits.len();
        self.fits.push(fit);
        Ok(&self.fits[idx])
    }

    /// Scan candidate reference wells for the best fit of the named
    /// observation well.
    ///
    /// `candidates = None` scans every reference well in the model. All
    /// successful fits are recorded in the history, in candidate order; the
    /// returned reference is the one with the lowest RMSE.
    pub fn best_fit(
        &mut self,
        obs_name: &str,
        candidates: Option<&[&str]>,
        params: &FitParams,
    ) -> Result<&FitResult> {
        let obs_well = self.well(obs_name).ok_or_else(|| {
            GwrefError::NotFound(format!("no well named '{obs_name}' in model '{}'", self.name))
        })?;

        let candidate_wells: Vec<&Well> = match candidates {
            Some(names) => names
                .iter()
                .map(|name| {
                    self.well(name).ok_or_else(|| {
                        GwrefError::NotFound(format!(
                            "no well named '{name}' in model '{}'",
                            self.name
                        ))
                    })
                })
                .collect::<Result<_>>()?,
            None => self.ref_wells(),
        };

        let scan = best_fit_scan(obs_well, &candidate_wells, params)?;
        info!(
            model = %self.name,
            obs_well = obs_name,
            candidates = candidate_wells.len(),
            successes = scan.fits.len(),
            best = scan.best_fit().ref_well(),
            "best-fit scan completed"
        );

        let best = self.fits.len() + scan.best;
        self.fits.extend(scan.fits);
        Ok(&self.fits[best])
    }
}
