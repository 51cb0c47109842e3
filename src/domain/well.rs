//! Wells: named measurement points with a fixed role.
//!
//! A well is either a *reference* well (densely sampled, used as the
//! regression input) or an *observation* well (sparsely sampled, the thing
//! being estimated). The role is decided at construction and never changes;
//! fit code matches on it instead of inspecting the data.

use serde::{Deserialize, Serialize};

use crate::domain::TimeSeries;
use crate::error::{GwrefError, Result};

/// The role a well plays in a fit. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WellRole {
    Reference,
    Observation,
}

/// A measurement point identified by a unique name.
///
/// The head series is optional: wells are often registered before their data
/// arrives. Geographic attributes are optional metadata and take no part in
/// fitting.
#[derive(Debug, Clone, PartialEq)]
pub struct Well {
    name: String,
    role: WellRole,
    timeseries: Option<TimeSeries>,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
}

impl Well {
    /// Create a well. The name is its identity and must be non-empty.
    pub fn new(name: impl Into<String>, role: WellRole) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(GwrefError::Validation(
                "well name cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            name,
            role,
            timeseries: None,
            latitude: None,
            longitude: None,
            elevation: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> WellRole {
        self.role
    }

    pub fn is_reference(&self) -> bool {
        self.role == WellRole::Reference
    }

    /// Attach (or replace) the head series.
    pub fn set_timeseries(&mut self, timeseries: TimeSeries) {
        self.timeseries = Some(timeseries);
    }

    pub fn timeseries(&self) -> Option<&TimeSeries> {
        self.timeseries.as_ref()
    }
}
