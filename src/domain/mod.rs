//! Domain types used throughout the fit pipeline.
//!
//! This module defines:
//!
//! - validated head-measurement series (`TimeSeries`)
//! - wells with a fixed role and optional geography (`Well`, `WellRole`)

pub mod timeseries;
pub mod well;

pub use timeseries::*;
pub use well::*;
