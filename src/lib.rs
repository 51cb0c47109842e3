//! `gwref` library crate.
//!
//! Estimates missing or sparse groundwater head readings at an observation
//! well by regressing its history against a better-sampled reference well:
//!
//! - pair two irregularly sampled series within a time tolerance (`align`)
//! - fit a regression and its prediction-interval statistics (`fit`)
//! - scan candidate reference wells for the best fit (`fit::selection`)
//! - persist the well/fit graph as a single JSON document (`io`)
//!
//! The [`Model`] registry ties these together: it owns named wells and the
//! append-only fit history that the persistence layer round-trips.

pub mod align;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod logging;
pub mod math;
pub mod model;

pub use domain::{TimeSeries, Well, WellRole};
pub use error::{GwrefError, Result};
pub use fit::{FitMethod, FitMethodKind, FitParams, FitResult};
pub use model::Model;
