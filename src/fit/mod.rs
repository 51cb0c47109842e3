//! The regression fit engine.
//!
//! Responsibilities:
//!
//! - run one alignment + regression between a reference and an observation
//!   well (`engine`)
//! - carry the immutable outcome of a fit (`result`)
//! - scan candidate reference wells for the best fit (`selection`)

pub mod engine;
pub mod result;
pub mod selection;

pub use engine::*;
pub use result::*;
pub use selection::*;
