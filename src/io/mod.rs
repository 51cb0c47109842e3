//! Persistence.
//!
//! - model graph ⇄ primitive JSON document (`codec`)
//! - extension-checked project files on disk (`project`)

pub mod codec;
pub mod project;

pub use codec::*;
pub use project::*;
