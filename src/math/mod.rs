//! Mathematical utilities: least-squares summary statistics and Student-t
//! distribution helpers.

pub mod linreg;
pub mod student;

pub use linreg::*;
pub use student::*;
