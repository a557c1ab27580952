//! Constant values for the acvp engine
//!
//! Object sizes of the supported algorithms and the buffer capacities the
//! engine reserves for each family's hex fields.

pub mod pqc;
pub mod utils;
