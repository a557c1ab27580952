//! Constants for post-quantum algorithms

pub mod ml_dsa;
