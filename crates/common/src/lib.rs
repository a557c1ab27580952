//! Common implementations shared by the acvp crates
//!
//! This crate provides the hex codec between protocol strings and
//! capacity-checked buffers, and typed accessors over `serde_json` values
//! that distinguish an absent field from one of the wrong JSON kind.

pub mod codec;
pub mod json;

pub use codec::{bin_to_hex, hex_to_bin, CodecError};
pub use json::{kind_name, JsonKindError};
