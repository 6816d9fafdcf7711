//! Core data types for a conversion.
//!
//! - [`ConversionRequest`]: one input file plus the options that apply to it
//! - [`FilterFlags`]: alignment filters forwarded to the coverage stage
//! - [`SizeTable`]: reference names and lengths written for wigToBigWig

pub mod reference;
pub mod request;

pub use reference::{Reference, SizeTable, SizeTableError};
pub use request::{ConversionRequest, FilterFlags};
