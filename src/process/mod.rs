//! Launching the external stage tools.
//!
//! - [`runner`]: run a tool to completion and classify its exit status
//! - [`signals`]: the signal table used to annotate tools killed by a signal
//! - [`tools`]: program names of both stages and the dependency probe

pub mod runner;
pub mod signals;
pub mod tools;
