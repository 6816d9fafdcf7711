//! The conversion pipeline.
//!
//! [`controller::Pipeline`] drives one BAM file through both external stages:
//!
//! ```text
//! sample.bam --rsem-bam2wig--> sample.wig --+
//!      |                                    +--wigToBigWig--> sample.bigwig
//!      +--BAM header--------> sample.sizes -+
//! ```
//!
//! [`prompt`] holds the overwrite confirmation used when the output already exists.

pub mod controller;
pub mod prompt;

pub use controller::{ConversionReport, ConvertError, Pipeline, Stage};
pub use prompt::{Confirm, FixedAnswer, TerminalPrompt};
