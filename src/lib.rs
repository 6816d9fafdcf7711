//! # bam2bigwig
//!
//! Convert BAM alignment files into bigWig coverage tracks.
//!
//! The heavy lifting is done by two external programs:
//!
//! 1. `rsem-bam2wig` (RSEM) turns the alignments into a wiggle coverage file
//! 2. `wigToBigWig` (UCSC) encodes the wiggle file as bigWig, using a
//!    chromosome sizes table taken from the BAM header
//!
//! This crate checks paths and permissions before each stage, builds the BAM
//! index when it is missing, runs both tools, explains how they failed (exit
//! code or signal) and removes the intermediate files afterwards.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bam2bigwig::core::ConversionRequest;
//! use bam2bigwig::parsing::bam::BamReferences;
//! use bam2bigwig::pipeline::{FixedAnswer, Pipeline};
//! use bam2bigwig::process::runner::ProcessRunner;
//! use bam2bigwig::process::tools::ToolConfig;
//!
//! let tools = ToolConfig::default();
//! let runner = ProcessRunner::default();
//! let prompt = FixedAnswer(false);
//! let pipeline = Pipeline::new(&tools, &runner, &BamReferences, &prompt);
//!
//! let report = pipeline.convert(&ConversionRequest::new("sample.bam")).unwrap();
//! println!("wrote {}", report.output.display());
//! ```
//!
//! ## Modules
//!
//! - [`core`]: conversion request and chromosome sizes table
//! - [`parsing`]: BAM index and header access
//! - [`process`]: running external tools, signal table, dependency probe
//! - [`pipeline`]: the conversion controller and overwrite prompt
//! - [`utils`]: path and permission checks
//! - [`cli`]: command-line interface implementation

pub mod cli;
pub mod core;
pub mod parsing;
pub mod pipeline;
pub mod process;
pub mod utils;

pub use crate::core::{ConversionRequest, FilterFlags, Reference, SizeTable};
pub use pipeline::{ConversionReport, ConvertError, Pipeline};
