//! Reading the reference catalog from alignment files.
//!
//! Only the BAM header is parsed; records are left to the external tools.
//! A BAI index is built next to the input the first time it is opened.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bam2bigwig::parsing::bam::{BamReferences, ReferenceSource};
//! use std::path::Path;
//!
//! let sizes = BamReferences.list_references(Path::new("sample.bam")).unwrap();
//! for reference in sizes.references() {
//!     println!("{}\t{}", reference.name, reference.length);
//! }
//! ```

pub mod bam;
