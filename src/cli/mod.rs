//! Command-line interface for bam2bigwig.
//!
//! Every positional argument is a BAM file; each one is converted in turn:
//!
//! ```text
//! # sample.bam -> sample.bigwig
//! bam2bigwig sample.bam
//!
//! # Skip secondary and duplicate alignments, keep sample.wig and sample.sizes
//! bam2bigwig -s -d -k sample.bam
//!
//! # Intermediates in the system temp directory, answer "yes" to overwrites
//! bam2bigwig --tempfile --yes a.bam b.bam
//!
//! # No arguments: usage plus a dependency report
//! bam2bigwig
//! ```

use std::path::{Path, PathBuf};

use clap::{Args, Parser};

use crate::core::request::{ConversionRequest, FilterFlags};
use crate::process::tools::{ToolConfig, BAM2WIG, WIG_TO_BIGWIG};

pub mod convert;

pub use convert::run;

#[derive(Parser)]
#[command(name = "bam2bigwig")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Convert BAM alignments into bigWig coverage tracks")]
#[command(
    long_about = "Convert BAM alignments into bigWig coverage tracks.\n\nEach BAM file is run through rsem-bam2wig (coverage) and wigToBigWig (encoding). The chromosome sizes are taken from the BAM header; a .bai index is built next to the BAM if it is missing.\n\nRequires rsem-bam2wig from RSEM (http://deweylab.biostat.wisc.edu/rsem/) and wigToBigWig from UCSC (http://hgdownload.cse.ucsc.edu/admin/exe/) on the PATH."
)]
pub struct Cli {
    /// Coordinate-sorted BAM files to convert
    #[arg(value_name = "BAM_FILE")]
    pub inputs: Vec<PathBuf>,

    /// Output bigWig file [default: <BAM file prefix>.bigwig]
    #[arg(short = 'o', long = "bigwig-filename", value_name = "PATH")]
    pub bigwig_filename: Option<PathBuf>,

    /// Put intermediate files in the system temp directory instead of
    /// <BAM file prefix>.wig and <BAM file prefix>.sizes
    #[arg(short = 't', long = "tempfile")]
    pub use_tempfile: bool,

    /// Do not delete the intermediate .wig and .sizes files
    #[arg(short = 'k', long = "keep-tempfile")]
    pub keep_tempfile: bool,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Overwrite existing output files without asking
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Program used for the coverage stage
    #[arg(long, value_name = "PROGRAM", env = "BAM2BIGWIG_BAM2WIG", default_value = BAM2WIG)]
    pub bam2wig: String,

    /// Program used for the bigWig encoding stage
    #[arg(long, value_name = "PROGRAM", env = "BAM2BIGWIG_WIGTOBIGWIG", default_value = WIG_TO_BIGWIG)]
    pub wig_to_bigwig: String,

    /// Format of the end-of-run report
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Alignment filters, forwarded to rsem-bam2wig
#[derive(Args, Debug, Clone, Copy)]
pub struct FilterArgs {
    /// Ignore alignments with the "secondary alignment" flag bit 0x100 set
    #[arg(short = 's', long)]
    pub ignore_secondary: bool,

    /// Ignore alignments with the "not passing quality controls" flag bit 0x200 set
    #[arg(short = 'q', long)]
    pub ignore_qc_fail: bool,

    /// Ignore alignments with the "PCR or optical duplicate" flag bit 0x400 set
    #[arg(short = 'd', long)]
    pub ignore_optical_pcr_duplicate: bool,

    /// Ignore alignments with the "supplementary alignment" flag bit 0x800 set
    #[arg(short = 'u', long)]
    pub ignore_supplementary: bool,
}

impl From<FilterArgs> for FilterFlags {
    fn from(args: FilterArgs) -> Self {
        Self {
            ignore_secondary: args.ignore_secondary,
            ignore_qc_fail: args.ignore_qc_fail,
            ignore_duplicate: args.ignore_optical_pcr_duplicate,
            ignore_supplementary: args.ignore_supplementary,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    #[must_use]
    pub fn tool_config(&self) -> ToolConfig {
        ToolConfig {
            bam2wig: self.bam2wig.clone(),
            wig_to_bigwig: self.wig_to_bigwig.clone(),
        }
    }

    /// The request for one input, carrying every option given on the command line
    #[must_use]
    pub fn request_for(&self, input: &Path) -> ConversionRequest {
        let request = ConversionRequest::new(input)
            .with_scratch_names(self.use_tempfile)
            .with_keep_intermediates(self.keep_tempfile)
            .with_filters(self.filters.into());

        match &self.bigwig_filename {
            Some(output) => request.with_output(output),
            None => request,
        }
    }
}
