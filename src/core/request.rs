use std::path::{Path, PathBuf};

/// Alignment filters forwarded to rsem-bam2wig, one flag each
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterFlags {
    /// Skip alignments with flag 0x100 (secondary)
    pub ignore_secondary: bool,
    /// Skip alignments with flag 0x200 (not passing quality controls)
    pub ignore_qc_fail: bool,
    /// Skip alignments with flag 0x400 (PCR or optical duplicate)
    pub ignore_duplicate: bool,
    /// Skip alignments with flag 0x800 (supplementary)
    pub ignore_supplementary: bool,
}

impl FilterFlags {
    /// Command-line switches for the enabled filters
    #[must_use]
    pub fn to_args(self) -> Vec<&'static str> {
        [
            (self.ignore_secondary, "--ignore-secondary"),
            (self.ignore_qc_fail, "--ignore-qc-fail"),
            (self.ignore_duplicate, "--ignore-optical-pcr-duplicate"),
            (self.ignore_supplementary, "--ignore-supplementary"),
        ]
        .into_iter()
        .filter_map(|(enabled, arg)| enabled.then_some(arg))
        .collect()
    }
}

/// Everything needed to convert one BAM file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    input: PathBuf,
    output: Option<PathBuf>,
    use_scratch_names: bool,
    keep_intermediates: bool,
    filters: FilterFlags,
}

impl ConversionRequest {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            use_scratch_names: false,
            keep_intermediates: false,
            filters: FilterFlags::default(),
        }
    }

    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    #[must_use]
    pub fn with_scratch_names(mut self, enabled: bool) -> Self {
        self.use_scratch_names = enabled;
        self
    }

    #[must_use]
    pub fn with_keep_intermediates(mut self, enabled: bool) -> Self {
        self.keep_intermediates = enabled;
        self
    }

    #[must_use]
    pub fn with_filters(mut self, filters: FilterFlags) -> Self {
        self.filters = filters;
        self
    }

    #[must_use]
    pub fn input(&self) -> &Path {
        &self.input
    }

    #[must_use]
    pub fn use_scratch_names(&self) -> bool {
        self.use_scratch_names
    }

    #[must_use]
    pub fn keep_intermediates(&self) -> bool {
        self.keep_intermediates
    }

    #[must_use]
    pub fn filters(&self) -> FilterFlags {
        self.filters
    }

    /// Input path with its final extension removed (`data/sample.bam` -> `data/sample`).
    ///
    /// Also used as the track name passed to rsem-bam2wig.
    #[must_use]
    pub fn stem(&self) -> PathBuf {
        self.input.with_extension("")
    }

    /// The explicit output, or `<stem>.bigwig`
    #[must_use]
    pub fn output(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.derived("bigwig"))
    }

    /// `<stem>.<extension>` next to the input
    #[must_use]
    pub fn derived(&self, extension: &str) -> PathBuf {
        self.input.with_extension(extension)
    }
}
