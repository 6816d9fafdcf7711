use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::request::ConversionRequest;
use crate::parsing::bam::{IndexError, ReferenceSource};
use crate::pipeline::prompt::Confirm;
use crate::process::runner::{StageOutcome, ToolCommand, ToolRunner};
use crate::process::tools::ToolConfig;
use crate::utils::validation::{absolute_path, can_write, denied_path, is_nonempty_file, same_path};

/// Weighting passed to rsem-bam2wig: every alignment counts as one read
pub const WEIGHTING_MODE: &str = "--no-fractional-weight";

const OVERWRITE_QUESTION: &str = "Output file exists and not empty, overwrite?";

/// The two external steps of a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// BAM -> wiggle (rsem-bam2wig)
    Coverage,
    /// wiggle + sizes -> bigWig (wigToBigWig)
    BigWig,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coverage => write!(f, "coverage"),
            Self::BigWig => write!(f, "bigWig"),
        }
    }
}

/// Where a single conversion currently is.
///
/// Every failure is terminal; there are no retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConversionState {
    ValidatePaths,
    Stage1Running,
    Stage1Done,
    SizesWritten,
    Stage2Running,
    Stage2Done,
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Input file does not exist or is not a file: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Bad arguments, input and output files are the same: {}", .0.display())]
    SameInputOutput(PathBuf),

    #[error("Intermediate file would overwrite the input or output: {}", .0.display())]
    IntermediateOverlap(PathBuf),

    #[error("Output file exists and not empty, not overwriting: {}", .0.display())]
    OverwriteDeclined(PathBuf),

    #[error("Write permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("Failed to launch {program}: {source}")]
    Launch { program: String, source: io::Error },

    #[error("\"{command}\" {outcome}")]
    StageFailed {
        stage: Stage,
        command: String,
        outcome: StageOutcome,
    },

    #[error("Refusing to run wigToBigWig, intermediate file is missing or empty: {}", .0.display())]
    EmptyIntermediate(PathBuf),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Files produced by one successful conversion
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub coverage: PathBuf,
    pub sizes: PathBuf,
    pub references: usize,
    pub intermediates_kept: bool,
}

/// Runs rsem-bam2wig then wigToBigWig for one BAM file.
///
/// The runner, reference source and prompt are injected so the control flow
/// can be exercised without the real tools or a terminal.
pub struct Pipeline<'a> {
    tools: &'a ToolConfig,
    runner: &'a dyn ToolRunner,
    references: &'a dyn ReferenceSource,
    prompt: &'a dyn Confirm,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        tools: &'a ToolConfig,
        runner: &'a dyn ToolRunner,
        references: &'a dyn ReferenceSource,
        prompt: &'a dyn Confirm,
    ) -> Self {
        Self {
            tools,
            runner,
            references,
            prompt,
        }
    }

    /// Convert `request.input()` into a bigWig file.
    ///
    /// Intermediates are removed after success unless the request keeps them,
    /// and are always left on disk after a failure.
    ///
    /// # Errors
    ///
    /// Returns a `ConvertError` describing the first precondition, permission
    /// check, or stage that failed. Nothing after that point is attempted.
    pub fn convert(&self, request: &ConversionRequest) -> Result<ConversionReport, ConvertError> {
        let input = request.input();
        let output = request.output();
        transition(ConversionState::ValidatePaths, input);

        if !input.is_file() {
            return Err(ConvertError::MissingInput(input.to_path_buf()));
        }

        if same_path(input, &output)? {
            return Err(ConvertError::SameInputOutput(absolute_path(input)?));
        }

        if is_nonempty_file(&output) && !self.prompt.confirm(OVERWRITE_QUESTION, false)? {
            return Err(ConvertError::OverwriteDeclined(output));
        }

        let coverage = intermediate_path(request, "wig")?;
        check_overlap(&coverage, input, &output)?;
        let sizes = intermediate_path(request, "sizes")?;
        check_overlap(&sizes, input, &output)?;

        info!("Building wig file: {}", coverage.display());
        ensure_writable(&coverage)?;
        transition(ConversionState::Stage1Running, input);
        self.run_stage(Stage::Coverage, &self.coverage_command(request, &coverage))?;
        transition(ConversionState::Stage1Done, input);

        info!("Building sizes file: {}", sizes.display());
        let references = self.write_sizes(input, &sizes)?;
        transition(ConversionState::SizesWritten, input);

        for path in [&coverage, &sizes] {
            if !is_nonempty_file(path) {
                return Err(ConvertError::EmptyIntermediate(path.clone()));
            }
        }

        info!("Building bigwig file: {}", output.display());
        ensure_writable(&output)?;
        transition(ConversionState::Stage2Running, input);
        self.run_stage(Stage::BigWig, &self.bigwig_command(&coverage, &sizes, &output))?;
        transition(ConversionState::Stage2Done, input);

        let keep = request.keep_intermediates();
        if !keep {
            remove_intermediate(&sizes);
            remove_intermediate(&coverage);
        }

        Ok(ConversionReport {
            input: input.to_path_buf(),
            output,
            coverage,
            sizes,
            references,
            intermediates_kept: keep,
        })
    }

    /// `rsem-bam2wig <bam> <wig> <track name> --no-fractional-weight [filters]`
    fn coverage_command(&self, request: &ConversionRequest, coverage: &Path) -> ToolCommand {
        let mut command = ToolCommand::new(&self.tools.bam2wig)
            .arg(request.input())
            .arg(coverage)
            .arg(request.stem())
            .arg(WEIGHTING_MODE);
        for filter in request.filters().to_args() {
            command = command.arg(filter);
        }
        command
    }

    /// `wigToBigWig <wig> <sizes> <bigwig>`
    fn bigwig_command(&self, coverage: &Path, sizes: &Path, output: &Path) -> ToolCommand {
        ToolCommand::new(&self.tools.wig_to_bigwig)
            .arg(coverage)
            .arg(sizes)
            .arg(output)
    }

    fn run_stage(&self, stage: Stage, command: &ToolCommand) -> Result<StageOutcome, ConvertError> {
        let outcome = self
            .runner
            .run(command)
            .map_err(|source| ConvertError::Launch {
                program: command.program.clone(),
                source,
            })?;

        if outcome.success {
            Ok(outcome)
        } else {
            Err(ConvertError::StageFailed {
                stage,
                command: command.to_string(),
                outcome,
            })
        }
    }

    /// Write the reference catalog of `input` to `sizes`; returns the number of references
    fn write_sizes(&self, input: &Path, sizes: &Path) -> Result<usize, ConvertError> {
        let table = self.references.list_references(input)?;

        match table.write_file(sizes) {
            Ok(()) => Ok(table.len()),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                Err(ConvertError::PermissionDenied(absolute_path(sizes)?))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn transition(state: ConversionState, input: &Path) {
    debug!(?state, input = %input.display(), "Conversion state");
}

/// `<stem>.<extension>` next to the input, or a fresh file in the system
/// temp directory when scratch names were requested
fn intermediate_path(request: &ConversionRequest, extension: &str) -> io::Result<PathBuf> {
    if !request.use_scratch_names() {
        return Ok(request.derived(extension));
    }

    tempfile::Builder::new()
        .prefix("bam2bigwig-")
        .suffix(&format!(".{extension}"))
        .tempfile()?
        .into_temp_path()
        .keep()
        .map_err(|e| e.error)
}

fn check_overlap(intermediate: &Path, input: &Path, output: &Path) -> Result<(), ConvertError> {
    if same_path(intermediate, input)? || same_path(intermediate, output)? {
        return Err(ConvertError::IntermediateOverlap(absolute_path(intermediate)?));
    }
    Ok(())
}

fn ensure_writable(path: &Path) -> Result<(), ConvertError> {
    if can_write(path)? {
        Ok(())
    } else {
        Err(ConvertError::PermissionDenied(denied_path(path)?))
    }
}

fn remove_intermediate(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "Removed intermediate file"),
        Err(e) => warn!("Could not remove intermediate file {}: {e}", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reference::{Reference, SizeTable};
    use crate::core::request::FilterFlags;
    use crate::pipeline::prompt::FixedAnswer;
    use crate::process::signals::UNIX_SIGNALS;
    use std::cell::RefCell;
    use std::ffi::OsString;
    use tempfile::TempDir;

    /// Pretends to be both tools: records each call, writes the stage's output
    /// file on success and returns the scripted exit statuses in order.
    struct StubRunner {
        tools: ToolConfig,
        statuses: Vec<i32>,
        write_outputs: bool,
        calls: RefCell<Vec<ToolCommand>>,
    }

    impl StubRunner {
        fn new(statuses: &[i32]) -> Self {
            Self {
                tools: ToolConfig::default(),
                statuses: statuses.to_vec(),
                write_outputs: true,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<ToolCommand> {
            self.calls.borrow().clone()
        }
    }

    impl ToolRunner for StubRunner {
        fn run(&self, command: &ToolCommand) -> io::Result<StageOutcome> {
            let index = self.calls.borrow().len();
            self.calls.borrow_mut().push(command.clone());

            let status = self.statuses.get(index).copied().unwrap_or(0);
            if status == 0 && self.write_outputs {
                let target = if command.program == self.tools.bam2wig {
                    &command.args[1]
                } else {
                    &command.args[2]
                };
                fs::write(target, "variableStep chrom=chr1\n1\t2\n")?;
            }
            Ok(StageOutcome::classify(status, &UNIX_SIGNALS))
        }
    }

    struct MissingRunner;

    impl ToolRunner for MissingRunner {
        fn run(&self, _command: &ToolCommand) -> io::Result<StageOutcome> {
            Err(io::Error::from(io::ErrorKind::NotFound))
        }
    }

    struct StubReferences;

    impl ReferenceSource for StubReferences {
        fn list_references(&self, _path: &Path) -> Result<SizeTable, IndexError> {
            Ok(SizeTable::new(vec![
                Reference::new("chr1", 1000),
                Reference::new("chr2", 2000),
            ])?)
        }
    }

    /// Fails the test if the pipeline asks anything
    struct NoPrompt;

    impl Confirm for NoPrompt {
        fn confirm(&self, question: &str, _default: bool) -> io::Result<bool> {
            panic!("unexpected prompt: {question}");
        }
    }

    struct Fixture {
        dir: TempDir,
        tools: ToolConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            fs::write(dir.path().join("sample.bam"), b"BAM\x01").unwrap();
            Self {
                dir,
                tools: ToolConfig::default(),
            }
        }

        fn path(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }

        fn request(&self) -> ConversionRequest {
            ConversionRequest::new(self.path("sample.bam"))
        }

        fn convert(
            &self,
            runner: &dyn ToolRunner,
            prompt: &dyn Confirm,
            request: &ConversionRequest,
        ) -> Result<ConversionReport, ConvertError> {
            Pipeline::new(&self.tools, runner, &StubReferences, prompt).convert(request)
        }
    }

    fn args(command: &ToolCommand) -> Vec<OsString> {
        command.args.clone()
    }

    #[test]
    fn test_success_removes_intermediates() {
        let fx = Fixture::new();
        let runner = StubRunner::new(&[0, 0]);

        let report = fx.convert(&runner, &NoPrompt, &fx.request()).unwrap();

        assert_eq!(report.output, fx.path("sample.bigwig"));
        assert_eq!(report.references, 2);
        assert!(!report.intermediates_kept);
        assert!(fx.path("sample.bigwig").exists());
        assert!(!fx.path("sample.wig").exists());
        assert!(!fx.path("sample.sizes").exists());

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].program, "rsem-bam2wig");
        assert_eq!(
            args(&calls[0]),
            vec![
                OsString::from(fx.path("sample.bam")),
                OsString::from(fx.path("sample.wig")),
                OsString::from(fx.path("sample")),
                OsString::from("--no-fractional-weight"),
            ]
        );
        assert_eq!(calls[1].program, "wigToBigWig");
        assert_eq!(
            args(&calls[1]),
            vec![
                OsString::from(fx.path("sample.wig")),
                OsString::from(fx.path("sample.sizes")),
                OsString::from(fx.path("sample.bigwig")),
            ]
        );
    }

    #[test]
    fn test_keep_intermediates() {
        let fx = Fixture::new();
        let runner = StubRunner::new(&[0, 0]);
        let request = fx.request().with_keep_intermediates(true);

        let report = fx.convert(&runner, &NoPrompt, &request).unwrap();

        assert!(report.intermediates_kept);
        assert!(is_nonempty_file(&fx.path("sample.wig")));
        assert_eq!(
            fs::read_to_string(fx.path("sample.sizes")).unwrap(),
            "chr1\t1000\nchr2\t2000\n"
        );
    }

    #[test]
    fn test_same_input_and_output() {
        let fx = Fixture::new();
        let runner = StubRunner::new(&[]);
        let request = fx.request().with_output(fx.path("sample.bam"));

        let result = fx.convert(&runner, &NoPrompt, &request);

        assert!(matches!(result, Err(ConvertError::SameInputOutput(_))));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_same_input_and_output_by_default() {
        let fx = Fixture::new();
        fs::write(fx.path("track.bigwig"), b"BAM\x01").unwrap();
        let runner = StubRunner::new(&[]);
        let request = ConversionRequest::new(fx.path("track.bigwig"));

        let result = fx.convert(&runner, &NoPrompt, &request);

        assert!(matches!(result, Err(ConvertError::SameInputOutput(_))));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_missing_input() {
        let fx = Fixture::new();
        let runner = StubRunner::new(&[]);
        let request = ConversionRequest::new(fx.path("absent.bam"));

        let result = fx.convert(&runner, &NoPrompt, &request);

        assert!(matches!(result, Err(ConvertError::MissingInput(_))));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_overwrite_declined() {
        let fx = Fixture::new();
        fs::write(fx.path("sample.bigwig"), b"old track").unwrap();
        let runner = StubRunner::new(&[0, 0]);

        let result = fx.convert(&runner, &FixedAnswer(false), &fx.request());

        assert!(matches!(result, Err(ConvertError::OverwriteDeclined(_))));
        assert!(runner.calls().is_empty());
        assert_eq!(fs::read(fx.path("sample.bigwig")).unwrap(), b"old track");
    }

    #[test]
    fn test_overwrite_confirmed() {
        let fx = Fixture::new();
        fs::write(fx.path("sample.bigwig"), b"old track").unwrap();
        let runner = StubRunner::new(&[0, 0]);

        fx.convert(&runner, &FixedAnswer(true), &fx.request()).unwrap();

        assert_eq!(runner.calls().len(), 2);
        assert_ne!(fs::read(fx.path("sample.bigwig")).unwrap(), b"old track");
    }

    #[test]
    fn test_empty_existing_output_needs_no_confirmation() {
        let fx = Fixture::new();
        fs::write(fx.path("sample.bigwig"), b"").unwrap();
        let runner = StubRunner::new(&[0, 0]);

        fx.convert(&runner, &NoPrompt, &fx.request()).unwrap();
    }

    #[test]
    fn test_stage1_failure_stops_pipeline() {
        let fx = Fixture::new();
        let runner = StubRunner::new(&[3]);

        let err = fx.convert(&runner, &NoPrompt, &fx.request()).unwrap_err();

        match err {
            ConvertError::StageFailed { stage, outcome, .. } => {
                assert_eq!(stage, Stage::Coverage);
                assert_eq!(outcome.status, 3);
                assert_eq!(
                    outcome.diagnosis.as_deref(),
                    Some("terminated with non-zero return code: 3")
                );
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(runner.calls().len(), 1);
        assert!(!fx.path("sample.sizes").exists());
        assert!(!fx.path("sample.bigwig").exists());
    }

    #[test]
    fn test_stage1_killed_by_signal() {
        let fx = Fixture::new();
        let runner = StubRunner::new(&[-11]);

        let err = fx.convert(&runner, &NoPrompt, &fx.request()).unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with("\"rsem-bam2wig "), "{message}");
        assert!(
            message.ends_with("terminated by signal 11: SIGSEGV, Core, Segmentation Fault"),
            "{message}"
        );
    }

    #[test]
    fn test_stage2_unknown_signal_keeps_intermediates() {
        let fx = Fixture::new();
        let runner = StubRunner::new(&[0, -50]);

        let err = fx.convert(&runner, &NoPrompt, &fx.request()).unwrap_err();

        match err {
            ConvertError::StageFailed { stage, outcome, .. } => {
                assert_eq!(stage, Stage::BigWig);
                assert_eq!(outcome.diagnosis.as_deref(), Some("terminated by signal 50"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(fx.path("sample.wig").exists());
        assert!(fx.path("sample.sizes").exists());
    }

    #[test]
    fn test_filters_are_forwarded() {
        let fx = Fixture::new();
        let runner = StubRunner::new(&[0, 0]);
        let request = fx.request().with_filters(FilterFlags {
            ignore_secondary: true,
            ignore_supplementary: true,
            ..FilterFlags::default()
        });

        fx.convert(&runner, &NoPrompt, &request).unwrap();

        let stage1 = args(&runner.calls()[0]);
        assert_eq!(
            &stage1[3..],
            &[
                OsString::from("--no-fractional-weight"),
                OsString::from("--ignore-secondary"),
                OsString::from("--ignore-supplementary"),
            ]
        );
    }

    #[test]
    fn test_scratch_names() {
        let fx = Fixture::new();
        let runner = StubRunner::new(&[0, 0]);
        let request = fx.request().with_scratch_names(true).with_keep_intermediates(true);

        let report = fx.convert(&runner, &NoPrompt, &request).unwrap();

        let wig_name = report.coverage.file_name().unwrap().to_string_lossy().to_string();
        let sizes_name = report.sizes.file_name().unwrap().to_string_lossy().to_string();
        assert!(wig_name.starts_with("bam2bigwig-") && wig_name.ends_with(".wig"));
        assert!(sizes_name.starts_with("bam2bigwig-") && sizes_name.ends_with(".sizes"));
        assert!(!fx.path("sample.wig").exists());
        assert!(!fx.path("sample.sizes").exists());
        assert!(is_nonempty_file(&report.coverage));
        assert!(is_nonempty_file(&report.sizes));

        fs::remove_file(&report.coverage).unwrap();
        fs::remove_file(&report.sizes).unwrap();
    }

    #[test]
    fn test_scratch_names_removed_after_success() {
        let fx = Fixture::new();
        let runner = StubRunner::new(&[0, 0]);
        let request = fx.request().with_scratch_names(true);

        let report = fx.convert(&runner, &NoPrompt, &request).unwrap();

        assert!(!report.coverage.exists());
        assert!(!report.sizes.exists());
        assert!(fx.path("sample.bigwig").exists());
    }

    #[test]
    fn test_empty_coverage_blocks_stage2() {
        let fx = Fixture::new();
        let mut runner = StubRunner::new(&[0, 0]);
        runner.write_outputs = false;

        let err = fx.convert(&runner, &NoPrompt, &fx.request()).unwrap_err();

        assert!(matches!(err, ConvertError::EmptyIntermediate(path) if path == fx.path("sample.wig")));
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn test_missing_tool_is_a_launch_error() {
        let fx = Fixture::new();

        let err = fx.convert(&MissingRunner, &NoPrompt, &fx.request()).unwrap_err();

        assert!(matches!(err, ConvertError::Launch { ref program, .. } if program == "rsem-bam2wig"));
    }

    #[test]
    fn test_intermediate_overlapping_input() {
        let fx = Fixture::new();
        fs::write(fx.path("coverage.wig"), b"BAM\x01").unwrap();
        let runner = StubRunner::new(&[0, 0]);
        let request = ConversionRequest::new(fx.path("coverage.wig"));

        let err = fx.convert(&runner, &NoPrompt, &request).unwrap_err();

        assert!(matches!(err, ConvertError::IntermediateOverlap(_)));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_sizes_overlapping_output_rejected_before_stage1() {
        let fx = Fixture::new();
        let runner = StubRunner::new(&[0, 0]);
        let request = fx.request().with_output(fx.path("sample.sizes"));

        let err = fx.convert(&runner, &NoPrompt, &request).unwrap_err();

        assert!(matches!(err, ConvertError::IntermediateOverlap(ref path) if path.ends_with("sample.sizes")));
        assert!(runner.calls().is_empty());
        assert!(!fx.path("sample.wig").exists());
    }

    #[cfg(unix)]
    fn make_read_only(path: &Path, mode: u32) -> bool {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
        if path.is_dir() {
            tempfile::tempfile_in(path).is_err()
        } else {
            fs::OpenOptions::new().write(true).open(path).is_err()
        }
    }

    #[cfg(unix)]
    fn make_writable(path: &Path) {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    #[cfg(unix)]
    fn test_read_only_sizes_file_is_permission_denied() {
        let fx = Fixture::new();
        fs::write(fx.path("sample.sizes"), b"stale").unwrap();
        if !make_read_only(&fx.path("sample.sizes"), 0o444) {
            return;
        }
        let runner = StubRunner::new(&[0, 0]);

        let err = fx.convert(&runner, &NoPrompt, &fx.request()).unwrap_err();

        let expected = fs::canonicalize(fx.path("sample.sizes")).unwrap();
        assert!(matches!(err, ConvertError::PermissionDenied(ref path) if *path == expected), "{err}");
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    #[cfg(unix)]
    fn test_read_only_directory_blocks_stage1() {
        let fx = Fixture::new();
        let locked = fx.path("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("sample.bam"), b"BAM\x01").unwrap();
        if !make_read_only(&locked, 0o555) {
            make_writable(&locked);
            return;
        }
        let runner = StubRunner::new(&[0, 0]);
        let request = ConversionRequest::new(locked.join("sample.bam"))
            .with_output(fx.path("sample.bigwig"));

        let result = fx.convert(&runner, &NoPrompt, &request);
        make_writable(&locked);

        let expected = fs::canonicalize(&locked).unwrap();
        assert!(matches!(result, Err(ConvertError::PermissionDenied(ref path)) if *path == expected));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_output_directory_missing() {
        let fx = Fixture::new();
        let runner = StubRunner::new(&[0, 0]);
        let request = fx.request().with_output(fx.path("missing/sample.bigwig"));

        let err = fx.convert(&runner, &NoPrompt, &request).unwrap_err();

        assert!(matches!(err, ConvertError::PermissionDenied(_)));
        // Stage 1 ran; its outputs stay behind for inspection
        assert_eq!(runner.calls().len(), 1);
        assert!(fx.path("sample.wig").exists());
    }
}
