use std::io;
use std::process::{Command, Stdio};

use serde::Serialize;
use tracing::{debug, error};

/// Default program name of the coverage stage
pub const BAM2WIG: &str = "rsem-bam2wig";

/// Default program name of the bigWig encoding stage
pub const WIG_TO_BIGWIG: &str = "wigToBigWig";

/// Program names of the two external stages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub bam2wig: String,
    pub wig_to_bigwig: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            bam2wig: BAM2WIG.to_string(),
            wig_to_bigwig: WIG_TO_BIGWIG.to_string(),
        }
    }
}

impl ToolConfig {
    /// Describe both tools in the order the pipeline runs them
    #[must_use]
    pub fn tools(&self) -> [ExternalTool; 2] {
        [
            ExternalTool {
                program: self.bam2wig.clone(),
                provider: "RSEM",
                url: "http://deweylab.biostat.wisc.edu/rsem/",
            },
            ExternalTool {
                program: self.wig_to_bigwig.clone(),
                provider: "UCSC",
                url: "http://hgdownload.cse.ucsc.edu/admin/exe/",
            },
        ]
    }
}

/// An external program the pipeline depends on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalTool {
    pub program: String,
    pub provider: &'static str,
    pub url: &'static str,
}

/// Availability of one external tool
#[derive(Debug, Clone, Serialize)]
pub struct DependencyStatus {
    #[serde(flatten)]
    pub tool: ExternalTool,
    pub available: bool,
}

/// Availability of every external tool
#[derive(Debug, Clone, Serialize)]
pub struct DependencyReport {
    pub dependencies: Vec<DependencyStatus>,
}

impl DependencyReport {
    #[must_use]
    pub fn all_available(&self) -> bool {
        self.dependencies.iter().all(|d| d.available)
    }

    pub fn missing(&self) -> impl Iterator<Item = &ExternalTool> {
        self.dependencies
            .iter()
            .filter(|d| !d.available)
            .map(|d| &d.tool)
    }

    /// Log one error line per missing tool
    pub fn log_missing(&self) {
        for tool in self.missing() {
            error!(
                "Missing dependency: {} from {} ({})",
                tool.program, tool.provider, tool.url
            );
        }
    }
}

/// Check whether `program` can be launched.
///
/// The program is run once without arguments and with all output discarded;
/// only a failure to start it counts as missing.
///
/// # Errors
///
/// Returns an error for spawn failures other than "not found" or
/// "permission denied".
pub fn probe(program: &str) -> io::Result<bool> {
    let status = Command::new(program)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(status) => {
            debug!(program, ?status, "Dependency probe finished");
            Ok(true)
        }
        Err(e) if matches!(
            e.kind(),
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
        ) =>
        {
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Probe every tool named in `config`
///
/// # Errors
///
/// Returns an error if a probe fails for a reason other than a missing or
/// non-executable program.
pub fn check_dependencies(config: &ToolConfig) -> io::Result<DependencyReport> {
    let dependencies = config
        .tools()
        .into_iter()
        .map(|tool| {
            let available = probe(&tool.program)?;
            Ok(DependencyStatus { tool, available })
        })
        .collect::<io::Result<Vec<_>>>()?;

    Ok(DependencyReport { dependencies })
}
