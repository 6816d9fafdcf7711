use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io;
use std::process::{Command, ExitStatus};

use tracing::debug;

use crate::process::signals::{SignalRegistry, UNIX_SIGNALS};

/// An external program together with its argument list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<OsString>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Result of running one external tool to completion.
///
/// `status` is the raw exit status: the exit code when the tool exited
/// normally, or `-n` when it was killed by signal `n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutcome {
    pub success: bool,
    pub status: i32,
    pub diagnosis: Option<String>,
}

impl StageOutcome {
    /// Classify a raw exit status, annotating signal deaths from `signals`
    #[must_use]
    pub fn classify(status: i32, signals: &SignalRegistry) -> Self {
        let diagnosis = match status {
            0 => None,
            s if s > 0 => Some(format!("terminated with non-zero return code: {s}")),
            s => {
                let number = s.unsigned_abs();
                Some(match signals.from_status(s) {
                    Some(signal) => format!("terminated by signal {number}: {signal}"),
                    None => format!("terminated by signal {number}"),
                })
            }
        };

        Self {
            success: status == 0,
            status,
            diagnosis,
        }
    }
}

impl fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.diagnosis {
            Some(diagnosis) => write!(f, "{diagnosis}"),
            None => write!(f, "completed successfully"),
        }
    }
}

/// Launches external tools and waits for them.
///
/// The pipeline only talks to this trait so tests can substitute a stub.
pub trait ToolRunner {
    /// Run `command` to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or waited on. A tool
    /// that starts and then fails is reported through the `StageOutcome`.
    fn run(&self, command: &ToolCommand) -> io::Result<StageOutcome>;
}

/// Runs tools as child processes with inherited stdio.
///
/// There is no timeout: a tool that never exits blocks the caller forever.
#[derive(Debug, Clone, Copy)]
pub struct ProcessRunner {
    signals: &'static SignalRegistry,
}

impl ProcessRunner {
    pub fn new(signals: &'static SignalRegistry) -> Self {
        Self { signals }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(&UNIX_SIGNALS)
    }
}

impl ToolRunner for ProcessRunner {
    fn run(&self, command: &ToolCommand) -> io::Result<StageOutcome> {
        debug!(command = %command, "Launching external tool");

        let status = Command::new(&command.program)
            .args(&command.args)
            .status()?;

        let outcome = StageOutcome::classify(raw_status(status), self.signals);
        debug!(program = %command.program, status = outcome.status, "External tool finished");
        Ok(outcome)
    }
}

#[cfg(unix)]
fn raw_status(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|signal| -signal))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn raw_status(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
