use std::fmt;

/// What the default handler does when a process receives the signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Terminate the process
    Exit,
    /// Terminate and dump core
    Core,
    /// Discarded by default
    Ignore,
    /// Suspend the process
    Stop,
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exit => write!(f, "Exit"),
            Self::Core => write!(f, "Core"),
            Self::Ignore => write!(f, "Ignore"),
            Self::Stop => write!(f, "Stop"),
        }
    }
}

/// A single entry of the signal table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal {
    pub number: i32,
    pub name: &'static str,
    pub disposition: Disposition,
    pub description: &'static str,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.name, self.disposition, self.description)
    }
}

/// Read-only lookup from signal number to its name and default behavior.
///
/// Only used to annotate diagnostics; nothing in the pipeline branches on it.
#[derive(Debug)]
pub struct SignalRegistry {
    signals: &'static [Signal],
}

impl SignalRegistry {
    pub const fn new(signals: &'static [Signal]) -> Self {
        Self { signals }
    }

    /// Look up a signal by its (positive) number
    #[must_use]
    pub fn get(&self, number: i32) -> Option<&Signal> {
        self.signals.iter().find(|s| s.number == number)
    }

    /// Look up a signal from a raw exit status, where signal `n` is encoded as `-n`
    #[must_use]
    pub fn from_status(&self, status: i32) -> Option<&Signal> {
        if status < 0 {
            self.get(status.checked_neg()?)
        } else {
            None
        }
    }
}

const fn signal(
    number: i32,
    name: &'static str,
    disposition: Disposition,
    description: &'static str,
) -> Signal {
    Signal {
        number,
        name,
        disposition,
        description,
    }
}

use Disposition::{Core, Exit, Ignore, Stop};

/// System V signal numbering, shared by the diagnostics of every stage.
pub static UNIX_SIGNALS: SignalRegistry = SignalRegistry::new(&[
    signal(1, "SIGHUP", Exit, "Hangup"),
    signal(2, "SIGINT", Exit, "Interrupt"),
    signal(3, "SIGQUIT", Core, "Quit"),
    signal(4, "SIGILL", Core, "Illegal Instruction"),
    signal(5, "SIGTRAP", Core, "Trace/Breakpoint Trap"),
    signal(6, "SIGABRT", Core, "Abort"),
    signal(7, "SIGEMT", Core, "Emulation Trap"),
    signal(8, "SIGFPE", Core, "Arithmetic Exception"),
    signal(9, "SIGKILL", Exit, "Killed"),
    signal(10, "SIGBUS", Core, "Bus Error"),
    signal(11, "SIGSEGV", Core, "Segmentation Fault"),
    signal(12, "SIGSYS", Core, "Bad System Call"),
    signal(13, "SIGPIPE", Exit, "Broken Pipe"),
    signal(14, "SIGALRM", Exit, "Alarm Clock"),
    signal(15, "SIGTERM", Exit, "Terminated"),
    signal(16, "SIGUSR1", Exit, "User Signal 1"),
    signal(17, "SIGUSR2", Exit, "User Signal 2"),
    signal(18, "SIGCHLD", Ignore, "Child Status"),
    signal(19, "SIGPWR", Ignore, "Power Fail/Restart"),
    signal(20, "SIGWINCH", Ignore, "Window Size Change"),
    signal(21, "SIGURG", Ignore, "Urgent Socket Condition"),
    signal(22, "SIGPOLL", Ignore, "Socket I/O Possible"),
    signal(23, "SIGSTOP", Stop, "Stopped (signal)"),
    signal(24, "SIGTSTP", Stop, "Stopped (user)"),
    signal(25, "SIGCONT", Ignore, "Continued"),
    signal(26, "SIGTTIN", Stop, "Stopped (tty input)"),
    signal(27, "SIGTTOU", Stop, "Stopped (tty output)"),
    signal(28, "SIGVTALRM", Exit, "Virtual Timer Expired"),
    signal(29, "SIGPROF", Exit, "Profiling Timer Expired"),
    signal(30, "SIGXCPU", Core, "CPU time limit exceeded"),
    signal(31, "SIGXFSZ", Core, "File size limit exceeded"),
    signal(32, "SIGWAITING", Ignore, "All LWPs blocked"),
    signal(33, "SIGLWP", Ignore, "Virtual Interprocessor Interrupt for Threads Library"),
    signal(34, "SIGAIO", Ignore, "Asynchronous I/O"),
]);
