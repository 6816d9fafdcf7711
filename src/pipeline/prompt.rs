use std::io::{self, BufRead, Write};

/// Yes/no confirmation, so non-interactive callers can answer without a terminal
pub trait Confirm {
    /// Ask `question`; `default` is the answer for an empty response
    ///
    /// # Errors
    ///
    /// Returns an error if the answer cannot be obtained.
    fn confirm(&self, question: &str, default: bool) -> io::Result<bool>;
}

/// Always gives the same answer (`--yes`, batch jobs, tests)
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&self, _question: &str, _default: bool) -> io::Result<bool> {
        Ok(self.0)
    }
}

/// Asks on stdout and reads the answer from stdin
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl Confirm for TerminalPrompt {
    fn confirm(&self, question: &str, default: bool) -> io::Result<bool> {
        ask(question, default, io::stdin().lock(), io::stdout().lock())
    }
}

/// Keep asking until the answer is one of y/ye/yes/n/no (case-insensitive)
/// or empty. End of input counts as an empty answer.
///
/// # Errors
///
/// Returns any I/O error from `input` or `output`.
pub fn ask<R: BufRead, W: Write>(
    question: &str,
    default: bool,
    mut input: R,
    mut output: W,
) -> io::Result<bool> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };

    loop {
        write!(output, "{question} {hint} ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(default);
        }

        match line.trim().to_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "ye" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(output, "Please respond with 'yes' or 'no' (or 'y' or 'n').")?,
        }
    }
}
