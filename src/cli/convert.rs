use std::path::PathBuf;
use std::process::ExitCode;

use clap::CommandFactory;
use serde::Serialize;
use tracing::{error, info};

use crate::cli::{Cli, OutputFormat};
use crate::parsing::bam::BamReferences;
use crate::pipeline::{Confirm, ConversionReport, FixedAnswer, Pipeline, TerminalPrompt};
use crate::process::runner::ProcessRunner;
use crate::process::signals::UNIX_SIGNALS;
use crate::process::tools::{check_dependencies, DependencyReport};

/// Outcome of one input in a batch
#[derive(Debug, Serialize)]
struct InputResult {
    input: PathBuf,
    converted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<ConversionReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Convert every input on the command line, one after another.
///
/// A failed input is logged and the batch moves on to the next one. Returns
/// success only if every input was converted.
///
/// # Errors
///
/// Returns an error for invalid argument combinations or if the dependency
/// probe itself fails; no input has been touched at that point.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let tools = cli.tool_config();

    if cli.inputs.is_empty() {
        // Keep stdout parseable when a JSON report was requested
        match cli.format {
            OutputFormat::Text => {
                Cli::command().print_long_help()?;
                println!();
            }
            OutputFormat::Json => eprintln!("{}", Cli::command().render_long_help()),
        }
        let report = check_dependencies(&tools)?;
        print_dependencies(&report, cli.format)?;
        report.log_missing();
        return Ok(ExitCode::SUCCESS);
    }

    let report = check_dependencies(&tools)?;
    if !report.all_available() {
        report.log_missing();
        return Ok(ExitCode::FAILURE);
    }

    if cli.bigwig_filename.is_some() && cli.inputs.len() > 1 {
        anyhow::bail!(
            "--bigwig-filename can only be used with a single BAM file ({} given)",
            cli.inputs.len()
        );
    }

    let runner = ProcessRunner::new(&UNIX_SIGNALS);
    let prompt: Box<dyn Confirm> = if cli.yes {
        Box::new(FixedAnswer(true))
    } else {
        Box::new(TerminalPrompt)
    };
    let pipeline = Pipeline::new(&tools, &runner, &BamReferences, prompt.as_ref());

    let mut results = Vec::with_capacity(cli.inputs.len());
    for input in &cli.inputs {
        let request = cli.request_for(input);
        let result = match pipeline.convert(&request) {
            Ok(report) => {
                info!("Done: {}", report.output.display());
                InputResult {
                    input: input.clone(),
                    converted: true,
                    report: Some(report),
                    error: None,
                }
            }
            Err(e) => {
                error!("{}: {e}", input.display());
                InputResult {
                    input: input.clone(),
                    converted: false,
                    report: None,
                    error: Some(e.to_string()),
                }
            }
        };
        results.push(result);
    }

    print_results(&results, cli.format)?;

    if results.iter().all(|r| r.converted) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn print_dependencies(report: &DependencyReport, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            println!("Dependencies:");
            for status in &report.dependencies {
                let state = if status.available { "found" } else { "MISSING" };
                println!(
                    "  {:<16} {:<8} {} ({})",
                    status.tool.program, state, status.tool.provider, status.tool.url
                );
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}

fn print_results(results: &[InputResult], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            let converted = results.iter().filter(|r| r.converted).count();
            for result in results {
                match (&result.report, &result.error) {
                    (Some(report), _) => {
                        println!("{}\t{}", result.input.display(), report.output.display());
                    }
                    (None, Some(error)) => println!("{}\tFAILED\t{error}", result.input.display()),
                    (None, None) => {}
                }
            }
            println!("Converted {converted} of {} file(s)", results.len());
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(results)?),
    }
    Ok(())
}
