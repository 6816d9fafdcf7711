use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bam2bigwig::cli;

/// Exit status after an operator interrupt (128 + SIGINT)
const INTERRUPTED: u8 = 130;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("bam2bigwig=debug,info")
    } else {
        EnvFilter::new("bam2bigwig=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    // The batch blocks on child processes, so it runs off the async thread
    // while this one waits for Ctrl-C. Children are not killed on interrupt.
    let code = runtime.block_on(async move {
        let batch = tokio::task::spawn_blocking(move || cli::run(cli));

        tokio::select! {
            joined = batch => match joined {
                Ok(Ok(code)) => code,
                Ok(Err(e)) => {
                    error!("{e:#}");
                    ExitCode::FAILURE
                }
                Err(e) => {
                    error!("Conversion aborted: {e}");
                    ExitCode::FAILURE
                }
            },
            Ok(()) = tokio::signal::ctrl_c() => {
                println!();
                info!("Aborted by keyboard interrupt");
                ExitCode::from(INTERRUPTED)
            }
        }
    });

    runtime.shutdown_background();
    code
}
