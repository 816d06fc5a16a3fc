//! The `lifeline` binary.
//!
//! Describes a road network from the command line (or loads the reference
//! scenario), runs one resilience analysis over it and prints the result on
//! stdout. Failures are logged with their stable `LIFELINE_*` code when the
//! engine raised them, and the process exits non-zero.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use lifeline_cli::{
    cli::{Cli, CliError, render_outcome, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

/// Runs the parsed command and writes its outcome through a buffered stdout.
fn analyse() -> Result<()> {
    let outcome = run_cli(Cli::parse()).context("analysis failed")?;
    let mut out = BufWriter::new(io::stdout().lock());
    render_outcome(&outcome, &mut out).context("failed to write the report")?;
    out.flush().context("failed to flush stdout")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    match analyse() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let chain: &(dyn std::error::Error + 'static) = err.as_ref();
            let code = CliError::code_in_chain(chain);
            error!(
                error = %err,
                code = code.map(|code| field::display(code.as_str())),
                "lifeline command failed"
            );
            ExitCode::FAILURE
        }
    }
}

#[expect(
    clippy::print_stderr,
    reason = "No subscriber exists yet to carry this message"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialise logging: {err}");
}
