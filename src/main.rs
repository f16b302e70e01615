use std::process::ExitCode;

use anyhow::Result;
use tracing::error;
use wordtrack::cli::run_cli;

fn main() -> Result<ExitCode> {
    run_cli().inspect_err(|e| {
        error!("Error running cli {e:?}");
    })
}
