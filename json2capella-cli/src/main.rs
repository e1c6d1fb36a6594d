//! json2capella: import JSON data definitions into a Capella model.
//!
//! Usage:
//!   json2capella init -m model.json
//!   json2capella import -i defs/ -m model.json -l la -p replace
//!   json2capella import -i defs/ -m model.json -l la -o changes.yaml
//!   json2capella apply -f changes.yaml -m model.json
//!   json2capella export -m model.json -p Interfaces

use clap::Parser;
use json2capella::{Cli, exit_code, run};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Exit code for command-line usage errors, shared with configuration errors.
const USAGE_ERROR: u8 = 4;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(USAGE_ERROR)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}
