//! Snoop CLI entry point: parse arguments, set up logging, run the scan.

use std::process::ExitCode;

use clap::Parser;
use snoop_cli::{cli, commands, error, logger};

#[tokio::main]
async fn main() -> miette::Result<ExitCode> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);

    commands::run_execute(args)
        .await
        .map_err(error::cli_error_to_miette)
}
