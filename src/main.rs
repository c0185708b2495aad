//! CLI entry point for multi-view volume fusion

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use indicatif::MultiProgress;
use log::error;
use std::process::ExitCode;
use viewfuse::FusionError;
use viewfuse::io::cli::Cli;
use viewfuse::io::logging::init_logging;
use viewfuse::pipeline::{FusionRunner, RunConfig};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let multi_progress = MultiProgress::new();
    let _logger = match init_logging(cli.log_level(), multi_progress.clone()) {
        Ok(handle) => handle,
        Err(e) => Cli::command().error(ErrorKind::Io, e).exit(),
    };

    let config = match RunConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e @ FusionError::InvalidConfiguration { .. }) => {
            Cli::command().error(ErrorKind::ValueValidation, e).exit()
        }
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match FusionRunner::new(config).with_progress(multi_progress).run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
