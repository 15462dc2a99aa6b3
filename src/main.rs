//! Application entry point.
//!
//! Parses command-line arguments and delegates execution to [`runner::run`].

use clap::Parser;
use kiln::ir::GraphError;
use kiln::manifest::ManifestError;
use kiln::{cli::Cli, runner};
use miette::Report;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt;

fn report(err: anyhow::Error) {
    let rendered = match err.downcast::<ManifestError>() {
        Ok(diag) => format!("{:?}", Report::new(diag)),
        Err(other) => match other.downcast::<GraphError>() {
            Ok(diag) => format!("{:?}", Report::new(diag)),
            Err(rest) => format!("{rest:#}"),
        },
    };
    tracing::error!("{rendered}");
}

fn main() -> ExitCode {
    let cli = Cli::parse().with_default_command();
    let max_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::ERROR
    };
    fmt().with_max_level(max_level).with_writer(std::io::stderr).init();
    match runner::run(&cli) {
        Ok(code) => u8::try_from(code).map_or(ExitCode::FAILURE, ExitCode::from),
        Err(err) => {
            report(err);
            ExitCode::FAILURE
        }
    }
}
