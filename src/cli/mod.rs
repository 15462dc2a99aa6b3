//! Command line interface definition using clap.
//!
//! This module defines the [`Cli`] structure and its subcommands. Without a
//! subcommand `kiln` behaves like `kiln build`.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

use crate::manifest::DEFAULT_MANIFEST;

mod parsing;

use parsing::parse_jobs;

/// Maximum number of jobs accepted by the CLI.
const MAX_JOBS: usize = 64;

/// Build directory used when `--build-dir` is omitted.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Generate Ninja build files from a declarative manifest and run them.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the manifest, relative to the project directory.
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_MANIFEST)]
    pub file: Utf8PathBuf,

    /// Project root; defaults to the current directory.
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<Utf8PathBuf>,

    /// Build directory, relative to the project root.
    #[arg(short = 'B', long, value_name = "DIR", default_value = DEFAULT_BUILD_DIR)]
    pub build_dir: Utf8PathBuf,

    /// Set the number of parallel build jobs.
    ///
    /// Values must be between 1 and 64.
    #[arg(short, long, value_name = "N", value_parser = parse_jobs)]
    pub jobs: Option<usize>,

    /// Enable verbose diagnostic logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Optional subcommand to execute; defaults to `build` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Apply the default command if none was specified.
    #[must_use]
    pub fn with_default_command(mut self) -> Self {
        if self.command.is_none() {
            self.command = Some(Commands::Build(BuildArgs::default()));
        }
        self
    }
}

/// Arguments accepted by the `build` command.
#[derive(Debug, Default, Args, PartialEq, Eq, Clone)]
pub struct BuildArgs {
    /// Targets to build; the manifest defaults when empty.
    pub targets: Vec<String>,
}

/// Available top-level commands.
#[derive(Debug, Subcommand, PartialEq, Eq, Clone)]
pub enum Commands {
    /// Build the given targets, or the default targets when none are given.
    Build(BuildArgs),

    /// Remove build outputs with `ninja -t clean`.
    Clean,

    /// Write the generated build file without running Ninja.
    Manifest {
        /// Output path, or `-` for standard output.
        #[arg(value_name = "FILE")]
        file: Utf8PathBuf,
    },
}
