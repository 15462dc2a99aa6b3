//! CLI execution and command dispatch logic.
//!
//! This module keeps `main` minimal by providing a single entry point that
//! loads the manifest, renders the build file under the build directory and
//! hands control to Ninja.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use tracing::{Level, debug, info};

use crate::cli::{BuildArgs, Cli, Commands};
use crate::ir::GraphBuilder;
use crate::manifest;

mod layout;
mod process;

pub use layout::{BUILD_FILE, ProjectLayout};
pub use ninja_env::{NINJA_ENV, NINJA_PROGRAM};
pub use process::{
    NinjaInvocation, SIGNALLED_EXIT_CODE, resolve_ninja_program, run_ninja, write_stdout,
};

/// Output path that selects standard output for `kiln manifest`.
pub const STDOUT_PATH: &str = "-";

/// Generated build file text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NinjaContent(String);

impl NinjaContent {
    /// Wrap rendered build file text.
    #[must_use]
    pub const fn new(content: String) -> Self {
        Self(content)
    }

    /// Borrow the text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Execute the parsed [`Cli`] command and return the process exit code.
///
/// # Errors
///
/// Returns an error if the manifest cannot be turned into a build file, the
/// build file cannot be written, or Ninja cannot be started.
pub fn run(cli: &Cli) -> Result<i32> {
    let layout = ProjectLayout::from_cli(cli)?;
    let command = cli
        .command
        .clone()
        .unwrap_or_else(|| Commands::Build(BuildArgs::default()));
    match command {
        Commands::Build(args) => handle_build(cli, &layout, &args.targets),
        Commands::Clean => handle_clean(cli, &layout),
        Commands::Manifest { file } => {
            handle_manifest(&layout, &file)?;
            Ok(0)
        }
    }
}

fn handle_build(cli: &Cli, layout: &ProjectLayout, targets: &[String]) -> Result<i32> {
    let build_file = write_build_file(layout)?;
    invoke_ninja(cli, layout, &build_file, targets)
}

/// Remove build outputs by invoking `ninja -t clean`.
fn handle_clean(cli: &Cli, layout: &ProjectLayout) -> Result<i32> {
    let build_file = write_build_file(layout)?;
    invoke_ninja(cli, layout, &build_file, &["-t".to_owned(), "clean".to_owned()])
}

fn handle_manifest(layout: &ProjectLayout, file: &Utf8Path) -> Result<()> {
    let ninja = generate_ninja(layout)?;
    if file.as_str() == STDOUT_PATH {
        return write_stdout(ninja.as_str());
    }
    let target = layout.output_path(file);
    let parent = target.parent().unwrap_or_else(|| layout.root());
    let name = target
        .file_name()
        .with_context(|| format!("output path {target} has no file name"))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .with_context(|| format!("opening output directory {parent}"))?;
    dir.write(name, ninja.as_str())
        .with_context(|| format!("writing {target}"))?;
    info!(path = %target, "wrote build file");
    Ok(())
}

fn invoke_ninja(
    cli: &Cli,
    layout: &ProjectLayout,
    build_file: &Utf8Path,
    args: &[String],
) -> Result<i32> {
    let program = resolve_ninja_program();
    let invocation = NinjaInvocation {
        program: &program,
        cwd: layout.root(),
        build_file,
        jobs: cli.jobs,
        args,
    };
    run_ninja(&invocation)
}

/// Render the build file and store it as `<builddir>/build.ninja`.
///
/// # Errors
///
/// Returns an error if generation fails or the build directory cannot be
/// prepared or written.
pub fn write_build_file(layout: &ProjectLayout) -> Result<Utf8PathBuf> {
    let ninja = generate_ninja(layout)?;
    let dir = layout.prepare_build_dir()?;
    let path = layout.build_file();
    dir.write(BUILD_FILE, ninja.as_str())
        .with_context(|| format!("writing {path}"))?;
    info!(path = %path, "wrote build file");
    Ok(path)
}

/// Load the manifest named by `layout` and render the build file text.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded or the graph is
/// invalid.
pub fn generate_ninja(layout: &ProjectLayout) -> Result<NinjaContent> {
    let path = layout.manifest();
    let manifest =
        manifest::from_path(path).with_context(|| format!("loading manifest at {path}"))?;
    if tracing::enabled!(Level::DEBUG) {
        let json = serde_json::to_string_pretty(&manifest).context("serialising manifest")?;
        debug!("manifest:\n{json}");
    }
    let mut builder = GraphBuilder::from_manifest(&manifest).context("building graph")?;
    let text = builder
        .emit(layout.root().as_str(), layout.build().as_str())
        .context("generating build file")?;
    Ok(NinjaContent::new(text))
}
