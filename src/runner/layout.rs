//! Filesystem locations derived from the command line.
//!
//! The project root is `-C/--directory` made absolute against the current
//! directory, or the current directory itself. The manifest, the build
//! directory and relative output paths all hang off that root.

use std::env;

use anyhow::{Context, Result, anyhow, bail};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use tracing::debug;

use crate::cli::Cli;

/// Name of the generated build file inside the build directory.
pub const BUILD_FILE: &str = "build.ninja";

/// Absolute project paths for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: Utf8PathBuf,
    build: Utf8PathBuf,
    manifest: Utf8PathBuf,
}

impl ProjectLayout {
    /// Anchor the paths named on the command line at `cwd`.
    #[must_use]
    pub fn from_cli_in(cli: &Cli, cwd: &Utf8Path) -> Self {
        let root = cli
            .directory
            .as_ref()
            .map_or_else(|| cwd.to_owned(), |dir| cwd.join(dir));
        Self {
            build: root.join(&cli.build_dir),
            manifest: root.join(&cli.file),
            root,
        }
    }

    /// Anchor the paths named on the command line at the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the current directory cannot be read or is not
    /// valid UTF-8.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let raw = env::current_dir().context("reading current directory")?;
        let cwd = Utf8PathBuf::from_path_buf(raw)
            .map_err(|path| anyhow!("current directory {} is not valid UTF-8", path.display()))?;
        Ok(Self::from_cli_in(cli, &cwd))
    }

    /// Project root, exported to the build file as `rootdir`.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Build directory, exported to the build file as `builddir`.
    #[must_use]
    pub fn build(&self) -> &Utf8Path {
        &self.build
    }

    /// Manifest to load.
    #[must_use]
    pub fn manifest(&self) -> &Utf8Path {
        &self.manifest
    }

    /// Location of the generated build file.
    #[must_use]
    pub fn build_file(&self) -> Utf8PathBuf {
        self.build.join(BUILD_FILE)
    }

    /// Resolve a command-line output path against the project root.
    #[must_use]
    pub fn output_path(&self, path: &Utf8Path) -> Utf8PathBuf {
        self.root.join(path)
    }

    /// Create the build directory if needed and open it.
    ///
    /// # Errors
    ///
    /// Returns an error when the path exists but is not a directory, or when
    /// it cannot be created or opened.
    pub fn prepare_build_dir(&self) -> Result<Dir> {
        if self.build.exists() && !self.build.is_dir() {
            bail!("build directory {} exists and is not a directory", self.build);
        }
        Dir::create_ambient_dir_all(&self.build, ambient_authority())
            .with_context(|| format!("creating build directory {}", self.build))?;
        debug!(path = %self.build, "build directory ready");
        Dir::open_ambient_dir(&self.build, ambient_authority())
            .with_context(|| format!("opening build directory {}", self.build))
    }
}
