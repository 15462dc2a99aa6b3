//! Test utilities for process management.
//!
//! Fake `ninja` executables written as shell scripts let tests observe how
//! `kiln` invokes the executor without a real Ninja installation.

pub mod recording;

pub use recording::RecordingNinja;

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Mark `path` executable on Unix platforms.
///
/// # Errors
///
/// Returns an error if the permissions cannot be read or updated.
#[cfg(unix)]
pub fn make_script_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)
        .with_context(|| format!("read metadata {}", path.display()))?
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
        .with_context(|| format!("set permissions {}", path.display()))
}

/// No-op on platforms without an executable bit.
///
/// # Errors
///
/// Never fails.
#[cfg(not(unix))]
pub fn make_script_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Write an executable shell script named `ninja` into `dir`.
///
/// # Errors
///
/// Returns an error if the script cannot be created.
pub fn write_script(dir: &Path, body: &str) -> Result<PathBuf> {
    let path = dir.join("ninja");
    let mut file =
        File::create(&path).with_context(|| format!("create script {}", path.display()))?;
    writeln!(file, "#!/bin/sh\n{body}")
        .with_context(|| format!("write script {}", path.display()))?;
    drop(file);
    make_script_executable(&path)?;
    Ok(path)
}

/// Create a fake Ninja executable that exits with `exit_code`.
///
/// Returns the temporary directory and the path to the executable.
///
/// # Panics
///
/// Panics if the script cannot be written.
#[must_use]
pub fn fake_ninja(exit_code: i32) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let path = write_script(dir.path(), &format!("exit {exit_code}")).expect("fake ninja");
    (dir, path)
}
