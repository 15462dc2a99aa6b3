//! A fake Ninja that records how it was called.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ARGS_LOG: &str = "args.txt";
const CWD_LOG: &str = "cwd.txt";
const CAPTURED_BUILD_FILE: &str = "captured.ninja";

/// Fake executable that logs its arguments and working directory and keeps a
/// copy of the file passed with `-f`.
#[derive(Debug)]
pub struct RecordingNinja {
    dir: TempDir,
    program: Utf8PathBuf,
}

impl RecordingNinja {
    /// Create a recorder that exits with `exit_code`.
    ///
    /// # Errors
    ///
    /// Returns an error if the script cannot be written.
    pub fn new(exit_code: i32) -> Result<Self> {
        let dir = TempDir::new().context("create temp dir")?;
        let base = Utf8Path::from_path(dir.path()).context("temp dir is not UTF-8")?;
        let body = format!(
            concat!(
                "pwd > '{base}/{cwd}'\n",
                ": > '{base}/{args}'\n",
                "prev=''\n",
                "for arg in \"$@\"; do\n",
                "  printf '%s\\n' \"$arg\" >> '{base}/{args}'\n",
                "  if [ \"$prev\" = '-f' ]; then cp \"$arg\" '{base}/{copy}'; fi\n",
                "  prev=\"$arg\"\n",
                "done\n",
                "exit {code}",
            ),
            base = base,
            cwd = CWD_LOG,
            args = ARGS_LOG,
            copy = CAPTURED_BUILD_FILE,
            code = exit_code,
        );
        let script = crate::write_script(dir.path(), &body)?;
        let program = Utf8PathBuf::from_path_buf(script)
            .map_err(|p| anyhow::anyhow!("script path {} is not UTF-8", p.display()))?;
        Ok(Self { dir, program })
    }

    /// Path to hand to `KILN_NINJA`.
    #[must_use]
    pub fn program(&self) -> &Utf8Path {
        &self.program
    }

    fn read(&self, name: &str) -> Result<String> {
        let path = self.dir.path().join(name);
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))
    }

    /// Arguments of the last invocation, one per element.
    ///
    /// # Errors
    ///
    /// Returns an error if the fake has not run yet.
    pub fn args(&self) -> Result<Vec<String>> {
        Ok(self.read(ARGS_LOG)?.lines().map(str::to_owned).collect())
    }

    /// Working directory of the last invocation.
    ///
    /// # Errors
    ///
    /// Returns an error if the fake has not run yet.
    pub fn cwd(&self) -> Result<String> {
        Ok(self.read(CWD_LOG)?.trim_end().to_owned())
    }

    /// Contents of the build file passed with `-f`.
    ///
    /// # Errors
    ///
    /// Returns an error if no build file was passed.
    pub fn build_file(&self) -> Result<String> {
        self.read(CAPTURED_BUILD_FILE)
    }

    /// Directory holding the script and its logs.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}
