//! Ninja subprocess invocation.
//!
//! Ninja inherits the standard streams so its progress output reaches the
//! terminal unchanged. Its exit code is handed back to the caller verbatim.

use std::env;
use std::ffi::OsString;
use std::io::{self, Write};
use std::process::{Command, ExitStatus};

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use ninja_env::{NINJA_ENV, NINJA_PROGRAM};
use tracing::{debug, info};

/// Exit code reported when Ninja is terminated without one, such as by a
/// signal.
pub const SIGNALLED_EXIT_CODE: i32 = 1;

fn resolve_ninja_program_with<F>(mut read_env: F) -> Utf8PathBuf
where
    F: FnMut(&str) -> Option<OsString>,
{
    read_env(NINJA_ENV)
        .filter(|value| !value.is_empty())
        .and_then(|value| Utf8PathBuf::from_path_buf(value.into()).ok())
        .unwrap_or_else(|| Utf8PathBuf::from(NINJA_PROGRAM))
}

/// Ninja executable named by the environment, or `ninja`.
#[must_use]
pub fn resolve_ninja_program() -> Utf8PathBuf {
    resolve_ninja_program_with(|key| env::var_os(key))
}

/// One Ninja command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NinjaInvocation<'a> {
    /// Executable to run.
    pub program: &'a Utf8Path,
    /// Working directory of the child.
    pub cwd: &'a Utf8Path,
    /// Generated build file passed with `-f`.
    pub build_file: &'a Utf8Path,
    /// Parallelism passed with `-j`.
    pub jobs: Option<usize>,
    /// Trailing arguments such as targets or `-t clean`.
    pub args: &'a [String],
}

impl NinjaInvocation<'_> {
    /// Arguments in the order Ninja receives them.
    #[must_use]
    pub fn arguments(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.args.len() + 4);
        if let Some(jobs) = self.jobs {
            args.push("-j".to_owned());
            args.push(jobs.to_string());
        }
        args.push("-f".to_owned());
        args.push(self.build_file.to_string());
        args.extend(self.args.iter().cloned());
        args
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(self.program.as_std_path());
        cmd.current_dir(self.cwd.as_std_path()).args(self.arguments());
        cmd
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or_else(|| {
        debug!(%status, "ninja terminated without an exit code");
        SIGNALLED_EXIT_CODE
    })
}

/// Run Ninja to completion and return its exit code.
///
/// # Errors
///
/// Returns an error if the process cannot be spawned or awaited.
pub fn run_ninja(invocation: &NinjaInvocation<'_>) -> Result<i32> {
    let mut cmd = invocation.command();
    info!(
        program = %invocation.program,
        args = %invocation.arguments().join(" "),
        cwd = %invocation.cwd,
        "running ninja"
    );
    let status = cmd
        .status()
        .with_context(|| format!("running {}", invocation.program))?;
    let code = exit_code(status);
    debug!(code, "ninja finished");
    Ok(code)
}

/// Write `content` to standard output, treating a closed pipe as success.
///
/// # Errors
///
/// Returns an error for any write failure other than a broken pipe.
pub fn write_stdout(content: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    match stdout
        .write_all(content.as_bytes())
        .and_then(|()| stdout.flush())
    {
        Err(err) if err.kind() != io::ErrorKind::BrokenPipe => {
            Err(err).context("writing build file to stdout")
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("/opt/ninja"), "/opt/ninja")]
    #[case(Some(""), NINJA_PROGRAM)]
    #[case(None, NINJA_PROGRAM)]
    fn program_follows_environment(#[case] value: Option<&str>, #[case] expected: &str) {
        let resolved = resolve_ninja_program_with(|key| {
            assert_eq!(key, NINJA_ENV);
            value.map(OsString::from)
        });
        assert_eq!(resolved, expected);
    }

    #[rstest]
    #[case(None, &[], &["-f", "/b/build.ninja"])]
    #[case(Some(4), &["all"], &["-j", "4", "-f", "/b/build.ninja", "all"])]
    #[case(None, &["-t", "clean"], &["-f", "/b/build.ninja", "-t", "clean"])]
    fn arguments_put_flags_before_extras(
        #[case] jobs: Option<usize>,
        #[case] extra: &[&str],
        #[case] expected: &[&str],
    ) {
        let args: Vec<String> = extra.iter().map(|a| (*a).to_owned()).collect();
        let invocation = NinjaInvocation {
            program: Utf8Path::new("ninja"),
            cwd: Utf8Path::new("/"),
            build_file: Utf8Path::new("/b/build.ninja"),
            jobs,
            args: &args,
        };
        assert_eq!(invocation.arguments(), expected);
    }

    #[cfg(unix)]
    #[rstest]
    #[case(0)]
    #[case(3)]
    fn exit_code_is_passed_through(#[case] code: i32) {
        let (dir, ninja) = test_support::fake_ninja(code);
        let program = Utf8Path::from_path(&ninja).expect("utf8");
        let cwd = Utf8Path::from_path(dir.path()).expect("utf8");
        let invocation = NinjaInvocation {
            program,
            cwd,
            build_file: Utf8Path::new("build.ninja"),
            jobs: None,
            args: &[],
        };
        assert_eq!(run_ninja(&invocation).expect("run"), code);
    }

    #[rstest]
    fn missing_program_is_an_error() {
        let invocation = NinjaInvocation {
            program: Utf8Path::new("/definitely/not/here/ninja"),
            cwd: Utf8Path::new("/"),
            build_file: Utf8Path::new("build.ninja"),
            jobs: None,
            args: &[],
        };
        assert!(run_ninja(&invocation).is_err());
    }
}
