//! Binary-level tests driving `kiln` against a recording fake Ninja.
#![cfg(unix)]

use assert_cmd::Command;
use ninja_env::NINJA_ENV;
use predicates::prelude::*;
use rstest::{fixture, rstest};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use test_support::RecordingNinja;

const MANIFEST: &str = include_str!("data/cxx_project.yml");

#[fixture]
fn project() -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("Kilnfile"), MANIFEST).expect("write manifest");
    dir
}

fn kiln(root: &Path, ninja: &RecordingNinja) -> Command {
    let mut cmd = Command::cargo_bin("kiln").expect("kiln binary");
    cmd.current_dir(root).env(NINJA_ENV, ninja.program().as_str());
    cmd
}

#[rstest]
fn build_runs_ninja_with_generated_file(project: TempDir) {
    let ninja = RecordingNinja::new(0).expect("fake ninja");
    kiln(project.path(), &ninja)
        .args(["-j", "4", "build", "all"])
        .assert()
        .success();

    let build_file = project.path().join("build").join("build.ninja");
    let args = ninja.args().expect("args");
    let expected = ["-j", "4", "-f", build_file.to_str().expect("utf8"), "all"];
    assert_eq!(args, expected);

    let root = fs::canonicalize(project.path()).expect("canonical root");
    let cwd = fs::canonicalize(ninja.cwd().expect("cwd")).expect("canonical cwd");
    assert_eq!(cwd, root);

    let written = fs::read_to_string(&build_file).expect("build file on disk");
    assert_eq!(ninja.build_file().expect("captured"), written);
    assert!(written.contains("rule cxx\n"), "{written}");
}

#[rstest]
fn no_subcommand_builds_defaults(project: TempDir) {
    let ninja = RecordingNinja::new(0).expect("fake ninja");
    kiln(project.path(), &ninja).assert().success();
    let args = ninja.args().expect("args");
    assert_eq!(args.first().map(String::as_str), Some("-f"));
    assert_eq!(args.len(), 2, "{args:?}");
}

#[rstest]
fn clean_delegates_to_ninja_tool(project: TempDir) {
    let ninja = RecordingNinja::new(0).expect("fake ninja");
    kiln(project.path(), &ninja).arg("clean").assert().success();
    let args = ninja.args().expect("args");
    assert_eq!(
        args.iter().rev().take(2).map(String::as_str).collect::<Vec<_>>(),
        ["clean", "-t"]
    );
}

#[rstest]
#[case(3)]
#[case(1)]
fn ninja_exit_code_is_propagated(project: TempDir, #[case] code: i32) {
    let ninja = RecordingNinja::new(code).expect("fake ninja");
    kiln(project.path(), &ninja).assert().code(code);
}

#[rstest]
fn manifest_to_stdout_skips_ninja(project: TempDir) {
    let ninja = RecordingNinja::new(0).expect("fake ninja");
    kiln(project.path(), &ninja)
        .args(["manifest", "-"])
        .assert()
        .success()
        .stdout(predicate::str::contains("build all: phony $builddir/hello\n"))
        .stdout(predicate::str::starts_with("rootdir = "));
    assert!(ninja.args().is_err(), "ninja must not run");
    assert!(!project.path().join("build").exists());
}

#[rstest]
fn directory_flag_selects_the_root(project: TempDir) {
    let ninja = RecordingNinja::new(0).expect("fake ninja");
    let elsewhere = tempfile::tempdir().expect("cwd");
    kiln(elsewhere.path(), &ninja)
        .arg("-C")
        .arg(project.path())
        .args(["-B", "out", "manifest", "plan.ninja"])
        .assert()
        .success();
    let written = fs::read_to_string(project.path().join("plan.ninja")).expect("written");
    assert!(written.contains("/out\n"), "{written}");
}

#[rstest]
fn malformed_manifest_reports_and_fails(project: TempDir) {
    fs::write(project.path().join("Kilnfile"), "kiln_version: 1.0.0\nrules: 7\n")
        .expect("write manifest");
    let ninja = RecordingNinja::new(0).expect("fake ninja");
    kiln(project.path(), &ninja)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Kilnfile"));
    assert!(ninja.args().is_err(), "ninja must not run");
}

#[rstest]
fn graph_errors_fail_before_ninja_runs(project: TempDir) {
    fs::write(
        project.path().join("Kilnfile"),
        include_str!("data/unknown_rule.yml"),
    )
    .expect("write manifest");
    let ninja = RecordingNinja::new(0).expect("fake ninja");
    kiln(project.path(), &ninja)
        .assert()
        .failure()
        .stderr(predicate::str::contains("pandoc"));
    assert!(ninja.args().is_err(), "ninja must not run");
}

#[rstest]
#[case("0")]
#[case("65")]
#[case("many")]
fn out_of_range_jobs_are_rejected(project: TempDir, #[case] jobs: &str) {
    let ninja = RecordingNinja::new(0).expect("fake ninja");
    kiln(project.path(), &ninja)
        .args(["-j", jobs])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--jobs"));
    assert!(ninja.args().is_err(), "ninja must not run");
}
