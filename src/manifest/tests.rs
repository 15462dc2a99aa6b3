//! Tests for manifest loading.

use super::*;
use crate::ast::{DepsSpec, PathSpec};
use camino::{Utf8Path, Utf8PathBuf};
use miette::Diagnostic;
use rstest::rstest;

const FULL: &str = r#"
kiln_version: "1.0.0"
vars:
  cxx: clang++
  bindir: { root: bin }
rules:
  - name: cxx
    targets: [".o"]
    deps: [".cpp"]
    vars: { command: "$cxx -c $in -o $out" }
edges:
  - targets: { build: main.o }
    deps: { root: main.cpp }
    default: true
utils:
  - name: all
    rule: phony
    deps: [{ build: main.o }]
"#;

#[rstest]
fn parses_every_section() {
    let manifest = from_str(FULL).expect("parse");
    assert_eq!(manifest.kiln_version.major, 1);
    assert_eq!(
        manifest.vars.keys().collect::<Vec<_>>(),
        vec!["cxx", "bindir"]
    );
    assert_eq!(manifest.rules.len(), 1);
    let edge = manifest.edges.first().expect("edge");
    assert!(edge.default);
    assert!(edge.rule.is_none());
    let util = manifest.utils.first().expect("util");
    assert_eq!(util.rule, "phony");
    assert!(matches!(util.deps, DepsSpec::Many(ref paths) if paths.len() == 1));
}

#[rstest]
fn plain_strings_stay_literal() {
    let yaml = "kiln_version: 1.0.0\nedges:\n  - targets: out.txt\n    rule: stamp\n";
    let manifest = from_str(yaml).expect("parse");
    let edge = manifest.edges.first().expect("edge");
    assert_eq!(
        edge.targets,
        DepsSpec::One(PathSpec::Literal("out.txt".to_owned()))
    );
}

#[rstest]
#[case("kiln_version: 2.0.0\n")]
#[case("kiln_version: 0.9.1\n")]
fn rejects_other_major_versions(#[case] yaml: &str) {
    let err = from_str(yaml).expect_err("unsupported");
    assert!(
        matches!(err, ManifestError::UnsupportedVersion { .. }),
        "{err:?}"
    );
    assert_eq!(
        err.code().map(|c| c.to_string()).as_deref(),
        Some("kiln::manifest::version")
    );
}

#[rstest]
#[case::unknown_field("kiln_version: 1.0.0\ntargets: []\n")]
#[case::missing_version("rules: []\n")]
#[case::bad_version("kiln_version: one\n")]
#[case::rule_without_name("kiln_version: 1.0.0\nrules:\n  - targets: .o\n")]
#[case::syntax("kiln_version: 1.0.0\nrules: [\n")]
fn malformed_manifests_fail_to_parse(#[case] yaml: &str) {
    let err = from_str(yaml).expect_err("malformed");
    assert!(matches!(err, ManifestError::Parse { .. }), "{err:?}");
}

#[rstest]
fn from_path_labels_errors_with_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("Kilnfile")).expect("utf8 path");
    std::fs::write(&path, "kiln_version: 1.0.0\nbogus: true\n").expect("write");
    let err = from_path(&path).expect_err("unknown field");
    let manifest_err = err.downcast_ref::<ManifestError>().expect("manifest error");
    assert!(manifest_err.to_string().contains(path.as_str()), "{manifest_err}");
}

#[rstest]
fn from_path_reports_missing_file() {
    let err = from_path(Utf8Path::new("does/not/exist/Kilnfile")).expect_err("missing");
    assert!(err.to_string().contains("reading manifest"), "{err}");
}
