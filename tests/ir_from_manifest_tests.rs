//! Manifest files on disk driven through the graph builder.

use camino::Utf8Path;
use kiln::ir::{ErrorCategory, GraphBuilder, GraphError};
use kiln::manifest;
use rstest::rstest;

fn load(name: &str) -> Result<GraphBuilder, GraphError> {
    let path = Utf8Path::new("tests/data").join(name);
    let manifest = manifest::from_path(&path).expect("manifest parses");
    GraphBuilder::from_manifest(&manifest)
}

#[rstest]
fn cxx_project_emits_every_scope() {
    let mut builder = load("cxx_project.yml").expect("graph");
    let text = builder.emit("/src", "/src/build").expect("emit");
    assert!(text.contains("incdir = /src/include\n"), "{text}");
    assert!(
        text.contains(
            "build $builddir/hello.o: cxx $rootdir/src/hello.cpp | $rootdir/include/hello.h\n"
        ),
        "{text}"
    );
    assert!(
        text.contains("build $builddir/hello: link $builddir/hello.o\n  pool = console\n"),
        "{text}"
    );
    assert!(text.contains("build all: phony $builddir/hello\n"), "{text}");
    assert!(!text.contains("rule unused"), "{text}");
    assert!(text.ends_with("\ndefault $builddir/hello\n"), "{text}");
}

#[rstest]
fn explicit_rule_without_signature() {
    let mut builder = load("touch.yml").expect("graph");
    let text = builder.emit("/p", "/p/out").expect("emit");
    assert!(text.contains("rule touch\n  command = touch $out\n"), "{text}");
    assert!(text.contains("build $builddir/stamp: touch\n"), "{text}");
}

#[rstest]
#[case("duplicate_edge_shape.yml", ErrorCategory::Configuration)]
#[case("reserved_builddir.yml", ErrorCategory::Configuration)]
fn invalid_declarations_fail_while_loading(
    #[case] name: &str,
    #[case] category: ErrorCategory,
) {
    let err = load(name).expect_err("declaration rejected");
    assert_eq!(err.category(), category, "{err}");
}

#[rstest]
fn duplicate_edge_shape_names_the_targets() {
    let err = load("duplicate_edge_shape.yml").expect_err("rejected");
    assert!(matches!(err, GraphError::DuplicateEdgeTargets { .. }), "{err}");
}

#[rstest]
fn reserved_builddir_is_reported() {
    let err = load("reserved_builddir.yml").expect_err("rejected");
    assert!(matches!(err, GraphError::ReservedVariable { .. }), "{err}");
}

#[rstest]
fn unknown_explicit_rule_fails_at_emission() {
    let mut builder = load("unknown_rule.yml").expect("declarations are accepted");
    let err = builder.emit("/p", "/p/build").expect_err("pandoc is not registered");
    assert!(
        matches!(err, GraphError::UnknownRule { ref name, .. } if name == "pandoc"),
        "{err}"
    );
    assert_eq!(err.category(), ErrorCategory::Lookup);
}
