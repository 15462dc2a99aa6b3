//! Ninja file generator.
//!
//! This module converts a finalised [`Graph`] into the textual representation
//! expected by the Ninja build system. Global variables are written with the
//! concrete root and build directories; paths inside rules and edges refer to
//! them through `$rootdir` and `$builddir` so the file stays readable.

use itertools::Itertools;
use std::fmt::{self, Display, Formatter};

use crate::ir::{Graph, GraphError, ResolvedEdge};
use crate::path::PathLike;
use crate::vars::{BUILDDIR_VAR, ROOTDIR_VAR};

/// Reference to the root directory inside rules and edges.
pub const ROOTDIR_REF: &str = "$rootdir";
/// Reference to the build directory inside rules and edges.
pub const BUILDDIR_REF: &str = "$builddir";

/// Generate a Ninja build file as a string.
///
/// # Errors
///
/// Returns [`GraphError::ReservedVariable`] if a scope holds a key its level
/// does not allow.
pub fn generate(graph: &Graph, root_dir: &str, build_dir: &str) -> Result<String, GraphError> {
    let mut out = String::new();

    let specials = [(ROOTDIR_VAR, root_dir), (BUILDDIR_VAR, build_dir)];
    if graph
        .globals()
        .write_to(&mut out, &specials, root_dir, build_dir)?
    {
        out.push('\n');
    }

    for rule in graph.rules() {
        out.push_str("rule ");
        out.push_str(rule.name());
        out.push('\n');
        rule.vars()
            .write_to(&mut out, &[], ROOTDIR_REF, BUILDDIR_REF)?;
        out.push('\n');
    }

    for edge in graph.edges() {
        out.push_str(&DisplayEdge { edge }.to_string());
        edge.vars()
            .write_to(&mut out, &[], ROOTDIR_REF, BUILDDIR_REF)?;
    }

    if !graph.defaults().is_empty() {
        out.push_str("\ndefault ");
        out.push_str(&join(graph.defaults()));
        out.push('\n');
    }

    Ok(out)
}

fn join(paths: &[PathLike]) -> String {
    paths
        .iter()
        .map(|p| p.concretize(ROOTDIR_REF, BUILDDIR_REF))
        .join(" ")
}

/// Wrapper struct to display the `build` line of an edge.
struct DisplayEdge<'a> {
    edge: &'a ResolvedEdge,
}

impl Display for DisplayEdge<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let targets = self.edge.targets().render(ROOTDIR_REF, BUILDDIR_REF);
        write!(f, "build {targets}: {}", self.edge.rule())?;
        if !self.edge.deps().is_empty() {
            write!(f, " {}", self.edge.deps().render(ROOTDIR_REF, BUILDDIR_REF))?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::GraphBuilder;
    use crate::path::BuildPath;
    use rstest::rstest;

    #[rstest]
    fn generate_simple_ninja() {
        let mut builder = GraphBuilder::new();
        builder
            .mapped_rule("cxx", &[".o"], &[".cpp"])
            .expect("rule")
            .set("command", "c++ -c $in -o $out");
        builder
            .add_edge(
                BuildPath::build(["out", "main.o"]),
                None,
                BuildPath::root(["main.cpp"]),
                true,
            )
            .expect("edge");
        let ninja = builder.emit("/src", "/src/build").expect("emit");
        let expected = concat!(
            "rootdir = /src\n",
            "builddir = /src/build\n",
            "\n",
            "rule cxx\n",
            "  command = c++ -c $in -o $out\n",
            "\n",
            "build $builddir/out/main.o: cxx $rootdir/main.cpp\n",
            "\n",
            "default $builddir/out/main.o\n",
        );
        assert_eq!(ninja, expected);
    }

    #[rstest]
    fn edge_without_deps_has_no_trailing_space() {
        let mut builder = GraphBuilder::new();
        builder.rule("stamp").expect("rule").set("command", "touch $out");
        builder
            .add_edge("stamp.txt", Some("stamp"), Vec::<PathLike>::new(), false)
            .expect("edge");
        let ninja = builder.emit("/r", "/r/b").expect("emit");
        assert!(ninja.contains("build stamp.txt: stamp\n"), "{ninja}");
    }

    #[rstest]
    fn unused_and_phony_rules_are_skipped() {
        let mut builder = GraphBuilder::new();
        builder.rule("unused").expect("rule").set("command", "false");
        builder.add_util("all", "phony", "a.o", true).expect("util");
        let ninja = builder.emit("/r", "/r/b").expect("emit");
        assert!(!ninja.contains("rule "), "{ninja}");
        assert!(ninja.contains("build all: phony a.o\n"), "{ninja}");
        assert!(ninja.ends_with("\ndefault all\n"), "{ninja}");
    }
}
