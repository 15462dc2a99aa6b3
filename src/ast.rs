//! Kiln manifest Abstract Syntax Tree structures.
//!
//! This module defines the data structures used to represent a parsed
//! `Kilnfile`. They mirror the registration API: global variables, rules
//! with optional extension signatures, edges, and utility edges.
//!
//! ```rust
//! use kiln::ast::{DepsSpec, KilnManifest};
//!
//! let yaml = r#"
//! kiln_version: "1.0.0"
//! rules:
//!   - name: cxx
//!     targets: [".o"]
//!     deps: [".cpp"]
//!     vars: { command: "c++ -c $in -o $out" }
//! edges:
//!   - targets: { build: main.o }
//!     deps: { root: main.cpp }
//! "#;
//! let manifest: KilnManifest = kiln::manifest::from_str(yaml).expect("parse");
//! assert_eq!(manifest.rules.len(), 1);
//! assert!(matches!(manifest.edges.first().map(|e| &e.deps), Some(DepsSpec::One(_))));
//! ```

use indexmap::IndexMap;
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::deps::DepsLike;
use crate::path::{BuildPath, PathLike};
use crate::vars::VarValue;

/// Map type for `vars` blocks, preserving declaration order.
pub type Vars = IndexMap<String, VarSpec>;

/// Top-level manifest structure parsed from a `Kilnfile`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KilnManifest {
    /// Semantic version of the manifest format.
    pub kiln_version: Version,

    /// Graph-global variables.
    #[serde(default)]
    pub vars: Vars,

    /// Rules in registration order.
    #[serde(default)]
    pub rules: Vec<RuleDecl>,

    /// Edges in declaration order.
    #[serde(default)]
    pub edges: Vec<EdgeDecl>,

    /// Utility edges such as `phony` aliases.
    #[serde(default)]
    pub utils: Vec<UtilDecl>,
}

/// A rule declaration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDecl {
    /// Unique rule name.
    pub name: String,
    /// Output extensions the rule produces; requires `deps`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<ExtensionList>,
    /// Input extensions the rule consumes; requires `targets`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deps: Option<ExtensionList>,
    /// Rule-level variables such as `command`.
    #[serde(default)]
    pub vars: Vars,
}

/// An edge declaration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeDecl {
    /// Outputs of the edge.
    pub targets: DepsSpec,
    /// Inputs of the edge.
    #[serde(default)]
    pub deps: DepsSpec,
    /// Explicit rule, bypassing resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    /// Whether the edge is built by default.
    #[serde(default)]
    pub default: bool,
    /// Edge-level variables.
    #[serde(default)]
    pub vars: Vars,
}

/// A utility edge declaration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UtilDecl {
    /// Name of the utility target.
    pub name: String,
    /// Rule the utility runs.
    pub rule: String,
    /// Inputs of the utility.
    #[serde(default)]
    pub deps: DepsSpec,
    /// Whether the utility is built by default.
    #[serde(default)]
    pub default: bool,
    /// Edge-level variables.
    #[serde(default)]
    pub vars: Vars,
}

/// A single extension token or a list of them.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ExtensionList {
    /// One token.
    One(String),
    /// Several tokens.
    Many(Vec<String>),
}

impl From<ExtensionList> for Vec<String> {
    fn from(value: ExtensionList) -> Self {
        match value {
            ExtensionList::One(token) => vec![token],
            ExtensionList::Many(tokens) => tokens,
        }
    }
}

/// `{root: path}` in a manifest.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RootPath {
    /// Path relative to the project root.
    pub root: String,
}

/// `{build: path}` in a manifest.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BuildDirPath {
    /// Path relative to the build directory.
    pub build: String,
}

/// A path as written in a manifest.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum PathSpec {
    /// Text emitted verbatim.
    Literal(String),
    /// Root-relative path.
    Root(RootPath),
    /// Build-relative path.
    Build(BuildDirPath),
}

impl From<PathSpec> for PathLike {
    fn from(value: PathSpec) -> Self {
        match value {
            PathSpec::Literal(text) => Self::Literal(text),
            PathSpec::Root(RootPath { root }) => Self::Path(BuildPath::new(root, true)),
            PathSpec::Build(BuildDirPath { build }) => Self::Path(BuildPath::new(build, false)),
        }
    }
}

/// Paths split by dependency category.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SplitDeps {
    /// Explicit paths.
    #[serde(default)]
    pub explicit: Vec<PathSpec>,
    /// Implicit paths.
    #[serde(default)]
    pub implicit: Vec<PathSpec>,
    /// Order-only paths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_only: Option<Vec<PathSpec>>,
}

/// A dependency list as written in a manifest.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DepsSpec {
    /// Nothing declared.
    #[default]
    Empty,
    /// One explicit path.
    One(PathSpec),
    /// Several explicit paths.
    Many(Vec<PathSpec>),
    /// Paths split by category.
    Split(SplitDeps),
}

fn to_path_likes(specs: Vec<PathSpec>) -> Vec<PathLike> {
    specs.into_iter().map(PathLike::from).collect()
}

impl From<DepsSpec> for DepsLike {
    fn from(value: DepsSpec) -> Self {
        match value {
            DepsSpec::Empty => Self::Empty,
            DepsSpec::One(path) => Self::One(path.into()),
            DepsSpec::Many(paths) => Self::Many(to_path_likes(paths)),
            DepsSpec::Split(SplitDeps {
                explicit,
                implicit,
                order_only,
            }) => Self::Split {
                explicit: to_path_likes(explicit),
                implicit: to_path_likes(implicit),
                order_only: order_only.map(to_path_likes),
            },
        }
    }
}

/// A variable value as written in a manifest.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum VarSpec {
    /// Plain text.
    Text(String),
    /// A boolean, written as `true`/`false`.
    Bool(bool),
    /// A number, written in its canonical form.
    Number(serde_json::Number),
    /// Root-relative path.
    Root(RootPath),
    /// Build-relative path.
    Build(BuildDirPath),
}

impl From<VarSpec> for VarValue {
    fn from(value: VarSpec) -> Self {
        match value {
            VarSpec::Text(text) => Self::Text(text),
            VarSpec::Bool(flag) => Self::Text(flag.to_string()),
            VarSpec::Number(number) => Self::Text(number.to_string()),
            VarSpec::Root(RootPath { root }) => Self::Path(BuildPath::new(root, true)),
            VarSpec::Build(BuildDirPath { build }) => Self::Path(BuildPath::new(build, false)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(yaml: &str) -> DepsSpec {
        serde_json::from_value(serde_saphyr::from_str::<serde_json::Value>(yaml).expect("yaml"))
            .expect("deps spec")
    }

    #[rstest]
    #[case("main.o", DepsSpec::One(PathSpec::Literal("main.o".into())))]
    #[case("{ root: a.c }", DepsSpec::One(PathSpec::Root(RootPath { root: "a.c".into() })))]
    #[case(
        "[{ build: a.o }, b.o]",
        DepsSpec::Many(vec![
            PathSpec::Build(BuildDirPath { build: "a.o".into() }),
            PathSpec::Literal("b.o".into()),
        ])
    )]
    #[case(
        "{ explicit: [a.c], order_only: [stamp] }",
        DepsSpec::Split(SplitDeps {
            explicit: vec![PathSpec::Literal("a.c".into())],
            implicit: Vec::new(),
            order_only: Some(vec![PathSpec::Literal("stamp".into())]),
        })
    )]
    fn deps_spec_shapes(#[case] yaml: &str, #[case] expected: DepsSpec) {
        assert_eq!(parse(yaml), expected);
    }

    #[rstest]
    fn var_spec_renders_scalars() {
        let value: VarSpec = serde_json::from_value(serde_json::json!(3)).expect("number");
        assert_eq!(VarValue::from(value), VarValue::from("3"));
        let flag: VarSpec = serde_json::from_value(serde_json::json!(true)).expect("bool");
        assert_eq!(VarValue::from(flag), VarValue::from("true"));
    }
}
