//! Build graph model, rule resolution and validation.
//!
//! Rules may declare a canonical mapping from input extensions to output
//! extensions. Edges that do not name a rule are matched against those
//! mappings by the extension sets of their explicit outputs and inputs. The
//! [`GraphBuilder`] enforces uniqueness invariants as declarations arrive and
//! resolves every edge when it is finalised into a [`Graph`].
//!
//! # Examples
//!
//! ```
//! use kiln::ir::{GraphBuilder, GraphError, ErrorCategory};
//! use kiln::path::BuildPath;
//!
//! let mut builder = GraphBuilder::new();
//! builder.mapped_rule("cxx", &[".o"], &[".cpp"]).expect("rule");
//! builder
//!     .add_edge(BuildPath::build(["a.o"]), None, BuildPath::root(["a.cpp"]), false)
//!     .expect("edge");
//! let err = builder
//!     .add_edge(BuildPath::build(["b.o"]), None, BuildPath::root(["b.cpp"]), false)
//!     .expect_err("same output shape");
//! assert_eq!(err.category(), ErrorCategory::Configuration);
//! ```

mod builder;
mod edge;
mod error;
mod from_manifest;
mod graph;
mod resolution;
mod rule;

pub use builder::{EdgeId, GraphBuilder};
pub use edge::{Edge, EdgeKind};
pub use error::{ErrorCategory, GraphError};
pub use graph::{Graph, ResolvedEdge};
pub use resolution::{ExtensionSet, ResolutionTable, RuleSignature, TargetEntry};
pub use rule::{PHONY_RULE, Rule, RuleRegistry};
