//! Immutable, fully resolved build graph produced by
//! [`GraphBuilder::finalize`](super::GraphBuilder::finalize).

use super::Rule;
use crate::deps::DependencySet;
use crate::path::PathLike;
use crate::vars::VariableScope;

/// An edge whose rule is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEdge {
    pub(crate) targets: DependencySet,
    pub(crate) deps: DependencySet,
    pub(crate) rule: String,
    pub(crate) vars: VariableScope,
}

impl ResolvedEdge {
    /// Outputs of the edge.
    #[must_use]
    pub const fn targets(&self) -> &DependencySet {
        &self.targets
    }

    /// Inputs of the edge.
    #[must_use]
    pub const fn deps(&self) -> &DependencySet {
        &self.deps
    }

    /// Rule the edge runs.
    #[must_use]
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Edge-level variables.
    #[must_use]
    pub const fn vars(&self) -> &VariableScope {
        &self.vars
    }
}

/// Validated graph ready for emission.
///
/// Only rules referenced by at least one edge are kept, in registration
/// order; `phony` is never among them. Edges keep declaration order with
/// standard edges ahead of utility edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    pub(crate) globals: VariableScope,
    pub(crate) rules: Vec<Rule>,
    pub(crate) edges: Vec<ResolvedEdge>,
    pub(crate) defaults: Vec<PathLike>,
}

impl Graph {
    /// Graph-global variables.
    #[must_use]
    pub const fn globals(&self) -> &VariableScope {
        &self.globals
    }

    /// Rules to emit.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Edges to emit.
    #[must_use]
    pub fn edges(&self) -> &[ResolvedEdge] {
        &self.edges
    }

    /// Outputs of default edges in declaration order.
    #[must_use]
    pub fn defaults(&self) -> &[PathLike] {
        &self.defaults
    }
}
