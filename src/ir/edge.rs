//! Build edges: one production step from dependencies to outputs.

use super::{ExtensionSet, GraphError, ResolutionTable};
use crate::deps::DependencySet;
use crate::vars::{ScopeLevel, VarValue, VariableScope};

/// How an edge takes part in shape validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Outputs claim a unique extension set; the rule may be resolved.
    Standard,
    /// A single named target with an explicit rule, such as a `phony` alias.
    Utility,
}

/// A declared production step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    kind: EdgeKind,
    targets: DependencySet,
    deps: DependencySet,
    rule: Option<String>,
    default: bool,
    vars: VariableScope,
}

impl Edge {
    pub(crate) fn new(
        kind: EdgeKind,
        targets: DependencySet,
        deps: DependencySet,
        rule: Option<String>,
        default: bool,
    ) -> Self {
        Self {
            kind,
            targets,
            deps,
            rule,
            default,
            vars: VariableScope::new(ScopeLevel::Edge),
        }
    }

    /// Standard or utility edge.
    #[must_use]
    pub const fn kind(&self) -> EdgeKind {
        self.kind
    }

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

    /// Explicitly chosen rule, if any.
    #[must_use]
    pub fn rule(&self) -> Option<&str> {
        self.rule.as_deref()
    }

    /// Choose the rule explicitly, bypassing resolution.
    pub fn set_rule(&mut self, name: impl Into<String>) -> &mut Self {
        self.rule = Some(name.into());
        self
    }

    /// Drop an explicit rule so the edge is resolved from its shape.
    ///
    /// Utility edges keep their rule.
    pub fn clear_rule(&mut self) -> &mut Self {
        if self.kind == EdgeKind::Standard {
            self.rule = None;
        }
        self
    }

    /// Whether the edge belongs to the default set.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.default
    }

    /// Edge-level variables.
    #[must_use]
    pub const fn vars(&self) -> &VariableScope {
        &self.vars
    }

    /// Mutable access to edge-level variables.
    pub const fn vars_mut(&mut self) -> &mut VariableScope {
        &mut self.vars
    }

    /// Bind an edge variable, shadowing any rule or global binding.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<VarValue>) -> &mut Self {
        self.vars.set(key, value);
        self
    }

    /// Extension set of the explicit outputs.
    #[must_use]
    pub fn target_extensions(&self) -> ExtensionSet {
        self.targets.extension_set()
    }

    /// Extension set of the explicit inputs.
    #[must_use]
    pub fn dep_extensions(&self) -> ExtensionSet {
        self.deps.extension_set()
    }

    /// Soft resolution: the explicit rule, or the table's match if any.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NoRuleForTargets`] when there is no explicit rule
    /// and no rule declares the output shape.
    pub fn probe_rule<'a>(
        &'a self,
        table: &'a ResolutionTable,
    ) -> Result<Option<&'a str>, GraphError> {
        match self.rule.as_deref() {
            Some(name) => Ok(Some(name)),
            None => table.probe(&self.target_extensions(), &self.dep_extensions()),
        }
    }

    /// Final resolution used when the graph is finalised.
    ///
    /// # Errors
    ///
    /// Besides the errors of [`Edge::probe_rule`], returns
    /// [`GraphError::NoRuleForDependencies`] when the output shape is known
    /// but nothing matches the inputs.
    pub fn resolve_rule<'a>(&'a self, table: &'a ResolutionTable) -> Result<&'a str, GraphError> {
        self.probe_rule(table)?
            .ok_or_else(|| GraphError::NoRuleForDependencies {
                outputs: self.targets.describe(),
                inputs: self.deps.describe(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::RuleSignature;
    use crate::path::BuildPath;
    use rstest::{fixture, rstest};

    #[fixture]
    fn table() -> ResolutionTable {
        let mut table = ResolutionTable::default();
        let sig = RuleSignature::new("cxx", [".o"], [".cpp"]).expect("sig");
        table.register(&sig, "cxx").expect("register");
        table
    }

    fn edge(target: &str, dep: &str) -> Edge {
        Edge::new(
            EdgeKind::Standard,
            DependencySet::explicit(vec![BuildPath::build([target])]),
            DependencySet::explicit(vec![BuildPath::root([dep])]),
            None,
            false,
        )
    }

    #[rstest]
    fn explicit_rule_wins(table: ResolutionTable) {
        let mut e = edge("main.o", "main.c");
        e.set_rule("cc");
        assert_eq!(e.resolve_rule(&table).expect("rule"), "cc");
    }

    #[rstest]
    fn resolves_from_shape(table: ResolutionTable) {
        let e = edge("main.o", "main.cpp");
        assert_eq!(e.resolve_rule(&table).expect("rule"), "cxx");
    }

    #[rstest]
    fn unmatched_deps_are_soft_then_hard(table: ResolutionTable) {
        let e = edge("main.o", "main.f90");
        assert_eq!(e.probe_rule(&table).expect("probe"), None);
        let err = e.resolve_rule(&table).expect_err("no rule");
        assert!(matches!(err, GraphError::NoRuleForDependencies { .. }));
    }

    #[rstest]
    fn clear_rule_restores_resolution(table: ResolutionTable) {
        let mut e = edge("main.o", "main.cpp");
        e.set_rule("custom").clear_rule();
        assert_eq!(e.rule(), None);
        assert_eq!(e.resolve_rule(&table).expect("rule"), "cxx");
    }

    #[rstest]
    fn utility_keeps_rule() {
        let mut e = Edge::new(
            EdgeKind::Utility,
            DependencySet::explicit(["all"]),
            DependencySet::default(),
            Some("phony".into()),
            true,
        );
        e.clear_rule();
        assert_eq!(e.rule(), Some("phony"));
    }
}
