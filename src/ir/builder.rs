//! Incremental graph construction.
//!
//! Invariants that only depend on what has been declared so far are checked
//! eagerly: rule names, rule output shapes, edge output shapes and utility
//! names. Rule resolution is deferred to [`GraphBuilder::finalize`] so edges
//! may be declared before the rules that build them.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, info};

use super::{
    Edge, EdgeKind, ExtensionSet, Graph, GraphError, ResolvedEdge, Rule, RuleRegistry,
    RuleSignature,
};
use crate::deps::{DependencySet, DepsLike, SetRole};
use crate::ninja_gen;
use crate::vars::{ScopeLevel, VarValue, VariableScope};

/// Position of an edge in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(usize);

/// Mutable registry of rules, edges and global variables.
///
/// ```
/// use kiln::ir::GraphBuilder;
/// use kiln::path::BuildPath;
///
/// # fn main() -> Result<(), kiln::ir::GraphError> {
/// let mut builder = GraphBuilder::new();
/// builder
///     .mapped_rule("cxx", &[".o"], &[".cpp"])?
///     .set("command", "c++ -c $in -o $out");
/// builder.add_edge(BuildPath::build(["main.o"]), None, BuildPath::root(["main.cpp"]), true)?;
/// let text = builder.emit("/src", "/src/build")?;
/// assert!(text.contains("build $builddir/main.o: cxx $rootdir/main.cpp\n"));
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    registry: RuleRegistry,
    edges: IndexMap<EdgeId, Edge>,
    edge_shapes: HashSet<ExtensionSet>,
    utility_names: HashSet<String>,
    globals: VariableScope,
    finalised: bool,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self {
            registry: RuleRegistry::default(),
            edges: IndexMap::new(),
            edge_shapes: HashSet::new(),
            utility_names: HashSet::new(),
            globals: VariableScope::new(ScopeLevel::Global),
            finalised: false,
        }
    }
}

impl GraphBuilder {
    /// An empty builder with only the `phony` rule registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    const fn ensure_open(&self) -> Result<(), GraphError> {
        if self.finalised {
            Err(GraphError::Finalised)
        } else {
            Ok(())
        }
    }

    /// Whether [`GraphBuilder::finalize`] has succeeded.
    #[must_use]
    pub const fn is_finalised(&self) -> bool {
        self.finalised
    }

    /// Register a rule, optionally with a `targets <- deps` signature.
    ///
    /// Both halves of the signature must be given together.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a duplicate name, a half signature
    /// or a contested output shape, a format error for a malformed extension
    /// token, and [`GraphError::Finalised`] after finalisation.
    pub fn register_rule(
        &mut self,
        name: &str,
        targets: Option<Vec<String>>,
        deps: Option<Vec<String>>,
    ) -> Result<&mut Rule, GraphError> {
        self.ensure_open()?;
        let signature = RuleSignature::from_parts(name, targets, deps)?;
        self.registry.register(name, signature)
    }

    /// Register a rule that is only used through explicit references.
    ///
    /// # Errors
    ///
    /// See [`GraphBuilder::register_rule`].
    pub fn rule(&mut self, name: &str) -> Result<&mut Rule, GraphError> {
        self.register_rule(name, None, None)
    }

    /// Register a rule resolving `targets` outputs from `deps` inputs.
    ///
    /// # Errors
    ///
    /// See [`GraphBuilder::register_rule`].
    pub fn mapped_rule(
        &mut self,
        name: &str,
        targets: &[&str],
        deps: &[&str],
    ) -> Result<&mut Rule, GraphError> {
        let owned = |tokens: &[&str]| -> Vec<String> {
            tokens.iter().map(|t| (*t).to_owned()).collect()
        };
        self.register_rule(name, Some(owned(targets)), Some(owned(deps)))
    }

    /// Registered rules, `phony` included.
    #[must_use]
    pub const fn rules(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Mutable access to a registered rule.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Finalised`] after finalisation.
    pub fn rule_mut(&mut self, name: &str) -> Result<Option<&mut Rule>, GraphError> {
        self.ensure_open()?;
        Ok(self.registry.get_mut(name))
    }

    /// Declare an edge building `targets` from `deps`.
    ///
    /// Without an explicit `rule` the edge is resolved from its extension
    /// shapes at finalisation.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OrderOnlyOutputs`] for order-only outputs,
    /// [`GraphError::DuplicateEdgeTargets`] when another edge already builds
    /// the same output extension set, and [`GraphError::Finalised`] after
    /// finalisation.
    pub fn add_edge(
        &mut self,
        targets: impl Into<DepsLike>,
        rule: Option<&str>,
        deps: impl Into<DepsLike>,
        is_default: bool,
    ) -> Result<&mut Edge, GraphError> {
        self.ensure_open()?;
        let outputs = DependencySet::from_like(targets.into(), SetRole::Outputs)?;
        let inputs = DependencySet::from_like(deps.into(), SetRole::Inputs)?;
        let shape = outputs.extension_set();
        if self.edge_shapes.contains(&shape) {
            return Err(GraphError::DuplicateEdgeTargets { targets: shape });
        }
        debug!(targets = %shape, outputs = %outputs.describe(), rule = ?rule, "declared edge");
        self.edge_shapes.insert(shape);
        let edge = Edge::new(
            EdgeKind::Standard,
            outputs,
            inputs,
            rule.map(str::to_owned),
            is_default,
        );
        Ok(self.push_edge(edge))
    }

    /// Declare a utility edge named `name` running `rule`.
    ///
    /// Utility edges are exempt from output-shape uniqueness but names must
    /// be unique among them.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateUtility`] for a reused name and
    /// [`GraphError::Finalised`] after finalisation.
    pub fn add_util(
        &mut self,
        name: &str,
        rule: &str,
        deps: impl Into<DepsLike>,
        is_default: bool,
    ) -> Result<&mut Edge, GraphError> {
        self.ensure_open()?;
        if self.utility_names.contains(name) {
            return Err(GraphError::DuplicateUtility {
                name: name.to_owned(),
            });
        }
        let inputs = DependencySet::from_like(deps.into(), SetRole::Inputs)?;
        debug!(name, rule, "declared utility edge");
        self.utility_names.insert(name.to_owned());
        let edge = Edge::new(
            EdgeKind::Utility,
            DependencySet::explicit([name]),
            inputs,
            Some(rule.to_owned()),
            is_default,
        );
        Ok(self.push_edge(edge))
    }

    fn push_edge(&mut self, edge: Edge) -> &mut Edge {
        let id = EdgeId(self.edges.len());
        self.edges.entry(id).or_insert(edge)
    }

    /// Declared edges in declaration order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().map(|(id, edge)| (*id, edge))
    }

    /// Mutable access to a declared edge.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Finalised`] after finalisation.
    pub fn edge_mut(&mut self, id: EdgeId) -> Result<Option<&mut Edge>, GraphError> {
        self.ensure_open()?;
        Ok(self.edges.get_mut(&id))
    }

    /// Bind a graph-global variable.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ReservedVariable`] for `rootdir` or `builddir`
    /// and [`GraphError::Finalised`] after finalisation.
    pub fn set_global(
        &mut self,
        key: &str,
        value: impl Into<VarValue>,
    ) -> Result<&mut Self, GraphError> {
        self.ensure_open()?;
        if !self.globals.level().allows(key) {
            return Err(GraphError::ReservedVariable {
                key: key.to_owned(),
            });
        }
        self.globals.set(key, value);
        Ok(self)
    }

    /// Remove graph-global variables.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnsetMissing`] for an absent key and
    /// [`GraphError::Finalised`] after finalisation.
    pub fn unset_global<I, K>(&mut self, keys: I) -> Result<&mut Self, GraphError>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        self.ensure_open()?;
        self.globals.unset(keys)?;
        Ok(self)
    }

    /// Graph-global variables.
    #[must_use]
    pub const fn globals(&self) -> &VariableScope {
        &self.globals
    }

    /// Soft lookup of the rule that would build `targets` from `deps`.
    ///
    /// Returns `Ok(None)` when a rule family owns the output shape but none
    /// of its members accepts the inputs.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NoRuleForTargets`] when no rule owns the output
    /// shape.
    pub fn probe_rule(
        &self,
        targets: &DependencySet,
        deps: &DependencySet,
    ) -> Result<Option<&str>, GraphError> {
        self.registry
            .table()
            .probe(&targets.extension_set(), &deps.extension_set())
    }

    fn resolve(&self, edge: &Edge) -> Result<ResolvedEdge, GraphError> {
        let rule = edge.resolve_rule(self.registry.table())?;
        if self.registry.get(rule).is_none() {
            return Err(GraphError::UnknownRule {
                name: rule.to_owned(),
                outputs: edge.targets().describe(),
            });
        }
        debug!(rule, outputs = %edge.targets().describe(), "resolved edge");
        Ok(ResolvedEdge {
            targets: edge.targets().clone(),
            deps: edge.deps().clone(),
            rule: rule.to_owned(),
            vars: edge.vars().clone(),
        })
    }

    /// Validate and resolve everything, producing an immutable [`Graph`].
    ///
    /// The builder is sealed as soon as finalisation begins, whether or not
    /// it succeeds. Every later declaration returns [`GraphError::Finalised`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ReservedVariable`] for a reserved global key,
    /// lookup errors for edges that cannot be resolved, and
    /// [`GraphError::Finalised`] when called twice.
    pub fn finalize(&mut self) -> Result<Graph, GraphError> {
        self.ensure_open()?;
        self.finalised = true;
        self.globals.validate()?;

        let mut standard = Vec::new();
        let mut utility = Vec::new();
        let mut defaults = Vec::new();
        for edge in self.edges.values() {
            let resolved = self.resolve(edge)?;
            if edge.is_default() {
                defaults.extend(edge.targets().explicit_paths().cloned());
            }
            match edge.kind() {
                EdgeKind::Standard => standard.push(resolved),
                EdgeKind::Utility => utility.push(resolved),
            }
        }

        let used: HashSet<&str> = standard
            .iter()
            .chain(&utility)
            .map(ResolvedEdge::rule)
            .collect();
        let rules: Vec<Rule> = self
            .registry
            .iter()
            .filter(|rule| !rule.is_phony() && used.contains(rule.name()))
            .cloned()
            .collect();
        standard.extend(utility);

        info!(
            rules = rules.len(),
            edges = standard.len(),
            defaults = defaults.len(),
            "finalised build graph"
        );
        Ok(Graph {
            globals: self.globals.clone(),
            rules,
            edges: standard,
            defaults,
        })
    }

    /// Finalise and render the build file text.
    ///
    /// # Errors
    ///
    /// See [`GraphBuilder::finalize`] and [`ninja_gen::generate`].
    pub fn emit(&mut self, root_dir: &str, build_dir: &str) -> Result<String, GraphError> {
        let graph = self.finalize()?;
        ninja_gen::generate(&graph, root_dir, build_dir)
    }
}
