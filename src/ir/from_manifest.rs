//! Populate a [`GraphBuilder`] from a parsed manifest.
//!
//! Declarations are replayed in document order: globals, rules, edges and
//! finally utility edges, so errors surface exactly as they would for the
//! equivalent sequence of builder calls.

use tracing::debug;

use super::{GraphBuilder, GraphError};
use crate::ast::{EdgeDecl, KilnManifest, RuleDecl, UtilDecl, Vars};
use crate::vars::VariableScope;

fn apply_vars(scope: &mut VariableScope, vars: &Vars) {
    for (key, value) in vars {
        scope.set(key.as_str(), value.clone());
    }
}

impl GraphBuilder {
    /// Build an unfinalised graph from `manifest`.
    ///
    /// ```rust
    /// use kiln::ir::GraphBuilder;
    ///
    /// let manifest = kiln::manifest::from_str(concat!(
    ///     "kiln_version: 1.0.0\n",
    ///     "rules:\n",
    ///     "  - { name: cc, targets: .o, deps: .c, vars: { command: cc -c $in } }\n",
    ///     "edges:\n",
    ///     "  - { targets: { build: a.o }, deps: { root: a.c }, default: true }\n",
    /// ))
    /// .expect("manifest");
    /// let mut builder = GraphBuilder::from_manifest(&manifest).expect("graph");
    /// let text = builder.emit("/src", "/src/build").expect("emit");
    /// assert!(text.contains("build $builddir/a.o: cc $rootdir/a.c\n"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns the first [`GraphError`] raised while registering the
    /// declarations.
    pub fn from_manifest(manifest: &KilnManifest) -> Result<Self, GraphError> {
        let mut builder = Self::new();
        for (key, value) in &manifest.vars {
            builder.set_global(key, value.clone())?;
        }
        for rule in &manifest.rules {
            builder.declare_rule(rule)?;
        }
        for edge in &manifest.edges {
            builder.declare_edge(edge)?;
        }
        for util in &manifest.utils {
            builder.declare_util(util)?;
        }
        debug!(
            rules = manifest.rules.len(),
            edges = manifest.edges.len() + manifest.utils.len(),
            "loaded manifest into graph builder"
        );
        Ok(builder)
    }

    fn declare_rule(&mut self, decl: &RuleDecl) -> Result<(), GraphError> {
        let rule = self.register_rule(
            &decl.name,
            decl.targets.clone().map(Vec::from),
            decl.deps.clone().map(Vec::from),
        )?;
        apply_vars(rule.vars_mut(), &decl.vars);
        Ok(())
    }

    fn declare_edge(&mut self, decl: &EdgeDecl) -> Result<(), GraphError> {
        let edge = self.add_edge(
            decl.targets.clone(),
            decl.rule.as_deref(),
            decl.deps.clone(),
            decl.default,
        )?;
        apply_vars(edge.vars_mut(), &decl.vars);
        Ok(())
    }

    fn declare_util(&mut self, decl: &UtilDecl) -> Result<(), GraphError> {
        let edge = self.add_util(&decl.name, &decl.rule, decl.deps.clone(), decl.default)?;
        apply_vars(edge.vars_mut(), &decl.vars);
        Ok(())
    }
}
