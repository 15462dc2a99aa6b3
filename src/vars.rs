//! Variable scopes attached to the graph, to rules and to edges.
//!
//! Ninja resolves edge variables before rule variables and rule variables
//! before globals. Kiln only records the bindings and writes them out at the
//! right indentation; keys a scope does not allow are rejected before any text
//! is produced.

use indexmap::IndexMap;
use std::fmt;

use crate::ir::GraphError;
use crate::path::BuildPath;

/// Name of the special variable holding the project root.
pub const ROOTDIR_VAR: &str = "rootdir";
/// Name of the special variable holding the build directory.
pub const BUILDDIR_VAR: &str = "builddir";

/// Value bound to a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarValue {
    /// Text written verbatim.
    Text(String),
    /// A path concretised at emission time.
    Path(BuildPath),
}

impl VarValue {
    /// Render for the build file.
    #[must_use]
    pub fn concretize(&self, root_dir: &str, build_dir: &str) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Path(path) => path.concretize(root_dir, build_dir).into_string(),
        }
    }
}

impl From<&str> for VarValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for VarValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<BuildPath> for VarValue {
    fn from(value: BuildPath) -> Self {
        Self::Path(value)
    }
}

/// Level a [`VariableScope`] is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeLevel {
    /// Top of the build file.
    Global,
    /// Inside a `rule` block.
    Rule,
    /// Inside a `build` statement.
    Edge,
}

impl ScopeLevel {
    /// Whether `key` may be declared at this level.
    #[must_use]
    pub fn allows(self, key: &str) -> bool {
        match self {
            Self::Global => key != ROOTDIR_VAR && key != BUILDDIR_VAR,
            Self::Rule | Self::Edge => true,
        }
    }

    /// Indentation used when writing bindings of this level.
    #[must_use]
    pub const fn indent(self) -> &'static str {
        match self {
            Self::Global => "",
            Self::Rule | Self::Edge => "  ",
        }
    }
}

/// Ordered key/value bindings of one scope. Re-setting a key keeps its
/// original position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableScope {
    level: ScopeLevel,
    vars: IndexMap<String, VarValue>,
}

impl VariableScope {
    /// An empty scope for `level`.
    #[must_use]
    pub fn new(level: ScopeLevel) -> Self {
        Self {
            level,
            vars: IndexMap::new(),
        }
    }

    /// Level this scope belongs to.
    #[must_use]
    pub const fn level(&self) -> ScopeLevel {
        self.level
    }

    /// Bind `key`; the last write wins.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<VarValue>) -> &mut Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Remove every key in `keys`.
    ///
    /// Nothing is removed unless all keys are present.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnsetMissing`] naming the first absent key.
    pub fn unset<I, K>(&mut self, keys: I) -> Result<&mut Self, GraphError>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let keys: Vec<String> = keys.into_iter().map(|k| k.as_ref().to_owned()).collect();
        if let Some(missing) = keys.iter().find(|k| !self.vars.contains_key(k.as_str())) {
            return Err(GraphError::UnsetMissing {
                key: missing.clone(),
            });
        }
        for key in &keys {
            self.vars.shift_remove(key.as_str());
        }
        Ok(self)
    }

    /// Look up the value bound to `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&VarValue> {
        self.vars.get(key)
    }

    /// Number of declared bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether no bindings are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Declared bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VarValue)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Reject keys the scope level does not allow.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ReservedVariable`] for the first rejected key.
    pub fn validate(&self) -> Result<(), GraphError> {
        match self.vars.keys().find(|k| !self.level.allows(k)) {
            Some(key) => Err(GraphError::ReservedVariable { key: key.clone() }),
            None => Ok(()),
        }
    }

    /// Write `specials` followed by the declared bindings.
    ///
    /// A blank line separates the two groups when both are present. Returns
    /// whether anything was written.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ReservedVariable`] when a key is not allowed at
    /// this level; nothing is written in that case.
    pub fn write_to(
        &self,
        out: &mut String,
        specials: &[(&str, &str)],
        root_dir: &str,
        build_dir: &str,
    ) -> Result<bool, GraphError> {
        self.validate()?;
        let indent = self.level.indent();
        for (key, value) in specials {
            push_binding(out, indent, key, value);
        }
        if !specials.is_empty() && !self.vars.is_empty() {
            out.push('\n');
        }
        for (key, value) in &self.vars {
            push_binding(out, indent, key, &value.concretize(root_dir, build_dir));
        }
        Ok(!specials.is_empty() || !self.vars.is_empty())
    }
}

fn push_binding(out: &mut String, indent: &str, key: &str, value: &str) {
    out.push_str(indent);
    out.push_str(key);
    out.push_str(" = ");
    out.push_str(value);
    out.push('\n');
}

impl fmt::Display for VariableScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.vars {
            match value {
                VarValue::Text(text) => writeln!(f, "{key} = {text}")?,
                VarValue::Path(path) => writeln!(f, "{key} = {}", path.value())?,
            }
        }
        Ok(())
    }
}
