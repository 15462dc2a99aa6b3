//! Named rules and the registry that owns them.

use indexmap::IndexMap;
use tracing::debug;

use super::{GraphError, ResolutionTable, RuleSignature};
use crate::vars::{ScopeLevel, VarValue, VariableScope};

/// Name of the built-in no-op rule understood by Ninja.
pub const PHONY_RULE: &str = "phony";

/// A reusable transformation template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    name: String,
    vars: VariableScope,
    signature: Option<RuleSignature>,
}

impl Rule {
    fn new(name: &str, signature: Option<RuleSignature>) -> Self {
        Self {
            name: name.to_owned(),
            vars: VariableScope::new(ScopeLevel::Rule),
            signature,
        }
    }

    /// Rule name as written after `rule`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the built-in `phony` rule.
    #[must_use]
    pub fn is_phony(&self) -> bool {
        self.name == PHONY_RULE
    }

    /// Signature used for automatic resolution, if declared.
    #[must_use]
    pub const fn signature(&self) -> Option<&RuleSignature> {
        self.signature.as_ref()
    }

    /// Rule-level variables.
    #[must_use]
    pub const fn vars(&self) -> &VariableScope {
        &self.vars
    }

    /// Mutable access to rule-level variables.
    pub const fn vars_mut(&mut self) -> &mut VariableScope {
        &mut self.vars
    }

    /// Bind a rule variable such as `command` or `depfile`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<VarValue>) -> &mut Self {
        self.vars.set(key, value);
        self
    }
}

/// Rules in registration order together with the resolution table their
/// signatures populate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRegistry {
    rules: IndexMap<String, Rule>,
    table: ResolutionTable,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        let mut rules = IndexMap::new();
        rules.insert(PHONY_RULE.to_owned(), Rule::new(PHONY_RULE, None));
        Self {
            rules,
            table: ResolutionTable::default(),
        }
    }
}

impl RuleRegistry {
    /// Register `name`, claiming the output shape of `signature` if given.
    ///
    /// The registry is left untouched when registration fails.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateRule`] for a reused name and the errors
    /// of [`ResolutionTable::register`] for a contested output shape.
    pub fn register(
        &mut self,
        name: &str,
        signature: Option<RuleSignature>,
    ) -> Result<&mut Rule, GraphError> {
        if self.rules.contains_key(name) {
            return Err(GraphError::DuplicateRule {
                name: name.to_owned(),
            });
        }
        if let Some(sig) = &signature {
            self.table.register(sig, name)?;
        }
        debug!(rule = name, "registered rule");
        let entry = self.rules.entry(name.to_owned());
        Ok(entry.or_insert_with(|| Rule::new(name, signature)))
    }

    /// Look up a rule by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    /// Mutable lookup by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Rule> {
        self.rules.get_mut(name)
    }

    /// Rules in registration order, `phony` first.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    /// The resolution table built from rule signatures.
    #[must_use]
    pub const fn table(&self) -> &ResolutionTable {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn phony_is_preregistered() {
        let registry = RuleRegistry::default();
        assert!(registry.get(PHONY_RULE).is_some_and(Rule::is_phony));
    }

    #[rstest]
    #[case("cxx")]
    #[case(PHONY_RULE)]
    fn duplicate_names_are_rejected(#[case] name: &str) {
        let mut registry = RuleRegistry::default();
        if name != PHONY_RULE {
            registry.register(name, None).expect("first");
        }
        let err = registry.register(name, None).expect_err("duplicate");
        assert_eq!(err, GraphError::DuplicateRule { name: name.into() });
    }

    #[rstest]
    fn failed_signature_leaves_name_free() {
        let mut registry = RuleRegistry::default();
        let sig = RuleSignature::new("cxx", [".o"], [".cpp"]).expect("sig");
        registry.register("cxx", Some(sig.clone())).expect("cxx");
        assert!(registry.register("cc", Some(sig)).is_err());
        assert!(registry.get("cc").is_none());
        registry.register("cc", None).expect("name still available");
    }

    #[rstest]
    fn registration_order_is_kept() {
        let mut registry = RuleRegistry::default();
        registry.register("link", None).expect("link");
        registry.register("cxx", None).expect("cxx");
        let names: Vec<_> = registry.iter().map(Rule::name).collect();
        assert_eq!(names, [PHONY_RULE, "link", "cxx"]);
    }
}
