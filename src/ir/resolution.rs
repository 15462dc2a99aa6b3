//! Extension-set signatures and the two-level rule resolution table.
//!
//! A rule may declare that it turns inputs with one set of extensions into
//! outputs with another. The table is keyed first by the output extension set
//! and then by the input extension set. Each output shape belongs to exactly
//! one rule family.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use itertools::Itertools;
use tracing::debug;

use super::GraphError;
use crate::path::{extension_of, is_extension_token};

/// Order-independent set of file extensions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExtensionSet(BTreeSet<String>);

impl ExtensionSet {
    /// Collect the extensions of `paths`.
    #[must_use]
    pub fn of_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paths.into_iter().map(|p| extension_of(p.as_ref())).collect()
    }

    /// Whether `ext` is a member.
    #[must_use]
    pub fn contains(&self, ext: &str) -> bool {
        self.0.contains(ext)
    }

    /// Number of distinct extensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Members in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl FromIterator<String> for ExtensionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for ExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items = self
            .0
            .iter()
            .map(|ext| if ext.is_empty() { "\"\"" } else { ext.as_str() })
            .join(", ");
        write!(f, "{{{items}}}")
    }
}

/// Canonical `targets <- deps` mapping declared by a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSignature {
    targets: ExtensionSet,
    deps: ExtensionSet,
}

impl RuleSignature {
    /// Build a signature from extension tokens such as `.o` or `""`.
    ///
    /// Dependency entries may also be file names; `main.c` contributes `.c`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidExtension`] when a target token is not a
    /// bare extension.
    pub fn new<T, D>(rule: &str, targets: T, deps: D) -> Result<Self, GraphError>
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        Ok(Self {
            targets: collect_tokens(rule, targets)?,
            deps: dependency_extensions(deps),
        })
    }

    /// Combine optional halves, requiring both or neither.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IncompleteSignature`] when only one half is
    /// present, or the errors of [`RuleSignature::new`].
    pub fn from_parts(
        rule: &str,
        targets: Option<Vec<String>>,
        deps: Option<Vec<String>>,
    ) -> Result<Option<Self>, GraphError> {
        match (targets, deps) {
            (None, None) => Ok(None),
            (Some(t), Some(d)) => Self::new(rule, t, d).map(Some),
            _ => Err(GraphError::IncompleteSignature {
                rule: rule.to_owned(),
            }),
        }
    }

    /// Output extension set.
    #[must_use]
    pub const fn targets(&self) -> &ExtensionSet {
        &self.targets
    }

    /// Input extension set.
    #[must_use]
    pub const fn deps(&self) -> &ExtensionSet {
        &self.deps
    }
}

fn collect_tokens<I>(rule: &str, tokens: I) -> Result<ExtensionSet, GraphError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|raw| {
            let token = raw.as_ref();
            if is_extension_token(token) {
                Ok(token.to_owned())
            } else {
                Err(GraphError::InvalidExtension {
                    rule: rule.to_owned(),
                    token: token.to_owned(),
                })
            }
        })
        .collect()
}

fn dependency_extensions<I>(entries: I) -> ExtensionSet
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    entries
        .into_iter()
        .map(|raw| {
            let entry = raw.as_ref();
            if is_extension_token(entry) {
                entry.to_owned()
            } else {
                extension_of(entry)
            }
        })
        .collect()
}

/// Dependency shapes registered for a single output shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetEntry {
    owner: String,
    rules: HashMap<ExtensionSet, String>,
}

impl TargetEntry {
    fn new(owner: &str) -> Self {
        Self {
            owner: owner.to_owned(),
            rules: HashMap::new(),
        }
    }

    /// Rule that claimed the output shape.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Rule mapped to `deps`, if any.
    #[must_use]
    pub fn rule_for(&self, deps: &ExtensionSet) -> Option<&str> {
        self.rules.get(deps).map(String::as_str)
    }

    fn insert(
        &mut self,
        targets: &ExtensionSet,
        deps: ExtensionSet,
        rule: &str,
    ) -> Result<(), GraphError> {
        if let Some(existing) = self.rules.get(&deps) {
            return Err(GraphError::DuplicateDependencyShape {
                targets: targets.clone(),
                deps,
                owner: existing.clone(),
            });
        }
        self.rules.insert(deps, rule.to_owned());
        Ok(())
    }
}

/// Mapping from output shape to input shape to rule name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionTable {
    entries: HashMap<ExtensionSet, TargetEntry>,
}

impl ResolutionTable {
    /// Check that `signature` could be registered without changing the table.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateRuleTargets`] when the output shape is
    /// already claimed.
    pub fn check(&self, signature: &RuleSignature) -> Result<(), GraphError> {
        match self.entries.get(signature.targets()) {
            Some(entry) => Err(GraphError::DuplicateRuleTargets {
                targets: signature.targets().clone(),
                owner: entry.owner().to_owned(),
            }),
            None => Ok(()),
        }
    }

    /// Claim the output shape of `signature` for `rule`.
    ///
    /// # Errors
    ///
    /// See [`ResolutionTable::check`].
    pub fn register(&mut self, signature: &RuleSignature, rule: &str) -> Result<(), GraphError> {
        self.check(signature)?;
        let mut entry = TargetEntry::new(rule);
        entry.insert(signature.targets(), signature.deps().clone(), rule)?;
        debug!(
            rule,
            targets = %signature.targets(),
            deps = %signature.deps(),
            "registered rule signature"
        );
        self.entries.insert(signature.targets().clone(), entry);
        Ok(())
    }

    /// Entry for an output shape.
    #[must_use]
    pub fn entry(&self, targets: &ExtensionSet) -> Option<&TargetEntry> {
        self.entries.get(targets)
    }

    /// Soft lookup of the rule building `targets` from `deps`.
    ///
    /// Yields `Ok(None)` when the output shape is known but no input shape
    /// matches, leaving the caller free to supply a rule of its own.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NoRuleForTargets`] when no rule declares the
    /// output shape.
    pub fn probe(
        &self,
        targets: &ExtensionSet,
        deps: &ExtensionSet,
    ) -> Result<Option<&str>, GraphError> {
        let entry = self
            .entries
            .get(targets)
            .ok_or_else(|| GraphError::NoRuleForTargets {
                targets: targets.clone(),
            })?;
        Ok(entry.rule_for(deps))
    }

    /// Number of claimed output shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no output shape is claimed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
