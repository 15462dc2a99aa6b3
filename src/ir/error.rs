//! Errors raised while building, resolving or finalising a graph.
//!
//! Every failure aborts the current call. [`GraphError::category`] maps each
//! variant onto the coarse taxonomy callers report on.

// miette/thiserror derive expansion trips `unused_assignments` on some
// compiler versions.
// FIXME(rust-lang/rust#130021): remove once upstream is fixed.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use miette::Diagnostic;
use thiserror::Error;

use super::ExtensionSet;

/// Coarse classification of a [`GraphError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The declarations contradict a graph invariant.
    Configuration,
    /// A name or shape could not be found.
    Lookup,
    /// A token does not have the expected shape.
    Format,
    /// The builder was used after finalisation.
    State,
}

/// Errors produced by [`GraphBuilder`](super::GraphBuilder).
#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum GraphError {
    /// A rule with the same name already exists.
    #[error("rule '{name}' is already registered")]
    #[diagnostic(code(kiln::graph::duplicate_rule))]
    DuplicateRule {
        /// The clashing rule name.
        name: String,
    },

    /// Only one half of a target/dependency signature was supplied.
    #[error("rule '{rule}' must declare both target and dependency signatures, or neither")]
    #[diagnostic(code(kiln::graph::incomplete_signature))]
    IncompleteSignature {
        /// Rule being registered.
        rule: String,
    },

    /// A signature entry is not a bare extension such as `.o`.
    #[error("rule '{rule}' has malformed extension token '{token}'")]
    #[diagnostic(
        code(kiln::graph::invalid_extension),
        help("signature entries are extensions with a leading dot, or \"\" for none")
    )]
    InvalidExtension {
        /// Rule being registered.
        rule: String,
        /// The offending token.
        token: String,
    },

    /// Another rule already owns this output shape.
    #[error("target extension set {targets} is already claimed by rule '{owner}'")]
    #[diagnostic(code(kiln::graph::duplicate_rule_targets))]
    DuplicateRuleTargets {
        /// The contested output shape.
        targets: ExtensionSet,
        /// Rule that registered it first.
        owner: String,
    },

    /// The output shape already maps this dependency shape to a rule.
    #[error("dependency set {deps} for targets {targets} is already mapped to rule '{owner}'")]
    #[diagnostic(code(kiln::graph::duplicate_dependency_shape))]
    DuplicateDependencyShape {
        /// Output shape.
        targets: ExtensionSet,
        /// Dependency shape.
        deps: ExtensionSet,
        /// Rule already mapped.
        owner: String,
    },

    /// Another edge already builds outputs with this extension set.
    #[error("an edge building {targets} is already declared")]
    #[diagnostic(
        code(kiln::graph::duplicate_edge_targets),
        help("each output shape may be produced by a single edge")
    )]
    DuplicateEdgeTargets {
        /// The contested output shape.
        targets: ExtensionSet,
    },

    /// A utility edge with the same name already exists.
    #[error("utility '{name}' is already declared")]
    #[diagnostic(code(kiln::graph::duplicate_utility))]
    DuplicateUtility {
        /// The clashing name.
        name: String,
    },

    /// Order-only paths were supplied for an output list.
    #[error("outputs cannot have order-only entries")]
    #[diagnostic(code(kiln::graph::order_only_outputs))]
    OrderOnlyOutputs,

    /// A reserved variable was overridden.
    #[error("variable '{key}' is reserved and cannot be set here")]
    #[diagnostic(code(kiln::graph::reserved_variable))]
    ReservedVariable {
        /// The rejected key.
        key: String,
    },

    /// No rule declares the output shape at all.
    #[error("no rule found matching target set {targets}")]
    #[diagnostic(code(kiln::graph::no_target_rule))]
    NoRuleForTargets {
        /// Output shape looked up.
        targets: ExtensionSet,
    },

    /// The output shape is known but no dependency shape matched.
    #[error("no rule found to build {outputs} from {inputs}")]
    #[diagnostic(
        code(kiln::graph::no_dependency_rule),
        help("register a rule for this dependency shape or name one on the edge")
    )]
    NoRuleForDependencies {
        /// Outputs of the edge, space separated.
        outputs: String,
        /// Explicit inputs of the edge, space separated.
        inputs: String,
    },

    /// An edge names a rule that was never registered.
    #[error("rule '{name}' referenced by {outputs} is not registered")]
    #[diagnostic(code(kiln::graph::unknown_rule))]
    UnknownRule {
        /// The missing rule.
        name: String,
        /// Outputs of the referencing edge.
        outputs: String,
    },

    /// A variable was unset without being set first.
    #[error("variable '{key}' is not set")]
    #[diagnostic(code(kiln::graph::unset_missing))]
    UnsetMissing {
        /// The absent key.
        key: String,
    },

    /// The builder has already produced its graph.
    #[error("the build graph has been finalised; no further declarations are accepted")]
    #[diagnostic(code(kiln::graph::finalised))]
    Finalised,
}

impl GraphError {
    /// Classify this error.
    ///
    /// ```
    /// use kiln::ir::{ErrorCategory, GraphError};
    /// let err = GraphError::DuplicateRule { name: "cxx".into() };
    /// assert_eq!(err.category(), ErrorCategory::Configuration);
    /// ```
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::DuplicateRule { .. }
            | Self::IncompleteSignature { .. }
            | Self::DuplicateRuleTargets { .. }
            | Self::DuplicateDependencyShape { .. }
            | Self::DuplicateEdgeTargets { .. }
            | Self::DuplicateUtility { .. }
            | Self::OrderOnlyOutputs
            | Self::ReservedVariable { .. } => ErrorCategory::Configuration,
            Self::NoRuleForTargets { .. }
            | Self::NoRuleForDependencies { .. }
            | Self::UnknownRule { .. }
            | Self::UnsetMissing { .. } => ErrorCategory::Lookup,
            Self::InvalidExtension { .. } => ErrorCategory::Format,
            Self::Finalised => ErrorCategory::State,
        }
    }
}
