//! Dependency sets: explicit, implicit and order-only path groups.
//!
//! The same structure describes both the outputs and the inputs of an edge.
//! Outputs may not carry order-only entries. Each group keeps declaration
//! order and drops duplicates.

use indexmap::IndexSet;
use itertools::Itertools;

use crate::ir::{ExtensionSet, GraphError};
use crate::path::{BuildPath, PathLike};

/// Whether a [`DependencySet`] lists outputs or inputs of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetRole {
    /// Files produced by an edge.
    Outputs,
    /// Files consumed by an edge.
    Inputs,
}

/// Anything accepted where a dependency list is expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepsLike {
    /// No paths at all.
    Empty,
    /// A single explicit path.
    One(PathLike),
    /// Several explicit paths.
    Many(Vec<PathLike>),
    /// Paths already split by category.
    Split {
        /// Paths that trigger rebuilds and appear in `$in`/`$out`.
        explicit: Vec<PathLike>,
        /// Paths that trigger rebuilds but stay out of `$in`/`$out`.
        implicit: Vec<PathLike>,
        /// Paths that must exist first; `None` when not supplied.
        order_only: Option<Vec<PathLike>>,
    },
    /// A set built earlier, accepted unchanged.
    Built(DependencySet),
}

impl From<&str> for DepsLike {
    fn from(value: &str) -> Self {
        Self::One(value.into())
    }
}

impl From<String> for DepsLike {
    fn from(value: String) -> Self {
        Self::One(value.into())
    }
}

impl From<BuildPath> for DepsLike {
    fn from(value: BuildPath) -> Self {
        Self::One(value.into())
    }
}

impl From<PathLike> for DepsLike {
    fn from(value: PathLike) -> Self {
        Self::One(value)
    }
}

impl<T: Into<PathLike>> From<Vec<T>> for DepsLike {
    fn from(value: Vec<T>) -> Self {
        Self::Many(value.into_iter().map(Into::into).collect())
    }
}

impl From<DependencySet> for DepsLike {
    fn from(value: DependencySet) -> Self {
        Self::Built(value)
    }
}

/// Explicit, implicit and order-only paths of one side of an edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    explicit: IndexSet<PathLike>,
    implicit: IndexSet<PathLike>,
    order_only: IndexSet<PathLike>,
}

impl DependencySet {
    /// Normalise `like` for the given role.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OrderOnlyOutputs`] when order-only paths are
    /// supplied for [`SetRole::Outputs`].
    pub fn from_like(like: DepsLike, role: SetRole) -> Result<Self, GraphError> {
        let set = match like {
            DepsLike::Empty => Self::default(),
            DepsLike::One(path) => Self::explicit([path]),
            DepsLike::Many(paths) => Self::explicit(paths),
            DepsLike::Split {
                explicit,
                implicit,
                order_only,
            } => {
                if role == SetRole::Outputs && order_only.is_some() {
                    return Err(GraphError::OrderOnlyOutputs);
                }
                Self {
                    explicit: explicit.into_iter().collect(),
                    implicit: implicit.into_iter().collect(),
                    order_only: order_only.unwrap_or_default().into_iter().collect(),
                }
            }
            DepsLike::Built(set) => set,
        };
        if role == SetRole::Outputs && !set.order_only.is_empty() {
            return Err(GraphError::OrderOnlyOutputs);
        }
        Ok(set)
    }

    /// Normalise `like` as an output list.
    ///
    /// # Errors
    ///
    /// See [`DependencySet::from_like`].
    pub fn outputs(like: impl Into<DepsLike>) -> Result<Self, GraphError> {
        Self::from_like(like.into(), SetRole::Outputs)
    }

    /// Normalise `like` as an input list.
    ///
    /// # Errors
    ///
    /// Never fails for inputs; the signature matches [`DependencySet::outputs`].
    pub fn inputs(like: impl Into<DepsLike>) -> Result<Self, GraphError> {
        Self::from_like(like.into(), SetRole::Inputs)
    }

    /// A set holding only explicit paths.
    #[must_use]
    pub fn explicit<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathLike>,
    {
        Self {
            explicit: paths.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Add implicit paths, returning the updated set.
    #[must_use]
    pub fn with_implicit<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathLike>,
    {
        self.implicit.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Add order-only paths, returning the updated set.
    #[must_use]
    pub fn with_order_only<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathLike>,
    {
        self.order_only.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Explicit paths in declaration order.
    pub fn explicit_paths(&self) -> impl Iterator<Item = &PathLike> {
        self.explicit.iter()
    }

    /// Implicit paths in declaration order.
    pub fn implicit_paths(&self) -> impl Iterator<Item = &PathLike> {
        self.implicit.iter()
    }

    /// Order-only paths in declaration order.
    pub fn order_only_paths(&self) -> impl Iterator<Item = &PathLike> {
        self.order_only.iter()
    }

    /// Whether all three groups are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.explicit.is_empty() && self.implicit.is_empty() && self.order_only.is_empty()
    }

    /// Extensions of the explicit paths, used as the resolution key.
    #[must_use]
    pub fn extension_set(&self) -> ExtensionSet {
        self.explicit.iter().map(PathLike::extension).collect()
    }

    /// Human-readable list of explicit paths for diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        self.explicit.iter().join(", ")
    }

    /// Render as `a b | c d || e`, omitting empty groups.
    #[must_use]
    pub fn render(&self, root_dir: &str, build_dir: &str) -> String {
        let expand = |p: &PathLike| p.concretize(root_dir, build_dir);
        let mut parts: Vec<String> = self.explicit.iter().map(expand).collect();
        if !self.implicit.is_empty() {
            parts.push("|".to_owned());
            parts.extend(self.implicit.iter().map(expand));
        }
        if !self.order_only.is_empty() {
            parts.push("||".to_owned());
            parts.extend(self.order_only.iter().map(expand));
        }
        parts.join(" ")
    }
}
