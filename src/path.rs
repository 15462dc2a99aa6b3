//! Path model for build graph declarations.
//!
//! A [`BuildPath`] records whether a path lives under the project root or
//! under the build directory. The concrete location is only computed during
//! emission, when both directories are known. Plain strings are also accepted
//! wherever a path is expected; they are written out verbatim, which allows
//! references to Ninja variables such as `$bindir/tool`.
//!
//! ```
//! use kiln::path::{BuildPath, PathLike};
//!
//! let src = BuildPath::root(["src", "main.cpp"]);
//! assert_eq!(src.concretize("/repo", "/repo/build"), "/repo/src/main.cpp");
//!
//! let obj = PathLike::from(BuildPath::build(["main.o"]));
//! assert_eq!(obj.extension(), ".o");
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;

/// A path anchored either at the project root or at the build directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuildPath {
    value: Utf8PathBuf,
    root_relative: bool,
}

impl BuildPath {
    /// Wrap a raw path value.
    #[must_use]
    pub fn new(value: impl Into<Utf8PathBuf>, root_relative: bool) -> Self {
        Self {
            value: value.into(),
            root_relative,
        }
    }

    /// Join `parts` into a path relative to the project root.
    #[must_use]
    pub fn root<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(join_parts(parts), true)
    }

    /// Join `parts` into a path relative to the build directory.
    #[must_use]
    pub fn build<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(join_parts(parts), false)
    }

    /// Build several root-relative paths, one per entry.
    #[must_use]
    pub fn roots<I, S>(values: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        values.into_iter().map(|v| Self::root([v])).collect()
    }

    /// Build several build-relative paths, one per entry.
    #[must_use]
    pub fn builds<I, S>(values: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        values.into_iter().map(|v| Self::build([v])).collect()
    }

    /// The raw value, independent of where the path is anchored.
    #[must_use]
    pub fn value(&self) -> &Utf8Path {
        &self.value
    }

    /// Whether the path is anchored at the project root.
    #[must_use]
    pub const fn is_root_relative(&self) -> bool {
        self.root_relative
    }

    /// Resolve against the root or build directory.
    ///
    /// An absolute value replaces the anchor entirely, mirroring
    /// [`Utf8Path::join`].
    #[must_use]
    pub fn concretize(&self, root_dir: &str, build_dir: &str) -> Utf8PathBuf {
        let anchor = if self.root_relative {
            root_dir
        } else {
            build_dir
        };
        Utf8Path::new(anchor).join(&self.value)
    }
}

fn join_parts<I, S>(parts: I) -> Utf8PathBuf
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut path = Utf8PathBuf::new();
    for part in parts {
        path.push(part.as_ref());
    }
    path
}

/// Anything accepted where a single path is expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathLike {
    /// Text written to the build file unchanged.
    Literal(String),
    /// An anchored path resolved at emission time.
    Path(BuildPath),
}

impl PathLike {
    /// The raw text used for extension inspection.
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Self::Literal(text) => text,
            Self::Path(path) => path.value().as_str(),
        }
    }

    /// The file extension including its leading dot, or an empty string.
    #[must_use]
    pub fn extension(&self) -> String {
        extension_of(self.raw())
    }

    /// Render for the build file.
    #[must_use]
    pub fn concretize(&self, root_dir: &str, build_dir: &str) -> String {
        match self {
            Self::Literal(text) => text.clone(),
            Self::Path(path) => path.concretize(root_dir, build_dir).into_string(),
        }
    }
}

impl From<&str> for PathLike {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_owned())
    }
}

impl From<String> for PathLike {
    fn from(value: String) -> Self {
        Self::Literal(value)
    }
}

impl From<BuildPath> for PathLike {
    fn from(value: BuildPath) -> Self {
        Self::Path(value)
    }
}

impl fmt::Display for PathLike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => f.write_str(text),
            Self::Path(path) if path.root_relative => write!(f, "<root>/{}", path.value),
            Self::Path(path) => write!(f, "<build>/{}", path.value),
        }
    }
}

/// Extension of the final component of `value`, including the dot.
///
/// Leading dots of a file name do not start an extension, so `.bashrc` has
/// none. Names without a dot yield an empty string.
///
/// ```
/// use kiln::path::extension_of;
/// assert_eq!(extension_of("out/main.o"), ".o");
/// assert_eq!(extension_of("archive.tar.gz"), ".gz");
/// assert_eq!(extension_of("bin/tool"), "");
/// assert_eq!(extension_of(".hidden"), "");
/// ```
#[must_use]
pub fn extension_of(value: &str) -> String {
    Utf8Path::new(value)
        .extension()
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

/// Whether `token` is a bare extension such as `.o`, or the empty string for
/// extension-less files.
#[must_use]
pub fn is_extension_token(token: &str) -> bool {
    extension_of(&format!("_{token}")) == token
}
