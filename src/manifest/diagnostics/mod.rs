//! Diagnostics for manifests that fail to load.
//!
//! A [`ManifestSource`] pairs the YAML text with the label shown in reports.
//! [`map_yaml_error`] turns syntax errors into span-carrying [`miette`]
//! diagnostics; [`map_data_error`] covers documents that parse as YAML but do
//! not match the manifest schema.

// miette/thiserror derive expansion trips `unused_assignments` on some
// compiler versions.
// FIXME(rust-lang/rust#130021): remove once upstream is fixed.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use miette::Diagnostic;
use semver::Version;
use thiserror::Error;

mod yaml;

pub use yaml::map_yaml_error;

/// Manifest text together with the name used to label diagnostics.
///
/// ```rust
/// use kiln::manifest::ManifestSource;
///
/// let source = ManifestSource::new("Kilnfile", "kiln_version: 1.0.0\n");
/// assert_eq!(source.name(), "Kilnfile");
/// assert!(source.text().starts_with("kiln_version"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSource {
    name: String,
    text: String,
}

impl ManifestSource {
    /// Label `text` as coming from `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Label shown in diagnostics, usually the manifest path.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw YAML text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Error raised when a manifest cannot be turned into a
/// [`KilnManifest`](crate::ast::KilnManifest).
#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    /// The YAML was malformed or did not match the schema.
    #[error("failed to parse manifest '{name}'")]
    #[diagnostic(code(kiln::manifest::parse))]
    Parse {
        /// Manifest label.
        name: String,
        /// Syntax or structure diagnostic.
        #[source]
        #[diagnostic_source]
        source: Box<dyn Diagnostic + Send + Sync + 'static>,
    },

    /// `kiln_version` names a format this build does not understand.
    #[error("manifest '{name}' declares kiln_version {version}; only 1.x is supported")]
    #[diagnostic(
        code(kiln::manifest::version),
        help("set `kiln_version` to a 1.x release such as \"1.0.0\"")
    )]
    UnsupportedVersion {
        /// Manifest label.
        name: String,
        /// Declared version.
        version: Version,
    },
}

#[derive(Debug, Error, Diagnostic)]
#[error("{name}: {source}")]
#[diagnostic(
    code(kiln::manifest::structure),
    help("check field names and value shapes against the Kilnfile schema")
)]
struct DataDiagnostic {
    name: String,
    #[source]
    source: serde_json::Error,
}

/// Wrap a schema mismatch reported by `serde_json`.
///
/// No span is attached because the value tree no longer carries positions.
#[must_use]
pub fn map_data_error(
    err: serde_json::Error,
    source: &ManifestSource,
) -> Box<dyn Diagnostic + Send + Sync + 'static> {
    Box::new(DataDiagnostic {
        name: source.name().to_owned(),
        source: err,
    })
}
