//! Manifest loading.
//!
//! A `Kilnfile` is parsed in two passes: `serde_saphyr` turns the YAML into a
//! [`ManifestValue`] tree, then `serde_json` maps that tree onto
//! [`KilnManifest`]. Syntax errors keep their source spans; schema errors
//! carry the manifest name. Only `kiln_version` 1.x is accepted.

use std::fs;

use anyhow::{Context, Result};
use camino::Utf8Path;
use tracing::debug;

use crate::ast::KilnManifest;

mod diagnostics;
mod hints;

pub use diagnostics::{ManifestError, ManifestSource, map_data_error, map_yaml_error};

/// JSON representation of a manifest between the two parsing passes.
pub type ManifestValue = serde_json::Value;

/// File name looked up when no manifest path is given.
pub const DEFAULT_MANIFEST: &str = "Kilnfile";

/// Major `kiln_version` understood by this crate.
pub const SUPPORTED_MAJOR: u64 = 1;

/// Parse a manifest held in `source`.
///
/// # Errors
///
/// Returns [`ManifestError::Parse`] for malformed YAML or a document that
/// does not match the schema and [`ManifestError::UnsupportedVersion`] for a
/// `kiln_version` outside 1.x.
pub fn from_source(source: &ManifestSource) -> Result<KilnManifest, ManifestError> {
    let doc: ManifestValue =
        serde_saphyr::from_str(source.text()).map_err(|err| ManifestError::Parse {
            name: source.name().to_owned(),
            source: map_yaml_error(err, source),
        })?;
    let manifest: KilnManifest =
        serde_json::from_value(doc).map_err(|err| ManifestError::Parse {
            name: source.name().to_owned(),
            source: map_data_error(err, source),
        })?;
    if manifest.kiln_version.major != SUPPORTED_MAJOR {
        return Err(ManifestError::UnsupportedVersion {
            name: source.name().to_owned(),
            version: manifest.kiln_version,
        });
    }
    debug!(
        manifest = source.name(),
        rules = manifest.rules.len(),
        edges = manifest.edges.len(),
        utils = manifest.utils.len(),
        "parsed manifest"
    );
    Ok(manifest)
}

/// Parse manifest text labelled as [`DEFAULT_MANIFEST`].
///
/// ```rust
/// let manifest = kiln::manifest::from_str("kiln_version: 1.2.0\n").expect("parse");
/// assert!(manifest.rules.is_empty());
/// ```
///
/// # Errors
///
/// See [`from_source`].
pub fn from_str(yaml: &str) -> Result<KilnManifest, ManifestError> {
    from_source(&ManifestSource::new(DEFAULT_MANIFEST, yaml))
}

/// Read and parse the manifest at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails to parse.
pub fn from_path(path: &Utf8Path) -> Result<KilnManifest> {
    let text = fs::read_to_string(path).with_context(|| format!("reading manifest {path}"))?;
    let manifest = from_source(&ManifestSource::new(path.as_str(), text))?;
    Ok(manifest)
}

#[cfg(test)]
mod tests;
