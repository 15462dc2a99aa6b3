//! Span and hint reconstruction for `serde_saphyr` syntax errors.

// miette/thiserror derive expansion trips `unused_assignments` on some
// compiler versions.
// FIXME(rust-lang/rust#130021): remove once upstream is fixed.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde_saphyr::{Error as YamlError, Location};
use thiserror::Error;

use super::ManifestSource;
use crate::manifest::hints::{TAB_HINT, YAML_HINTS};

#[derive(Debug, Error, Diagnostic)]
#[error("YAML syntax error at line {line}, column {column}: {source}")]
#[diagnostic(code(kiln::manifest::yaml))]
struct YamlDiagnostic {
    #[source_code]
    src: NamedSource<String>,
    #[label("here")]
    span: Option<SourceSpan>,
    #[help]
    help: Option<String>,
    line: u64,
    column: u64,
    #[source]
    source: YamlError,
}

fn zero_based(value: u64) -> usize {
    usize::try_from(value.saturating_sub(1)).unwrap_or(usize::MAX)
}

/// Byte offset of a one-based `line`/`column` pair, clamped to the line end.
///
/// Columns count characters, so multi-byte text is walked per `char`. A
/// trailing `\r` is not part of the line.
fn offset_of(text: &str, line: u64, column: u64) -> usize {
    let mut start = 0usize;
    for (idx, raw) in text.split_inclusive('\n').enumerate() {
        if idx == zero_based(line) {
            let body = raw.trim_end_matches(['\n', '\r']);
            let within = body
                .char_indices()
                .nth(zero_based(column))
                .map_or(body.len(), |(at, _)| at);
            return start + within;
        }
        start += raw.len();
    }
    text.len()
}

/// One-character span at the error, or the character before it when the
/// error sits on a line break.
fn span_at(text: &str, loc: Location) -> SourceSpan {
    let at = offset_of(text, loc.line(), loc.column());
    let bytes = text.as_bytes();
    let printable = |b: &u8| *b != b'\n' && *b != b'\r';
    let start = if bytes.get(at).is_some_and(printable) {
        at
    } else if at > 0 && bytes.get(at - 1).is_some_and(printable) {
        at - 1
    } else {
        return SourceSpan::from((at, 0));
    };
    let width = text
        .get(start..)
        .and_then(|rest| rest.chars().next())
        .map_or(1, char::len_utf8);
    SourceSpan::from((start, width))
}

fn indented_with_tab(text: &str, loc: Location) -> bool {
    text.lines()
        .nth(zero_based(loc.line()))
        .is_some_and(|line| {
            line.chars()
                .take_while(|c| c.is_whitespace())
                .any(|c| c == '\t')
        })
}

fn hint_for(message: &str, text: &str, loc: Option<Location>) -> Option<String> {
    if loc.is_some_and(|l| indented_with_tab(text, l)) {
        return Some(TAB_HINT.to_owned());
    }
    let lower = message.to_lowercase();
    YAML_HINTS
        .iter()
        .find(|(needle, _)| lower.contains(*needle))
        .map(|(_, hint)| (*hint).to_owned())
}

/// Convert a YAML syntax error into a diagnostic pointing into `source`.
///
/// Errors without a location are reported at line 1, column 1 with no span.
#[must_use]
pub fn map_yaml_error(
    err: YamlError,
    source: &ManifestSource,
) -> Box<dyn Diagnostic + Send + Sync + 'static> {
    let loc = err.location();
    let text = source.text();
    let help = hint_for(&err.to_string(), text, loc);
    Box::new(YamlDiagnostic {
        src: NamedSource::new(source.name(), text.to_owned()),
        span: loc.map(|l| span_at(text, l)),
        help,
        line: loc.map_or(1, |l| l.line()),
        column: loc.map_or(1, |l| l.column()),
        source: err,
    })
}
