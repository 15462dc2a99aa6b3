//! Substring-matched advice attached to YAML parse diagnostics.

/// `(needle, hint)` pairs; the first needle found in the lowercased parser
/// message wins.
pub(crate) const YAML_HINTS: [(&str, &str); 6] = [
    (
        "did not find expected '-'",
        "Start each list item with '-' at a consistent indentation.",
    ),
    (
        "expected ':'",
        "Separate every key from its value with ':'.",
    ),
    (
        "mapping values are not allowed",
        "Quote values that contain ':' such as shell commands.",
    ),
    (
        "found character that cannot start any token",
        "Remove the stray character or quote the value; indent with spaces.",
    ),
    (
        "unknown escape character",
        "Use a single-quoted string for commands containing backslashes.",
    ),
    (
        "found undefined alias",
        "Define the '&anchor' before referring to it with '*anchor'.",
    ),
];

pub(crate) const TAB_HINT: &str = "Indent with spaces; YAML does not accept tabs.";
