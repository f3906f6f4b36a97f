//! Header parsing for annotated query templates
//!
//! Templates may start with directive lines (`--- key: value`) declaring
//! named parameters, and may contain comment lines (`# ...`). Both are
//! annotations for the templating layer and must never reach the query
//! engine. This module extracts the declared parameters and produces the
//! clean executable text.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Directive line: `--- key: value`, anchored at line start. The value is
/// everything after the first `: ` up to end of line.
static DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^--- (\S+): (.*)$").unwrap());

/// Extract declared parameters from a template's directive lines.
///
/// Lines that do not match the directive pattern (comments, query body) are
/// ignored. Never fails; a template without directives yields an empty map.
/// On duplicate keys the last occurrence wins.
pub fn extract_params(text: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for line in text.lines() {
        if let Some(caps) = DIRECTIVE_RE.captures(line) {
            params.insert(caps[1].to_string(), caps[2].to_string());
        }
    }
    params
}

/// Remove every directive and comment line from a template, joining the
/// surviving lines with a single space.
///
/// A stripped line is removed whole, including its trailing content.
/// Surviving lines keep their own whitespace untouched, so multi-space
/// indentation shows up as consecutive spaces in the output. The result is
/// ready for placeholder substitution, and running this a second time on
/// its own output is a no-op.
pub fn strip_annotations(text: &str) -> String {
    text.lines()
        .filter(|line| !line.starts_with("---") && !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join(" ")
}
