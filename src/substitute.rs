//! Placeholder substitution with injection prevention
//!
//! Clean template text contains `^name` placeholders marking positions
//! where a caller-supplied value may appear. A value is only accepted if it
//! reduces to a single token once quote characters are removed; the token
//! is then wrapped in backticks so it can never escape its identifier
//! position. Multi-token values (e.g. `DROP TABLE t;`) fail the whole call.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;

/// Placeholder token: `^` followed by a run of word characters.
pub(crate) static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\^(\w+)").unwrap());

/// Errors raised while substituting literal values
#[derive(Debug, Error)]
pub enum SubstituteError {
    /// A referenced value still spans multiple tokens after quote-stripping
    #[error("only single-phrase parameters allowed (parameter '{name}')")]
    UnsafeValue { name: String },
}

/// Characters that could terminate a quoted literal early.
fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '`' | '\'' | '"'))
        .collect()
}

/// Replace every placeholder referenced by `text` with its validated,
/// backtick-quoted value from `values`.
///
/// Entries in `values` that the text never references are ignored. A
/// placeholder with no matching entry is left in the output as-is. All
/// referenced values are validated before any output is assembled, so an
/// unsafe value can never yield a partial substitution.
pub fn substitute(
    text: &str,
    values: &HashMap<String, String>,
) -> Result<String, SubstituteError> {
    // Validate each distinct referenced name up front.
    let mut quoted: HashMap<&str, String> = HashMap::new();
    for caps in PLACEHOLDER_RE.captures_iter(text) {
        let name = caps.get(1).unwrap().as_str();
        if quoted.contains_key(name) {
            continue;
        }
        let Some(raw) = values.get(name) else {
            continue;
        };
        let clean = sanitize(raw);
        if clean.split_whitespace().count() > 1 {
            return Err(SubstituteError::UnsafeValue {
                name: name.to_string(),
            });
        }
        quoted.insert(name, format!("`{clean}`"));
    }

    if quoted.is_empty() {
        return Ok(text.to_string());
    }

    let out = PLACEHOLDER_RE.replace_all(text, |caps: &Captures| {
        let name = caps.get(1).unwrap().as_str();
        match quoted.get(name) {
            Some(value) => value.clone(),
            // Referenced but not supplied: keep the placeholder.
            None => caps[0].to_string(),
        }
    });
    Ok(out.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_all_placeholders() {
        let query = "SELECT ^something1, ^something2 WHERE ^tablename";
        let params = values(&[
            ("tablename", "Helix"),
            ("something1", "Loves"),
            ("something2", "CMS"),
        ]);
        assert_eq!(
            substitute(query, &params).unwrap(),
            "SELECT `Loves`, `CMS` WHERE `Helix`"
        );
    }

    #[test]
    fn strips_quotes_and_ignores_extra_values() {
        let query = "SELECT ^something1, ^something2 WHERE ^tablename";
        let params = values(&[
            ("tablename", "`Helix"),
            ("something1", "'Loves"),
            ("something2", "\"CMS"),
            ("something3", "foobar"),
        ]);
        assert_eq!(
            substitute(query, &params).unwrap(),
            "SELECT `Loves`, `CMS` WHERE `Helix`"
        );
    }

    #[test]
    fn rejects_multi_token_value() {
        let query = "SELECT * FROM table WHERE ^maliciousCode";
        let params = values(&[("maliciousCode", "DROP TABLE table;")]);
        let err = substitute(query, &params).unwrap_err();
        assert!(matches!(err, SubstituteError::UnsafeValue { name } if name == "maliciousCode"));
    }

    #[test]
    fn rejects_value_that_splits_after_quote_stripping() {
        // The quotes do not hide the second token.
        let params = values(&[("x", "\"DROP\" TABLE")]);
        assert!(substitute("SELECT ^x", &params).is_err());
    }

    #[test]
    fn no_partial_output_on_unsafe_value() {
        // Even though ^a has a safe value, the unsafe ^b fails the call.
        let params = values(&[("a", "safe"), ("b", "not safe")]);
        assert!(substitute("SELECT ^a, ^b", &params).is_err());
    }

    #[test]
    fn missing_value_leaves_placeholder() {
        let params = values(&[("known", "t")]);
        assert_eq!(
            substitute("SELECT * FROM ^known WHERE ^unknown", &params).unwrap(),
            "SELECT * FROM `t` WHERE ^unknown"
        );
    }

    #[test]
    fn replaces_every_occurrence_identically() {
        let params = values(&[("t", "requests")]);
        assert_eq!(
            substitute("^t JOIN ^t", &params).unwrap(),
            "`requests` JOIN `requests`"
        );
    }

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let params = values(&[("t", "requests")]);
        assert_eq!(substitute("SELECT 1", &params).unwrap(), "SELECT 1");
    }

    #[test]
    fn quote_only_value_becomes_empty_identifier() {
        // One token or fewer is accepted; only multi-token values fail.
        let params = values(&[("x", "\"'`")]);
        assert_eq!(substitute("^x", &params).unwrap(), "``");
    }

    #[test]
    fn longer_placeholder_names_are_not_clipped_by_shorter_values() {
        let params = values(&[("tab", "short")]);
        // ^tablename shares a prefix with ^tab but is a different name.
        assert_eq!(
            substitute("^tab ^tablename", &params).unwrap(),
            "`short` ^tablename"
        );
    }
}
