//! Query Templates - a SQL query templating layer
//!
//! This library stores parameterized query templates annotated with header
//! directives and materializes them into executable query text without
//! letting a caller-supplied value escape its single-token position.
//!
//! A template looks like:
//!
//! ```text
//! --- status: 404
//! # most requested missing pages
//! SELECT req_url FROM ^tablename WHERE status_code = ^status
//! ```
//!
//! Directive lines declare default parameter values, comment lines are
//! documentation, and `^name` placeholders mark substitution points. The
//! pipeline strips the annotations, then replaces each placeholder with a
//! validated backtick-quoted literal, or with a value produced by an
//! asynchronous resolver (for placeholders like a backend table name that
//! must be looked up rather than supplied).
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use query_templates::materialize;
//!
//! let template = "--- status: 404\n# broken pages\nSELECT req_url FROM ^tablename WHERE ^status";
//! let mut values = HashMap::new();
//! values.insert("tablename".to_string(), "requests".to_string());
//!
//! let query = materialize(template, &values).unwrap();
//! assert_eq!(query, "SELECT req_url FROM `requests` WHERE `404`");
//! ```

pub mod header;
pub mod loader;
pub mod params;
pub mod resolve;
pub mod substitute;

pub use header::{extract_params, strip_annotations};
pub use loader::{LoadError, TemplateStore};
pub use params::{ParamSet, ParamsError};
pub use resolve::{resolve_table_names, BoxError, FnResolver, ResolveError, TableResolver};
pub use substitute::{substitute, SubstituteError};

use std::collections::HashMap;

use thiserror::Error;

/// Errors that can occur during the materialization pipeline
#[derive(Debug, Error)]
pub enum QueryError {
    /// Error loading a named template
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    /// Error substituting literal values
    #[error("substitution error: {0}")]
    Substitute(#[from] SubstituteError),

    /// Error resolving table-name placeholders
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),
}

/// Materialize a template into executable query text.
///
/// Declared directive parameters act as defaults; entries in `values`
/// override them. The annotations are stripped and every referenced
/// placeholder is replaced with its validated, backtick-quoted value.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use query_templates::materialize;
///
/// let query = materialize("SELECT ^a", &HashMap::from([
///     ("a".to_string(), "visits".to_string()),
/// ])).unwrap();
/// assert_eq!(query, "SELECT `visits`");
/// ```
pub fn materialize(
    source: &str,
    values: &HashMap<String, String>,
) -> Result<String, QueryError> {
    let mut params = header::extract_params(source);
    params.extend(values.clone());

    let body = header::strip_annotations(source);
    Ok(substitute::substitute(&body, &params)?)
}

/// Materialize a template, resolving computed placeholders first.
///
/// Table-name resolution and literal substitution operate on disjoint
/// placeholder namespaces; resolution runs first here, but the two passes
/// are order-independent.
pub async fn materialize_with_tables(
    source: &str,
    values: &HashMap<String, String>,
    resolvers: &HashMap<String, Box<dyn TableResolver>>,
) -> Result<String, QueryError> {
    let mut params = header::extract_params(source);
    params.extend(values.clone());

    let body = header::strip_annotations(source);
    let body = resolve::resolve_table_names(&body, resolvers).await?;
    Ok(substitute::substitute(&body, &params)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn materialize_overlays_runtime_values_on_directives() {
        let template = "--- status: 404\nSELECT req_url FROM t WHERE ^status";
        let overridden = HashMap::from([("status".to_string(), "500".to_string())]);

        let with_default = materialize(template, &HashMap::new()).unwrap();
        let with_override = materialize(template, &overridden).unwrap();

        assert_eq!(with_default, "SELECT req_url FROM t WHERE `404`");
        assert_eq!(with_override, "SELECT req_url FROM t WHERE `500`");
    }

    #[test]
    fn materialize_rejects_unsafe_value() {
        let values = HashMap::from([("t".to_string(), "DROP TABLE x;".to_string())]);
        let err = materialize("SELECT * FROM ^t", &values).unwrap_err();
        assert!(matches!(err, QueryError::Substitute(_)));
    }

    #[tokio::test]
    async fn materialize_with_tables_runs_both_passes() {
        let template = "--- status: 404\nSELECT req_url FROM ^tablename WHERE ^status";
        let mut resolvers: HashMap<String, Box<dyn TableResolver>> = HashMap::new();
        resolvers.insert(
            "tablename".to_string(),
            Box::new(FnResolver(|| {
                Ok::<String, BoxError>("requests_0b7".to_string())
            })),
        );

        let query = materialize_with_tables(template, &HashMap::new(), &resolvers)
            .await
            .unwrap();
        assert_eq!(query, "SELECT req_url FROM requests_0b7 WHERE `404`");
    }
}
