//! Asynchronous table-name resolution
//!
//! Some placeholders cannot be supplied as literal values because their
//! value has to be computed, possibly remotely (the canonical case is a
//! backend table name looked up per service). Callers register a
//! [`TableResolver`] per placeholder name; each resolver referenced by the
//! text is invoked exactly once, all lookups run concurrently, and the
//! substituted text is only assembled after every lookup has settled.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::future::try_join_all;
use regex::Captures;
use thiserror::Error;
use tracing::debug;

use crate::substitute::PLACEHOLDER_RE;

/// Caller-defined resolver failures are surfaced as-is.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Produces the value for one named placeholder.
///
/// Implementations must be `Send + Sync`; the resolver takes no input and
/// may suspend (e.g. for a network lookup).
#[async_trait]
pub trait TableResolver: Send + Sync {
    async fn resolve(&self) -> Result<String, BoxError>;
}

/// Adapter for plain closures that resolve synchronously.
pub struct FnResolver<F>(pub F);

#[async_trait]
impl<F> TableResolver for FnResolver<F>
where
    F: Fn() -> Result<String, BoxError> + Send + Sync,
{
    async fn resolve(&self) -> Result<String, BoxError> {
        (self.0)()
    }
}

/// Errors raised while resolving table-name placeholders
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A resolver failed; the whole call fails with no partial output
    #[error("resolver for '{name}' failed: {source}")]
    Resolver {
        name: String,
        #[source]
        source: BoxError,
    },
}

/// Replace every placeholder that has a matching resolver with the
/// resolver's value.
///
/// Each referenced resolver is invoked exactly once per call, no matter how
/// many times its placeholder occurs; results are memoized only for the
/// duration of this call. Resolvers whose name never appears in `text` are
/// not invoked. Lookups for independent placeholders run concurrently, and
/// no partially substituted text is ever observable: the output is built
/// after every lookup has settled, or the first failure is returned.
pub async fn resolve_table_names(
    text: &str,
    resolvers: &HashMap<String, Box<dyn TableResolver>>,
) -> Result<String, ResolveError> {
    // Distinct placeholder names that have a registered resolver, in order
    // of first appearance.
    let mut referenced: Vec<&str> = Vec::new();
    for caps in PLACEHOLDER_RE.captures_iter(text) {
        let name = caps.get(1).unwrap().as_str();
        if resolvers.contains_key(name) && !referenced.contains(&name) {
            referenced.push(name);
        }
    }

    if referenced.is_empty() {
        return Ok(text.to_string());
    }

    debug!(placeholders = referenced.len(), "resolving table names");

    let lookups = referenced.iter().map(|&name| {
        let resolver = &resolvers[name];
        async move {
            resolver
                .resolve()
                .await
                .map(|value| (name, value))
                .map_err(|source| ResolveError::Resolver {
                    name: name.to_string(),
                    source,
                })
        }
    });
    let resolved: HashMap<&str, String> = try_join_all(lookups).await?.into_iter().collect();

    let out = PLACEHOLDER_RE.replace_all(text, |caps: &Captures| {
        let name = caps.get(1).unwrap().as_str();
        match resolved.get(name) {
            Some(value) => value.clone(),
            // No resolver registered for this placeholder: leave it for the
            // literal-substitution pass.
            None => caps[0].to_string(),
        }
    });
    Ok(out.into_owned())
}
