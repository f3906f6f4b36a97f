//! Template loading from a directory of `.sql` files
//!
//! The store returns raw template text verbatim; it never inspects the
//! content. Annotations are handled downstream by the header parser.

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading a template
#[derive(Debug, Error)]
pub enum LoadError {
    /// No readable `<name>.sql` under the store's base directory
    #[error("template not found: {name}")]
    NotFound { name: String },
}

/// A directory of named query templates
#[derive(Debug, Clone)]
pub struct TemplateStore {
    base_path: PathBuf,
}

impl TemplateStore {
    /// Create a store rooted at the given directory
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Load the raw text of the template `<base>/<name>.sql`
    pub fn load(&self, name: &str) -> Result<String, LoadError> {
        let path = self.base_path.join(format!("{name}.sql"));
        debug!(path = %path.display(), "loading template");
        std::fs::read_to_string(&path).map_err(|_| LoadError::NotFound {
            name: name.to_string(),
        })
    }
}
