//! Parameter sets loaded from TOML files
//!
//! Hosts can keep substitution values in a small TOML file instead of
//! passing every one on the command line:
//!
//! ```toml
//! [params]
//! tablename = "requests"
//! status = "404"
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or parsing parameter files
#[derive(Error, Debug)]
pub enum ParamsError {
    #[error("Failed to read params file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse params TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// A named set of substitution values
#[derive(Debug, Clone, Default)]
pub struct ParamSet {
    pub values: HashMap<String, String>,
}

/// TOML structure for deserializing parameter files
#[derive(Deserialize)]
struct TomlParams {
    params: HashMap<String, String>,
}

impl ParamSet {
    /// Load a parameter set from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ParamsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a parameter set from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ParamsError> {
        let parsed: TomlParams = toml::from_str(content)?;
        Ok(ParamSet {
            values: parsed.params,
        })
    }

    /// Overlay another set on top of this one; the other set wins on
    /// conflicting keys.
    pub fn merge(&mut self, other: ParamSet) {
        self.values.extend(other.values);
    }
}
