//! Import identifier: the dotted module path a dependency is loaded under

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dotted Python module path, e.g. `azure.mgmt.core`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportIdentifier(String);

impl ImportIdentifier {
    /// Wraps an already-resolved module path
    pub fn new(module: impl Into<String>) -> Self {
        Self(module.into())
    }

    /// Returns the module path
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the path is a syntactically valid dotted identifier
    pub fn is_valid(module: &str) -> bool {
        !module.is_empty()
            && module.split('.').all(|segment| {
                let mut chars = segment.chars();
                matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
                    && chars.all(|c| c.is_alphanumeric() || c == '_')
            })
    }
}

impl fmt::Display for ImportIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ImportIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
