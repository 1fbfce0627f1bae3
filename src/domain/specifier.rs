//! Dependency specifier parsed from a single manifest line

use serde::{Deserialize, Serialize};
use std::fmt;

/// A manifest entry that survived parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySpecifier {
    /// Original (trimmed) manifest text
    pub raw: String,
    /// 1-based line number within the manifest
    pub line: usize,
    /// Canonical package name (lower-cased, `_` normalized to `-`)
    pub name: String,
}

impl DependencySpecifier {
    /// Creates a specifier, canonicalizing the given package name
    pub fn new(raw: impl Into<String>, line: usize, name: &str) -> Self {
        Self {
            raw: raw.into(),
            line,
            name: canonicalize(name),
        }
    }
}

impl fmt::Display for DependencySpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Normalize a distribution name into its canonical lookup key
///
/// Lower-cases the name and folds `_` into `-`, so `Typing_Extensions` and
/// `typing-extensions` share one key. Dots are kept.
pub fn canonicalize(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace('_', "-")
}

/// Returns true if every character is allowed in a canonical name
pub fn is_canonical_charset(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_lowercases() {
        assert_eq!(canonicalize("PyYAML"), "pyyaml");
    }

    #[test]
    fn test_canonicalize_folds_underscores() {
        assert_eq!(canonicalize("typing_extensions"), "typing-extensions");
        assert_eq!(canonicalize("Azure_Mgmt_Core"), "azure-mgmt-core");
    }

    #[test]
    fn test_canonicalize_keeps_dots() {
        assert_eq!(canonicalize("zope.interface"), "zope.interface");
    }

    #[test]
    fn test_new_canonicalizes_name() {
        let spec = DependencySpecifier::new("Jinja2==3.1.2", 4, "Jinja2");
        assert_eq!(spec.name, "jinja2");
        assert_eq!(spec.raw, "Jinja2==3.1.2");
        assert_eq!(spec.line, 4);
        assert_eq!(spec.to_string(), "jinja2");
    }

    #[test]
    fn test_is_canonical_charset() {
        assert!(is_canonical_charset("azure-mgmt-core"));
        assert!(is_canonical_charset("zope.interface"));
        assert!(!is_canonical_charset(""));
        assert!(!is_canonical_charset("foo>=1"));
        assert!(!is_canonical_charset("foo bar"));
    }
}
