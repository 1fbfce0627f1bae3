//! Details of the interpreter the probes run in

use regex::Regex;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static LABEL_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").unwrap());

/// Interpreter identity reported by the interpreter itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpreterInfo {
    /// Command used to start the interpreter
    pub command: String,
    /// Absolute path reported by `sys.executable`
    pub executable: String,
    /// Language version (`sys.version_info`)
    pub version: Version,
    /// Implementation name, e.g. `CPython`
    pub implementation: String,
    /// Platform string, e.g. `linux`
    pub platform: String,
}

impl InterpreterInfo {
    /// Compares a free-text runtime label with the interpreter version
    ///
    /// Returns `None` when the label carries no `major.minor` version. A
    /// patch component is only compared when the label has one.
    pub fn matches_label(&self, label: &str) -> Option<bool> {
        let caps = LABEL_VERSION_RE.captures(label)?;
        let major: u64 = caps.get(1)?.as_str().parse().ok()?;
        let minor: u64 = caps.get(2)?.as_str().parse().ok()?;
        let patch: Option<u64> = caps.get(3).and_then(|m| m.as_str().parse().ok());

        let same_minor = self.version.major == major && self.version.minor == minor;
        Some(match patch {
            Some(patch) => same_minor && self.version.patch == patch,
            None => same_minor,
        })
    }
}

impl fmt::Display for InterpreterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}, {})",
            self.implementation, self.version, self.platform, self.executable
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpython(version: &str) -> InterpreterInfo {
        InterpreterInfo {
            command: "python3".to_string(),
            executable: "/usr/bin/python3".to_string(),
            version: Version::parse(version).unwrap(),
            implementation: "CPython".to_string(),
            platform: "linux".to_string(),
        }
    }

    #[test]
    fn test_matches_label_major_minor() {
        let info = cpython("3.13.1");
        assert_eq!(info.matches_label("3.13"), Some(true));
        assert_eq!(info.matches_label("python-3.13"), Some(true));
        assert_eq!(info.matches_label("3.12"), Some(false));
    }

    #[test]
    fn test_matches_label_with_patch() {
        let info = cpython("3.13.1");
        assert_eq!(info.matches_label("3.13.1"), Some(true));
        assert_eq!(info.matches_label("3.13.0"), Some(false));
    }

    #[test]
    fn test_matches_label_without_version() {
        let info = cpython("3.13.1");
        assert_eq!(info.matches_label("latest"), None);
        assert_eq!(info.matches_label("py3"), None);
    }

    #[test]
    fn test_display() {
        let info = cpython("3.12.4");
        assert_eq!(info.to_string(), "CPython 3.12.4 (linux, /usr/bin/python3)");
    }
}
