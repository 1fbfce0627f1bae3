//! requirements.txt parser
//!
//! Line rules, first match wins:
//! - blank after trimming
//! - `#` comment
//! - VCS or direct URL reference (`git+https://...`, `https://...`, `file:...`)
//! - option flag (`-e .`, `--editable`, `-r other.txt`, `--index-url ...`)
//! - otherwise the leading package-name run, ending at a comparator, extras
//!   bracket, marker, or whitespace

use crate::domain::DependencySpecifier;
use crate::error::ManifestError;
use crate::parser::{ManifestFormat, ManifestParser, ParseSkip, ParsedEntry};
use regex::Regex;
use std::sync::LazyLock;

/// Parser for pip requirements files
pub struct RequirementsParser;

// Name run followed by a delimiter or end of line
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9][A-Za-z0-9._-]*)(?:[\s\[(<>=!~;@#]|$)").unwrap()
});

static REFERENCE_PREFIXES: &[&str] = &[
    "git+", "hg+", "svn+", "bzr+", "git://", "http://", "https://", "file:",
];

static ARCHIVE_SUFFIXES: &[&str] = &[".whl", ".zip", ".tar.gz", ".tgz", ".tar.bz2"];

impl RequirementsParser {
    /// Classify a single requirement string
    pub fn parse_line(line: &str, line_no: usize) -> Result<DependencySpecifier, ParseSkip> {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return Err(ParseSkip::Blank);
        }

        if trimmed.starts_with('#') {
            return Err(ParseSkip::Comment);
        }

        let lowered = trimmed.to_ascii_lowercase();
        if REFERENCE_PREFIXES.iter().any(|p| lowered.starts_with(p)) {
            return Err(ParseSkip::Reference);
        }

        if trimmed.starts_with('-') {
            return Err(ParseSkip::OptionFlag);
        }

        let name = NAME_RE
            .captures(trimmed)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or(ParseSkip::Malformed)?;

        // Local archive paths look like names but cannot be resolved to a module
        let lowered_name = name.to_ascii_lowercase();
        if ARCHIVE_SUFFIXES.iter().any(|s| lowered_name.ends_with(s)) {
            return Err(ParseSkip::Reference);
        }

        Ok(DependencySpecifier::new(trimmed, line_no, name))
    }
}

impl ManifestParser for RequirementsParser {
    fn parse(&self, content: &str) -> Result<Vec<ParsedEntry>, ManifestError> {
        Ok(content
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, Self::parse_line(line, idx + 1)))
            .collect())
    }

    fn format(&self) -> ManifestFormat {
        ManifestFormat::Requirements
    }
}
