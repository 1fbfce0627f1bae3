//! Manifest parsing: raw manifest text to canonical dependency specifiers
//!
//! This module provides parsers for:
//! - pip requirements files (`requirements*.txt` and anything unrecognized)
//! - pyproject.toml (PEP 621 and Poetry tables)
//!
//! Lines that cannot yield a specifier are classified as a [`ParseSkip`] and
//! dropped; a skip is never fatal to the parse.

mod pyproject;
mod requirements;

pub use pyproject::PyprojectParser;
pub use requirements::RequirementsParser;

use crate::domain::DependencySpecifier;
use crate::error::ManifestError;
use log::debug;
use std::fmt;
use std::path::Path;

/// Why a manifest entry produced no specifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseSkip {
    /// Empty after trimming
    Blank,
    /// Comment line
    Comment,
    /// VCS, URL or local archive reference; cannot be name-resolved
    Reference,
    /// Editable install or pip option flag
    OptionFlag,
    /// No package name at the start of the line
    Malformed,
}

impl fmt::Display for ParseSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ParseSkip::Blank => "blank",
            ParseSkip::Comment => "comment",
            ParseSkip::Reference => "direct reference",
            ParseSkip::OptionFlag => "option flag",
            ParseSkip::Malformed => "malformed",
        };
        f.write_str(label)
    }
}

/// One manifest entry: its line (or entry) number and what it parsed to
pub type ParsedEntry = (usize, Result<DependencySpecifier, ParseSkip>);

/// Supported manifest formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    /// pip requirements file
    Requirements,
    /// pyproject.toml
    Pyproject,
}

impl ManifestFormat {
    /// Pick the format from the file name; anything but pyproject.toml is
    /// treated as a requirements file
    pub fn detect(path: &Path) -> Self {
        match path.file_name().and_then(|n| n.to_str()) {
            Some("pyproject.toml") => ManifestFormat::Pyproject,
            _ => ManifestFormat::Requirements,
        }
    }
}

/// Trait for parsing manifest files
pub trait ManifestParser {
    /// Parse every entry, keeping skipped entries with their reason
    fn parse(&self, content: &str) -> Result<Vec<ParsedEntry>, ManifestError>;

    /// Returns the format this parser handles
    fn format(&self) -> ManifestFormat;
}

/// Get a manifest parser for the specified format
pub fn get_parser(format: ManifestFormat) -> Box<dyn ManifestParser> {
    match format {
        ManifestFormat::Requirements => Box::new(RequirementsParser),
        ManifestFormat::Pyproject => Box::new(PyprojectParser),
    }
}

/// Parse manifest text into specifiers, in manifest order, duplicates kept
pub fn parse_specifiers(
    content: &str,
    format: ManifestFormat,
) -> Result<Vec<DependencySpecifier>, ManifestError> {
    let entries = get_parser(format).parse(content)?;
    let mut specifiers = Vec::with_capacity(entries.len());

    for (line_no, entry) in entries {
        match entry {
            Ok(spec) => specifiers.push(spec),
            Err(ParseSkip::Blank) => {}
            Err(reason) => debug!("manifest entry {} skipped: {}", line_no, reason),
        }
    }

    Ok(specifiers)
}

/// Read and parse a manifest file
///
/// A missing file, an unreadable file and a manifest with zero specifiers are
/// all fatal input errors.
pub fn read_manifest(path: &Path) -> Result<Vec<DependencySpecifier>, ManifestError> {
    if !path.is_file() {
        return Err(ManifestError::not_found(path));
    }

    let content =
        std::fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))?;

    let format = ManifestFormat::detect(path);
    let specifiers = parse_specifiers(&content, format).map_err(|e| match e {
        ManifestError::TomlParseError { message, .. } => ManifestError::TomlParseError {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })?;

    if specifiers.is_empty() {
        return Err(ManifestError::empty(path));
    }

    debug!(
        "parsed {} specifiers from {} ({:?})",
        specifiers.len(),
        path.display(),
        format
    );
    Ok(specifiers)
}
