//! pyproject.toml parser
//!
//! Handles:
//! - project.dependencies (PEP 621)
//! - project.optional-dependencies (PEP 621)
//! - tool.poetry.dependencies (Poetry)
//! - tool.poetry.dev-dependencies (Poetry)
//! - tool.poetry.group.<name>.dependencies (Poetry 1.2+)
//!
//! PEP 508 strings go through the same line rules as requirements files.
//! Entry numbers count dependency entries in document order, starting at 1.

use crate::error::ManifestError;
use crate::parser::{ManifestFormat, ManifestParser, ParsedEntry, RequirementsParser};
use std::path::PathBuf;
use toml::{Table, Value};

/// Parser for pyproject.toml files
pub struct PyprojectParser;

impl PyprojectParser {
    fn push_pep508(entries: &mut Vec<ParsedEntry>, deps: &Value) {
        let Some(deps) = deps.as_array() else {
            return;
        };
        for dep in deps {
            if let Some(dep_str) = dep.as_str() {
                let entry_no = entries.len() + 1;
                entries.push((entry_no, RequirementsParser::parse_line(dep_str, entry_no)));
            }
        }
    }

    fn push_poetry(entries: &mut Vec<ParsedEntry>, deps: &Value) {
        let Some(table) = deps.as_table() else {
            return;
        };
        for name in table.keys() {
            // The interpreter constraint is not a package
            if name == "python" {
                continue;
            }
            let entry_no = entries.len() + 1;
            entries.push((entry_no, RequirementsParser::parse_line(name, entry_no)));
        }
    }
}

impl ManifestParser for PyprojectParser {
    fn parse(&self, content: &str) -> Result<Vec<ParsedEntry>, ManifestError> {
        let toml: Value = toml::from_str::<Table>(content)
            .map(Value::Table)
            .map_err(|e| ManifestError::TomlParseError {
                path: PathBuf::from("pyproject.toml"),
                message: e.to_string(),
            })?;

        let mut entries = Vec::new();
        let project = toml.get("project");

        if let Some(deps) = project.and_then(|p| p.get("dependencies")) {
            Self::push_pep508(&mut entries, deps);
        }

        if let Some(optional) = project
            .and_then(|p| p.get("optional-dependencies"))
            .and_then(|d| d.as_table())
        {
            for deps in optional.values() {
                Self::push_pep508(&mut entries, deps);
            }
        }

        let poetry = toml.get("tool").and_then(|t| t.get("poetry"));

        if let Some(deps) = poetry.and_then(|p| p.get("dependencies")) {
            Self::push_poetry(&mut entries, deps);
        }

        if let Some(deps) = poetry.and_then(|p| p.get("dev-dependencies")) {
            Self::push_poetry(&mut entries, deps);
        }

        if let Some(groups) = poetry
            .and_then(|p| p.get("group"))
            .and_then(|g| g.as_table())
        {
            for group in groups.values() {
                if let Some(deps) = group.get("dependencies") {
                    Self::push_poetry(&mut entries, deps);
                }
            }
        }

        Ok(entries)
    }

    fn format(&self) -> ManifestFormat {
        ManifestFormat::Pyproject
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParseSkip;

    fn names(content: &str) -> Vec<String> {
        PyprojectParser
            .parse(content)
            .unwrap()
            .into_iter()
            .filter_map(|(_, r)| r.ok())
            .map(|s| s.name)
            .collect()
    }

    #[test]
    fn test_pep621_dependencies() {
        let content = r#"
[project]
name = "sample"
dependencies = [
    "PyYAML>=6.0",
    "Jinja2==3.1.2",
]
"#;
        assert_eq!(names(content), vec!["pyyaml", "jinja2"]);
    }

    #[test]
    fn test_optional_dependencies() {
        let content = r#"
[project]
name = "sample"
dependencies = ["click"]

[project.optional-dependencies]
dev = ["pytest>=7"]
"#;
        assert_eq!(names(content), vec!["click", "pytest"]);
    }

    #[test]
    fn test_poetry_dependencies_skip_python() {
        let content = r#"
[tool.poetry.dependencies]
python = "^3.11"
requests = "^2.31"

[tool.poetry.group.test.dependencies]
pytest_cov = "*"
"#;
        assert_eq!(names(content), vec!["requests", "pytest-cov"]);
    }

    #[test]
    fn test_document_order_is_kept() {
        let content = r#"
[project]
name = "sample"

[project.optional-dependencies]
zeta = ["zlib-ng"]
alpha = ["attrs"]

[tool.poetry.dependencies]
zope-interface = "*"
python = "^3.11"
requests = "^2.31"
aiohttp = "*"

[tool.poetry.group.zz.dependencies]
tox = "*"

[tool.poetry.group.aa.dependencies]
black = "*"
"#;
        assert_eq!(
            names(content),
            vec!["zlib-ng", "attrs", "zope-interface", "requests", "aiohttp", "tox", "black"]
        );
        let entries = PyprojectParser.parse(content).unwrap();
        let numbers: Vec<_> = entries.iter().map(|(n, _)| *n).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_url_entries_are_skipped() {
        let content = r#"
[project]
name = "sample"
dependencies = ["git+https://example.com/repo.git", "lxml"]
"#;
        let entries = PyprojectParser.parse(content).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].1, Err(ParseSkip::Reference));
        assert_eq!(entries[1].0, 2);
    }

    #[test]
    fn test_no_dependencies() {
        assert!(names("[project]\nname = \"x\"\n").is_empty());
    }

    #[test]
    fn test_invalid_toml() {
        let err = PyprojectParser.parse("[project").unwrap_err();
        assert!(err.to_string().contains("failed to parse TOML"));
    }
}
