//! Probe outcome types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a single probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutcomeKind {
    /// Loaded, or the functional check produced the expected output
    Success,
    /// The module could not be located or loaded
    ImportFailure,
    /// Any other error: exception in target code, wrong output, crash, timeout
    UnexpectedFailure,
    /// An advisory check failed; reported but never fails the run
    Warning,
    /// Not attempted (skip-listed tooling)
    Skipped,
}

impl OutcomeKind {
    /// Returns true if this kind counts against the verdict
    pub fn is_failure(&self) -> bool {
        matches!(self, OutcomeKind::ImportFailure | OutcomeKind::UnexpectedFailure)
    }

    /// Returns the kebab-case label
    pub fn label(&self) -> &'static str {
        match self {
            OutcomeKind::Success => "success",
            OutcomeKind::ImportFailure => "import-failure",
            OutcomeKind::UnexpectedFailure => "unexpected-failure",
            OutcomeKind::Warning => "warning",
            OutcomeKind::Skipped => "skipped",
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which pass produced an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbePass {
    /// Plain import of a resolved module
    Import,
    /// Functional smoke test of a well-known package
    Functional,
}

/// Result of one import or functional probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// What was probed (e.g. `pyyaml -> yaml`, `jinja2 (render template)`)
    pub subject: String,
    /// Pass that produced this outcome
    pub pass: ProbePass,
    /// Outcome classification
    pub kind: OutcomeKind,
    /// Diagnostic message, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl ProbeOutcome {
    /// Creates an outcome
    pub fn new(
        subject: impl Into<String>,
        pass: ProbePass,
        kind: OutcomeKind,
        diagnostic: Option<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            pass,
            kind,
            diagnostic,
        }
    }

    /// Creates a success outcome without diagnostic
    pub fn success(subject: impl Into<String>, pass: ProbePass) -> Self {
        Self::new(subject, pass, OutcomeKind::Success, None)
    }

    /// Creates a skipped outcome
    pub fn skipped(subject: impl Into<String>, pass: ProbePass) -> Self {
        Self::new(subject, pass, OutcomeKind::Skipped, None)
    }

    /// Creates a failure outcome of the given kind
    pub fn failure(
        subject: impl Into<String>,
        pass: ProbePass,
        kind: OutcomeKind,
        diagnostic: impl Into<String>,
    ) -> Self {
        Self::new(subject, pass, kind, Some(diagnostic.into()))
    }

    /// Attaches a diagnostic (builder pattern)
    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostic = Some(diagnostic.into());
        self
    }

    /// Returns true if this outcome counts against the verdict
    pub fn is_failure(&self) -> bool {
        self.kind.is_failure()
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.diagnostic {
            Some(diagnostic) => write!(f, "{}: {}: {}", self.subject, self.kind, diagnostic),
            None => write!(f, "{}: {}", self.subject, self.kind),
        }
    }
}
