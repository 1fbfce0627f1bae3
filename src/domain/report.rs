//! Report aggregation
//!
//! Collects the outcomes of the import pass and the functional pass into a
//! single immutable report and derives the verdict.

use super::{
    InterpreterInfo, OutcomeKind, ProbeOutcome, ProbePass, ProfileSource, VerificationProfile,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Run metadata shown in the report header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportContext {
    /// Manifest that was checked
    pub manifest: PathBuf,
    /// Runtime-version label (display only)
    pub runtime: String,
    /// Platform label (display only)
    pub platform: String,
    /// Active verification profile
    pub profile: VerificationProfile,
    /// How the profile was chosen
    pub profile_source: ProfileSource,
    /// Whether each probe ran in a fresh interpreter
    pub isolated: bool,
    /// Interpreter details, when detection succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<InterpreterInfo>,
    /// When the run started
    pub started_at: DateTime<Utc>,
}

impl ReportContext {
    /// Returns true if the runtime label names a version the interpreter is not
    pub fn runtime_mismatch(&self) -> bool {
        self.interpreter
            .as_ref()
            .and_then(|info| info.matches_label(&self.runtime))
            == Some(false)
    }
}

/// Aggregate of every probe outcome for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Run metadata
    pub context: ReportContext,
    /// Number of subjects considered across both passes
    pub total: usize,
    /// Number of `success` outcomes
    pub succeeded: usize,
    /// Number of `import-failure` outcomes
    pub import_failures: usize,
    /// Number of `unexpected-failure` outcomes
    pub unexpected_failures: usize,
    /// Number of `warning` outcomes
    pub warnings: usize,
    /// Number of `skipped` outcomes
    pub skipped: usize,
    /// Failures in probe order
    pub failures: Vec<ProbeOutcome>,
    /// Every outcome in probe order
    pub outcomes: Vec<ProbeOutcome>,
    /// True iff there are no failures
    pub passed: bool,
}

impl Report {
    /// Builds the report from the ordered outcomes of both passes
    pub fn new(context: ReportContext, outcomes: Vec<ProbeOutcome>) -> Self {
        let count = |kind: OutcomeKind| outcomes.iter().filter(|o| o.kind == kind).count();

        let succeeded = count(OutcomeKind::Success);
        let import_failures = count(OutcomeKind::ImportFailure);
        let unexpected_failures = count(OutcomeKind::UnexpectedFailure);
        let warnings = count(OutcomeKind::Warning);
        let skipped = count(OutcomeKind::Skipped);

        let failures: Vec<ProbeOutcome> =
            outcomes.iter().filter(|o| o.is_failure()).cloned().collect();

        Self {
            context,
            total: outcomes.len(),
            succeeded,
            import_failures,
            unexpected_failures,
            warnings,
            skipped,
            passed: failures.is_empty(),
            failures,
            outcomes,
        }
    }

    /// Returns the number of outcomes that count against the verdict
    pub fn failed(&self) -> usize {
        self.import_failures + self.unexpected_failures
    }

    /// Returns the outcomes produced by one pass
    pub fn by_pass(&self, pass: ProbePass) -> impl Iterator<Item = &ProbeOutcome> {
        self.outcomes.iter().filter(move |o| o.pass == pass)
    }

    /// Returns every outcome that is not a success, in probe order
    pub fn non_success(&self) -> impl Iterator<Item = &ProbeOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.kind != OutcomeKind::Success)
    }
}
