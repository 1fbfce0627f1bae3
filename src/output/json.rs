//! JSON output formatter for machine processing
//!
//! The report is serialized as-is: context, counts, verdict and every
//! outcome with its `pass` and `kind`. In quiet mode only the summary is
//! written, with the outcomes that were not a success.

use crate::domain::{ProbeOutcome, Report};
use crate::output::{OutputFormatter, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
#[derive(Debug, Default)]
pub struct JsonFormatter {
    /// Quiet writes the summary instead of the full report
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// Counts and verdict without the full outcome list
#[derive(Serialize)]
struct JsonSummary<'a> {
    total: usize,
    succeeded: usize,
    failed: usize,
    import_failures: usize,
    unexpected_failures: usize,
    warnings: usize,
    skipped: usize,
    passed: bool,
    /// Failures, warnings and skips in probe order
    non_success: Vec<&'a ProbeOutcome>,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &Report, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            return self.format_summary(report, writer);
        }
        serde_json::to_writer_pretty(&mut *writer, report)?;
        writeln!(writer)
    }

    fn format_summary(&self, report: &Report, writer: &mut dyn Write) -> std::io::Result<()> {
        let summary = JsonSummary {
            total: report.total,
            succeeded: report.succeeded,
            failed: report.failed(),
            import_failures: report.import_failures,
            unexpected_failures: report.unexpected_failures,
            warnings: report.warnings,
            skipped: report.skipped,
            passed: report.passed,
            non_success: report.non_success().collect(),
        };
        serde_json::to_writer_pretty(&mut *writer, &summary)?;
        writeln!(writer)
    }
}
