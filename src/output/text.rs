//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Report header with manifest, runtime, platform and profile
//! - One tagged line per probe, grouped by pass
//! - Summary counts, failure list and verdict

use crate::domain::{OutcomeKind, ProbeOutcome, ProbePass, Report};
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Status tag for an outcome kind
pub fn tag(kind: OutcomeKind) -> &'static str {
    match kind {
        OutcomeKind::Success => "[PASS]",
        OutcomeKind::ImportFailure | OutcomeKind::UnexpectedFailure => "[FAIL]",
        OutcomeKind::Warning => "[WARN]",
        OutcomeKind::Skipped => "[SKIP]",
    }
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn colored_tag(&self, kind: OutcomeKind) -> String {
        let tag = tag(kind);
        if !self.color {
            return tag.to_string();
        }
        match kind {
            OutcomeKind::Success => tag.green().to_string(),
            OutcomeKind::ImportFailure | OutcomeKind::UnexpectedFailure => {
                tag.red().bold().to_string()
            }
            OutcomeKind::Warning => tag.yellow().to_string(),
            OutcomeKind::Skipped => tag.dimmed().to_string(),
        }
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, report: &Report, writer: &mut dyn Write) -> std::io::Result<()> {
        let ctx = &report.context;
        writeln!(writer, "{}", self.heading("Dependency probe"))?;
        writeln!(writer, "  Manifest: {}", ctx.manifest.display())?;
        match &ctx.interpreter {
            Some(info) => writeln!(writer, "  Runtime:  {} ({})", ctx.runtime, info)?,
            None => writeln!(writer, "  Runtime:  {}", ctx.runtime)?,
        }
        writeln!(writer, "  Platform: {}", ctx.platform)?;
        writeln!(writer, "  Profile:  {} ({})", ctx.profile, ctx.profile_source)?;
        writeln!(
            writer,
            "  Mode:     {}",
            if ctx.isolated {
                "isolated interpreter per probe"
            } else {
                "shared interpreter"
            }
        )?;
        if self.verbosity == Verbosity::Verbose {
            writeln!(
                writer,
                "  Started:  {}",
                ctx.started_at.format("%Y/%m/%d %H:%M:%S UTC")
            )?;
        }

        if ctx.runtime_mismatch() {
            if let Some(info) = &ctx.interpreter {
                writeln!(
                    writer,
                    "{} runtime label '{}' does not match interpreter version {}",
                    self.colored_tag(OutcomeKind::Warning),
                    ctx.runtime,
                    info.version
                )?;
            }
        }
        Ok(())
    }

    /// Format one outcome line
    fn format_outcome(&self, outcome: &ProbeOutcome, writer: &mut dyn Write) -> std::io::Result<()> {
        let tag = self.colored_tag(outcome.kind);
        match (&outcome.diagnostic, outcome.kind) {
            (Some(diag), kind) if kind.is_failure() => {
                writeln!(writer, "  {} {}: {}: {}", tag, outcome.subject, kind, diag)
            }
            (Some(diag), OutcomeKind::Success) => {
                if self.verbosity == Verbosity::Verbose {
                    writeln!(writer, "  {} {} ({})", tag, outcome.subject, diag)
                } else {
                    writeln!(writer, "  {} {}", tag, outcome.subject)
                }
            }
            (Some(diag), _) => writeln!(writer, "  {} {}: {}", tag, outcome.subject, diag),
            (None, _) => writeln!(writer, "  {} {}", tag, outcome.subject),
        }
    }

    fn format_pass(
        &self,
        report: &Report,
        pass: ProbePass,
        title: &str,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        writeln!(writer)?;
        writeln!(writer, "{}", self.heading(title))?;

        let mut any = false;
        for outcome in report.by_pass(pass) {
            any = true;
            if self.verbosity == Verbosity::Quiet && outcome.kind == OutcomeKind::Success {
                continue;
            }
            self.format_outcome(outcome, writer)?;
        }
        if !any {
            writeln!(writer, "  (none)")?;
        }
        Ok(())
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &Report, writer: &mut dyn Write) -> std::io::Result<()> {
        self.format_header(report, writer)?;
        self.format_pass(report, ProbePass::Import, "Import checks", writer)?;
        self.format_pass(report, ProbePass::Functional, "Functional checks", writer)?;
        writeln!(writer)?;
        self.format_summary(report, writer)
    }

    fn format_summary(&self, report: &Report, writer: &mut dyn Write) -> std::io::Result<()> {
        writeln!(
            writer,
            "Summary: {} checked, {} passed, {} failed ({} import, {} unexpected), {} skipped, {} {}",
            report.total,
            report.succeeded,
            report.failed(),
            report.import_failures,
            report.unexpected_failures,
            report.skipped,
            report.warnings,
            if report.warnings == 1 { "warning" } else { "warnings" }
        )?;

        if !report.failures.is_empty() {
            writeln!(writer, "Failures:")?;
            for failure in &report.failures {
                writeln!(writer, "  - {}", failure)?;
            }
        }

        let verdict = if report.passed { "PASS" } else { "FAIL" };
        if self.color {
            let verdict = if report.passed {
                verdict.green().bold()
            } else {
                verdict.red().bold()
            };
            writeln!(writer, "Result: {}", verdict)
        } else {
            writeln!(writer, "Result: {}", verdict)
        }
    }
}
