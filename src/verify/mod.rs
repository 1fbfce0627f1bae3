//! Functional verification pass
//!
//! Runs the catalogue checks of the active profile whose package is in the
//! manifest. Checks run regardless of how the import pass went for that
//! package; a missing package simply fails its check too.

mod checks;

pub use checks::{
    checks_for, CheckAction, Expectation, FunctionalCheck, AAZ_DEV_CHECKS, AZDEV_CHECKS,
    GENERIC_CHECKS,
};

use crate::domain::{
    DependencySpecifier, OutcomeKind, ProbeOutcome, ProbePass, VerificationProfile,
};
use crate::probe::{Attempt, ProbeBackend};
use log::debug;
use std::collections::HashSet;

impl Expectation {
    /// Judge a completed snippet's value
    ///
    /// Returns the detail to attach to a success, or the mismatch message.
    pub fn evaluate(&self, value: Option<&str>) -> Result<Option<String>, String> {
        match self {
            Expectation::Completes => Ok(value.map(String::from)),
            Expectation::Exact(expected) => match value {
                Some(actual) if actual == *expected => Ok(None),
                Some(actual) => Err(format!("expected {:?}, got {:?}", expected, actual)),
                None => Err(format!("expected {:?}, got no result", expected)),
            },
            Expectation::Json(expected) => {
                let actual = value.ok_or_else(|| "expected JSON, got no result".to_string())?;
                let want: serde_json::Value = serde_json::from_str(expected)
                    .map_err(|e| format!("invalid expected JSON: {}", e))?;
                let got: serde_json::Value = serde_json::from_str(actual)
                    .map_err(|e| format!("result is not JSON ({}): {:?}", e, actual))?;
                if got == want {
                    Ok(None)
                } else {
                    Err(format!("expected {}, got {}", want, got))
                }
            }
        }
    }
}

/// Runs the functional checks for one profile
#[derive(Debug, Clone, Copy)]
pub struct FunctionalVerifier {
    profile: VerificationProfile,
}

impl FunctionalVerifier {
    /// Create a verifier for a profile
    pub fn new(profile: VerificationProfile) -> Self {
        Self { profile }
    }

    /// Checks that apply to the parsed manifest, in catalogue order
    pub fn planned(&self, specifiers: &[DependencySpecifier]) -> Vec<&'static FunctionalCheck> {
        let present: HashSet<&str> = specifiers.iter().map(|s| s.name.as_str()).collect();
        checks_for(self.profile)
            .filter(|check| present.contains(check.package))
            .collect()
    }

    /// Run one check and classify its outcome
    pub async fn run<B>(&self, check: &FunctionalCheck, backend: &mut B) -> ProbeOutcome
    where
        B: ProbeBackend + ?Sized,
    {
        debug!("running functional check {}", check.subject());
        let attempt = match check.action {
            CheckAction::Snippet { code, .. } => backend.exec_snippet(code).await,
            CheckAction::ModuleCommand {
                module,
                args,
                timeout,
            } => backend.run_module(module, args, timeout).await,
        };
        classify(check, attempt)
    }
}

fn classify(check: &FunctionalCheck, attempt: Attempt) -> ProbeOutcome {
    let subject = check.subject();
    let failed = if check.advisory {
        OutcomeKind::Warning
    } else {
        OutcomeKind::UnexpectedFailure
    };

    match attempt {
        Attempt::Completed { value } => {
            let verdict = match check.action {
                CheckAction::Snippet { expect, .. } => expect.evaluate(value.as_deref()),
                CheckAction::ModuleCommand { .. } => Ok(None),
            };
            match verdict {
                Ok(Some(detail)) => {
                    ProbeOutcome::success(subject, ProbePass::Functional).with_diagnostic(detail)
                }
                Ok(None) => ProbeOutcome::success(subject, ProbePass::Functional),
                Err(mismatch) => ProbeOutcome::failure(subject, ProbePass::Functional, failed, mismatch),
            }
        }
        timed_out @ Attempt::TimedOut(_) => ProbeOutcome::failure(
            subject,
            ProbePass::Functional,
            OutcomeKind::UnexpectedFailure,
            timed_out.describe(),
        ),
        other => ProbeOutcome::failure(subject, ProbePass::Functional, failed, other.describe()),
    }
}
