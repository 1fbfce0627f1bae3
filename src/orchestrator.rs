//! Probe orchestrator coordinating one verification run
//!
//! Workflow: read manifest → choose profile → detect interpreter → import
//! pass → functional pass → report. Probes run strictly one after another;
//! per-dependency failures become outcomes and never abort the run.

use crate::classify::classify;
use crate::cli::CliArgs;
use crate::config::Settings;
use crate::domain::{
    DependencySpecifier, InterpreterInfo, ProbeOutcome, ProfileSource, Report, ReportContext,
    VerificationProfile,
};
use crate::error::AppError;
use crate::parser::read_manifest;
use crate::probe::{create_backend, detect, ImportProber, ProbeBackend};
use crate::progress::Progress;
use crate::verify::FunctionalVerifier;
use chrono::Utc;
use log::{debug, info};

/// Orchestrator for one verification run
pub struct Orchestrator {
    /// CLI arguments (manifest, labels, output switches)
    args: CliArgs,
    /// Layered settings
    settings: Settings,
}

impl Orchestrator {
    /// Create an orchestrator, loading configuration for the given arguments
    pub fn new(args: CliArgs) -> Result<Self, AppError> {
        let settings = Settings::resolve(&args)?;
        Ok(Self::with_settings(args, settings))
    }

    /// Create an orchestrator with already-resolved settings (for testing)
    pub fn with_settings(args: CliArgs, settings: Settings) -> Self {
        Self { args, settings }
    }

    /// Resolved settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Profile for this run: forced by flag or config, else classified
    pub fn choose_profile(
        &self,
        specifiers: &[DependencySpecifier],
    ) -> (VerificationProfile, ProfileSource) {
        self.settings
            .profile
            .unwrap_or_else(|| (classify(specifiers), ProfileSource::Classified))
    }

    /// Run the whole workflow against the real interpreter
    ///
    /// Fatal errors (missing or empty manifest, bad config, interpreter that
    /// cannot start) are returned; everything else ends up in the report.
    pub async fn run(&self) -> Result<Report, AppError> {
        let specifiers = read_manifest(&self.args.manifest)?;
        let mut progress = Progress::new(self.args.show_progress());

        progress.spinner(&format!("Starting {}", self.settings.python));
        let interpreter = detect(&self.settings.python, self.settings.timeout).await;
        progress.finish_and_clear();
        let interpreter = interpreter?;
        info!("probing with {}", interpreter);

        let mut backend = create_backend(
            &self.settings.python,
            self.settings.timeout,
            self.settings.isolate,
        );
        let report = self
            .probe(&specifiers, Some(interpreter), backend.as_mut(), &mut progress)
            .await;
        backend.shutdown().await;
        Ok(report)
    }

    /// Run both passes over parsed specifiers with the given backend
    pub async fn probe<B>(
        &self,
        specifiers: &[DependencySpecifier],
        interpreter: Option<InterpreterInfo>,
        backend: &mut B,
        progress: &mut Progress,
    ) -> Report
    where
        B: ProbeBackend + ?Sized,
    {
        let started_at = Utc::now();
        let (profile, profile_source) = self.choose_profile(specifiers);
        debug!("profile {} ({})", profile, profile_source);

        let mut outcomes: Vec<ProbeOutcome> = Vec::new();

        let prober = ImportProber::new(&self.settings.resolver, &self.settings.skip);
        progress.start(specifiers.len() as u64, "Import checks");
        for spec in specifiers {
            progress.set_message(&spec.name);
            outcomes.push(prober.probe(spec, backend).await);
            progress.inc();
        }

        let verifier = FunctionalVerifier::new(profile);
        let planned = verifier.planned(specifiers);
        progress.start(planned.len() as u64, "Functional checks");
        for check in planned {
            progress.set_message(&check.subject());
            outcomes.push(verifier.run(check, backend).await);
            progress.inc();
        }
        progress.finish_and_clear();

        let context = ReportContext {
            manifest: self.args.manifest.clone(),
            runtime: self.args.runtime.clone(),
            platform: self.args.platform.clone(),
            profile,
            profile_source,
            isolated: self.settings.isolate,
            interpreter,
            started_at,
        };
        Report::new(context, outcomes)
    }
}
