//! Probe backends and the import pass
//!
//! This module provides:
//! - The [`ProbeBackend`] trait over "something that can run Python"
//! - A shared backend reusing one long-lived worker
//! - An isolated backend starting a fresh worker per probe
//! - Interpreter detection
//! - [`ImportProber`], which turns a specifier into an import-pass outcome

mod interpreter;
mod isolated;
mod shared;
mod worker;

pub use interpreter::detect;
pub use isolated::IsolatedInterpreter;
pub use shared::SharedInterpreter;
pub use worker::{run_module, DriverReply, DriverRequest, Worker, DRIVER};

use crate::domain::{canonicalize, DependencySpecifier, OutcomeKind, ProbeOutcome, ProbePass};
use crate::resolver::IdentityResolver;
use async_trait::async_trait;
use log::debug;
use std::collections::HashSet;
use std::time::Duration;

/// What happened when a backend ran one piece of target code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    /// Ran to completion; `value` is the stringified `result`, if any
    Completed { value: Option<String> },
    /// Raised `ImportError` or a subclass
    ImportError { error_type: String, message: String },
    /// Raised any other exception, or a subprocess exited nonzero
    Raised { error_type: String, message: String },
    /// Exceeded the per-probe time limit; the worker was killed
    TimedOut(Duration),
    /// The worker died or the channel broke
    Crashed(String),
}

impl Attempt {
    /// One-line description of a non-completed attempt
    pub fn describe(&self) -> String {
        match self {
            Attempt::Completed { value: Some(v) } => v.clone(),
            Attempt::Completed { value: None } => "completed".to_string(),
            Attempt::ImportError {
                error_type,
                message,
            }
            | Attempt::Raised {
                error_type,
                message,
            } => format!("{}: {}", error_type, message),
            Attempt::TimedOut(limit) => format!("timed out after {}s", limit.as_secs()),
            Attempt::Crashed(message) => message.clone(),
        }
    }
}

/// Something that can run probes against the target interpreter
#[async_trait]
pub trait ProbeBackend: Send {
    /// Import a module by dotted path
    async fn import_module(&mut self, module: &str) -> Attempt;

    /// Execute a snippet and return its `result` variable
    async fn exec_snippet(&mut self, code: &str) -> Attempt;

    /// Run `-m <module> <args...>` as a separate process with its own limit
    async fn run_module(&mut self, module: &str, args: &[&str], limit: Duration) -> Attempt;

    /// Release any worker processes
    async fn shutdown(&mut self) {}
}

/// Create the backend for the chosen isolation mode
pub fn create_backend(python: &str, limit: Duration, isolate: bool) -> Box<dyn ProbeBackend> {
    if isolate {
        Box::new(IsolatedInterpreter::new(python, limit))
    } else {
        Box::new(SharedInterpreter::new(python, limit))
    }
}

/// Runs the import pass for one specifier at a time
pub struct ImportProber<'a> {
    resolver: &'a IdentityResolver,
    skip: HashSet<String>,
}

impl<'a> ImportProber<'a> {
    /// Create a prober; skip entries are canonicalized
    pub fn new<I, S>(resolver: &'a IdentityResolver, skip: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            resolver,
            skip: skip.into_iter().map(|s| canonicalize(s.as_ref())).collect(),
        }
    }

    /// Returns true if the specifier is never imported
    pub fn is_skipped(&self, spec: &DependencySpecifier) -> bool {
        self.skip.contains(&spec.name)
    }

    /// Subject label for a specifier, e.g. `pyyaml -> yaml`
    pub fn subject(&self, spec: &DependencySpecifier) -> String {
        let module = self.resolver.resolve(&spec.name);
        if module.as_str() == spec.name {
            spec.name.clone()
        } else {
            format!("{} -> {}", spec.name, module)
        }
    }

    /// Resolve and import one specifier
    pub async fn probe<B>(&self, spec: &DependencySpecifier, backend: &mut B) -> ProbeOutcome
    where
        B: ProbeBackend + ?Sized,
    {
        let subject = self.subject(spec);
        if self.is_skipped(spec) {
            debug!("skipping '{}' (install tooling)", spec.name);
            return ProbeOutcome::skipped(subject, ProbePass::Import);
        }

        let (module, rule) = self.resolver.resolve_with_rule(&spec.name);
        debug!("importing '{}' for '{}' ({})", module, spec.name, rule);

        match backend.import_module(module.as_str()).await {
            Attempt::Completed { .. } => ProbeOutcome::success(subject, ProbePass::Import),
            Attempt::ImportError { message, .. } => ProbeOutcome::failure(
                subject,
                ProbePass::Import,
                OutcomeKind::ImportFailure,
                message,
            ),
            other => ProbeOutcome::failure(
                subject,
                ProbePass::Import,
                OutcomeKind::UnexpectedFailure,
                other.describe(),
            ),
        }
    }
}
