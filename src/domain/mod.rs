//! Core domain models for depprobe
//!
//! This module contains the value types passed between pipeline stages:
//! - Dependency specifiers parsed from the manifest
//! - Import identifiers produced by the resolver
//! - Probe outcomes and the aggregated report
//! - Verification profiles and interpreter details

mod import_id;
mod interpreter;
mod outcome;
mod profile;
mod report;
mod specifier;

pub use import_id::ImportIdentifier;
pub use interpreter::InterpreterInfo;
pub use outcome::{OutcomeKind, ProbeOutcome, ProbePass};
pub use profile::{ProfileSource, VerificationProfile};
pub use report::{Report, ReportContext};
pub use specifier::{canonicalize, is_canonical_charset, DependencySpecifier};
