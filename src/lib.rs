//! depprobe - requirements compatibility checker library
//!
//! Given a Python dependency manifest, this library:
//! - Parses it into canonical dependency specifiers
//! - Resolves each distribution name to its import identifier
//! - Imports every module in a target interpreter
//! - Runs functional smoke tests for well-known packages
//! - Aggregates the outcomes into a pass/fail report

pub mod classify;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod orchestrator;
pub mod output;
pub mod parser;
pub mod probe;
pub mod progress;
pub mod resolver;
pub mod verify;
