//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: the manifest is missing, unreadable or empty (fatal input)
//! - ConfigError: invalid configuration file or values
//! - InterpreterError: the target interpreter cannot be started or queried
//! - WorkerError: the channel to an interpreter worker broke mid-probe
//!
//! Per-dependency failures are never errors: they become probe outcomes.

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Interpreter related errors
    #[error(transparent)]
    Interpreter(#[from] InterpreterError),
}

/// Errors related to the requirements manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error (for pyproject.toml)
    #[error("failed to parse TOML in {path}: {message}")]
    TomlParseError { path: PathBuf, message: String },

    /// Manifest parsed to zero dependency specifiers
    #[error("no dependency specifiers found in {path}")]
    Empty { path: PathBuf },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error
    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// Override maps a package to something that is not a module path
    #[error("invalid override for '{package}': '{module}' is not a dotted module path")]
    InvalidOverride { package: String, module: String },

    /// Vendor prefix entry is malformed
    #[error("invalid vendor prefix '{prefix}' -> '{root}': {message}")]
    InvalidVendorPrefix {
        prefix: String,
        root: String,
        message: String,
    },

    /// Unknown verification profile name
    #[error("invalid profile: {message}")]
    InvalidProfile { message: String },

    /// Timeout of zero seconds
    #[error("invalid timeout: must be at least 1 second")]
    InvalidTimeout,
}

/// Errors related to starting or querying the interpreter
#[derive(Error, Debug)]
pub enum InterpreterError {
    /// The interpreter executable could not be started
    #[error("failed to start interpreter '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The interpreter ran but the identity query failed
    #[error("interpreter '{command}' failed to report its version: {message}")]
    Query { command: String, message: String },

    /// Identity query did not finish in time
    #[error("interpreter '{command}' did not respond within {seconds}s")]
    Timeout { command: String, seconds: u64 },
}

/// Errors on the request/reply channel to an interpreter worker
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Worker process could not be started
    #[error("failed to start interpreter worker '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing the worker pipes failed
    #[error("interpreter worker I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Worker exited before replying
    #[error("interpreter worker exited before replying{}", exit_suffix(.status))]
    Exited { status: Option<String> },

    /// Worker replied with something that is not a protocol message
    #[error("malformed reply from interpreter worker: {message}")]
    Protocol { message: String },
}

fn exit_suffix(status: &Option<String>) -> String {
    status
        .as_ref()
        .map(|s| format!(" ({})", s))
        .unwrap_or_default()
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new Empty error
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        ManifestError::Empty { path: path.into() }
    }
}

impl ConfigError {
    /// Creates a new ParseError
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidOverride error
    pub fn invalid_override(package: impl Into<String>, module: impl Into<String>) -> Self {
        ConfigError::InvalidOverride {
            package: package.into(),
            module: module.into(),
        }
    }
}

impl InterpreterError {
    /// Creates a new Query error
    pub fn query(command: impl Into<String>, message: impl Into<String>) -> Self {
        InterpreterError::Query {
            command: command.into(),
            message: message.into(),
        }
    }
}

impl WorkerError {
    /// Creates a new Protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        WorkerError::Protocol {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_error_not_found() {
        let err = ManifestError::not_found("/path/to/requirements.txt");
        let msg = format!("{}", err);
        assert!(msg.contains("manifest file not found"));
        assert!(msg.contains("requirements.txt"));
    }

    #[test]
    fn test_manifest_error_empty() {
        let err = ManifestError::empty("reqs.txt");
        assert_eq!(err.to_string(), "no dependency specifiers found in reqs.txt");
    }

    #[test]
    fn test_manifest_error_read() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ManifestError::read_error("reqs.txt", io);
        let msg = format!("{}", err);
        assert!(msg.contains("failed to read manifest file"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_config_error_parse() {
        let err = ConfigError::parse_error("depprobe.toml", "expected '='");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to parse config file"));
        assert!(msg.contains("expected '='"));
    }

    #[test]
    fn test_config_error_invalid_override() {
        let err = ConfigError::invalid_override("pyyaml", "not-a-module");
        let msg = format!("{}", err);
        assert!(msg.contains("'pyyaml'"));
        assert!(msg.contains("'not-a-module'"));
    }

    #[test]
    fn test_interpreter_error_timeout() {
        let err = InterpreterError::Timeout {
            command: "python3".to_string(),
            seconds: 30,
        };
        assert_eq!(
            err.to_string(),
            "interpreter 'python3' did not respond within 30s"
        );
    }

    #[test]
    fn test_worker_error_exited() {
        let err = WorkerError::Exited {
            status: Some("signal: 11".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "interpreter worker exited before replying (signal: 11)"
        );

        let err = WorkerError::Exited { status: None };
        assert_eq!(err.to_string(), "interpreter worker exited before replying");
    }

    #[test]
    fn test_app_error_from_manifest_error() {
        let app_err: AppError = ManifestError::not_found("/path").into();
        assert!(app_err.to_string().contains("manifest file not found"));
    }

    #[test]
    fn test_app_error_from_config_error() {
        let app_err: AppError = ConfigError::InvalidTimeout.into();
        assert!(app_err.to_string().contains("invalid timeout"));
    }

    #[test]
    fn test_app_error_from_interpreter_error() {
        let app_err: AppError = InterpreterError::query("python3", "exit status 1").into();
        assert!(app_err.to_string().contains("failed to report its version"));
    }

    #[test]
    fn test_error_debug_trait() {
        let err = ManifestError::not_found("/test");
        let debug = format!("{:?}", err);
        assert!(debug.contains("NotFound"));
    }
}
