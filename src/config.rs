//! Configuration loading and layering
//!
//! Settings are layered: built-in defaults, then the TOML config file, then
//! command-line flags. The config file is `--config <PATH>` or, when present,
//! `depprobe.toml` next to the manifest.

use crate::cli::CliArgs;
use crate::domain::{is_canonical_charset, ImportIdentifier, ProfileSource, VerificationProfile};
use crate::error::ConfigError;
use crate::resolver::{IdentityResolver, VendorPrefix, BUILTIN_SKIP};
use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up next to the manifest
pub const CONFIG_FILE_NAME: &str = "depprobe.toml";

/// Per-probe limit when nothing else is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Interpreter command when nothing else is configured
pub const DEFAULT_PYTHON: &str = if cfg!(windows) { "python" } else { "python3" };

/// Contents of a `depprobe.toml` file
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Interpreter command
    pub python: Option<String>,
    /// Per-probe limit in seconds
    pub timeout_secs: Option<u64>,
    /// Profile name, or `auto`
    pub profile: Option<String>,
    /// Extra packages never imported
    #[serde(default)]
    pub skip: Vec<String>,
    /// Extra distribution -> module overrides
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,
    /// Extra vendor prefixes, e.g. `"acme-" = "acme"`
    #[serde(default)]
    pub vendor_prefixes: BTreeMap<String, String>,
}

impl FileConfig {
    /// Parse config text; `path` is only used in error messages
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::parse_error(path, e.to_string()))
    }

    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    fn profile(&self) -> Result<Option<VerificationProfile>, ConfigError> {
        match self.profile.as_deref().map(str::trim) {
            None | Some("auto") => Ok(None),
            Some(name) => name
                .parse()
                .map(Some)
                .map_err(|message| ConfigError::InvalidProfile { message }),
        }
    }

    fn vendor_prefixes(&self) -> Result<Vec<VendorPrefix>, ConfigError> {
        self.vendor_prefixes
            .iter()
            .map(|(prefix, root)| {
                let invalid = |message: &str| ConfigError::InvalidVendorPrefix {
                    prefix: prefix.clone(),
                    root: root.clone(),
                    message: message.to_string(),
                };
                if !prefix.ends_with('-') || !is_canonical_charset(prefix) {
                    return Err(invalid("prefix must be a distribution name prefix ending in '-'"));
                }
                if !ImportIdentifier::is_valid(root) {
                    return Err(invalid("root must be a dotted module path"));
                }
                Ok(VendorPrefix::new(prefix, root.clone()))
            })
            .collect()
    }

    fn validate_overrides(&self) -> Result<(), ConfigError> {
        match self
            .overrides
            .iter()
            .find(|(_, module)| !ImportIdentifier::is_valid(module))
        {
            Some((package, module)) => Err(ConfigError::invalid_override(package, module)),
            None => Ok(()),
        }
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Interpreter command
    pub python: String,
    /// Per-probe limit
    pub timeout: Duration,
    /// Forced profile and where it came from; `None` means classify
    pub profile: Option<(VerificationProfile, ProfileSource)>,
    /// Canonical or raw names never imported
    pub skip: Vec<String>,
    /// Resolver with built-in and configured tables
    pub resolver: IdentityResolver,
    /// Fresh interpreter per probe
    pub isolate: bool,
    /// Config file that was loaded, if any
    pub config_path: Option<PathBuf>,
}

impl Settings {
    /// Layer defaults, config file and flags
    pub fn resolve(args: &CliArgs) -> Result<Self, ConfigError> {
        let config_path = locate_config(args);
        let file = match &config_path {
            Some(path) => {
                debug!("loading config from {}", path.display());
                FileConfig::load(path)?
            }
            None => FileConfig::default(),
        };
        let mut settings = Self::layer(args, &file)?;
        settings.config_path = config_path;
        Ok(settings)
    }

    /// Layer an already-parsed config file under the flags
    pub fn layer(args: &CliArgs, file: &FileConfig) -> Result<Self, ConfigError> {
        let python = args
            .python
            .clone()
            .or_else(|| file.python.clone())
            .unwrap_or_else(|| DEFAULT_PYTHON.to_string());

        let timeout_secs = match (args.timeout, file.timeout_secs) {
            (Some(secs), _) => secs,
            (None, Some(0)) => return Err(ConfigError::InvalidTimeout),
            (None, Some(secs)) => secs,
            (None, None) => DEFAULT_TIMEOUT_SECS,
        };

        let profile = match args.profile {
            Some(arg) => arg.forced().map(|p| (p, ProfileSource::Cli)),
            None => file.profile()?.map(|p| (p, ProfileSource::Config)),
        };

        file.validate_overrides()?;
        let resolver = IdentityResolver::builtin()
            .with_vendor_prefixes(file.vendor_prefixes()?)
            .with_overrides(file.overrides.iter().map(|(k, v)| (k.as_str(), v.clone())));

        let skip = BUILTIN_SKIP
            .iter()
            .map(|s| s.to_string())
            .chain(file.skip.iter().cloned())
            .chain(args.skip.iter().cloned())
            .collect();

        Ok(Self {
            python,
            timeout: Duration::from_secs(timeout_secs),
            profile,
            skip,
            resolver,
            isolate: args.isolate,
            config_path: None,
        })
    }
}

fn locate_config(args: &CliArgs) -> Option<PathBuf> {
    if let Some(path) = &args.config {
        return Some(path.clone());
    }
    let beside = args
        .manifest
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(CONFIG_FILE_NAME);
    beside.is_file().then_some(beside)
}
