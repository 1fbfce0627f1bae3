//! Verification profile definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named bundle of functional checks for a dependency family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerificationProfile {
    /// Checks for common general-purpose libraries
    #[default]
    Generic,
    /// Azure CLI developer tooling (azdev)
    Azdev,
    /// aaz-dev-tools code generator on top of azdev
    AazDev,
}

impl VerificationProfile {
    /// Returns the profile name used on the command line and in config files
    pub fn name(&self) -> &'static str {
        match self {
            VerificationProfile::Generic => "generic",
            VerificationProfile::Azdev => "azdev",
            VerificationProfile::AazDev => "aaz-dev",
        }
    }

    /// Returns all profiles
    pub fn all() -> &'static [VerificationProfile] {
        &[
            VerificationProfile::Generic,
            VerificationProfile::Azdev,
            VerificationProfile::AazDev,
        ]
    }
}

impl fmt::Display for VerificationProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VerificationProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" => Ok(VerificationProfile::Generic),
            "azdev" => Ok(VerificationProfile::Azdev),
            "aaz-dev" | "aaz_dev" | "aazdev" => Ok(VerificationProfile::AazDev),
            other => Err(format!(
                "unknown profile '{}': expected 'generic', 'azdev' or 'aaz-dev'",
                other
            )),
        }
    }
}

/// How the active profile was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileSource {
    /// `--profile` on the command line
    Cli,
    /// `profile` key in the config file
    Config,
    /// Inferred from the manifest by the family classifier
    Classified,
}

impl fmt::Display for ProfileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProfileSource::Cli => "command line",
            ProfileSource::Config => "config file",
            ProfileSource::Classified => "auto",
        };
        f.write_str(label)
    }
}
