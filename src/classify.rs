//! Family classification: pick a verification profile from the manifest
//!
//! This is a heuristic, not an oracle. Each non-default profile has a list
//! of indicator substrings; a profile scores one point per package name that
//! contains any of its indicators. The highest score wins only if it is
//! strictly greater than every other score, otherwise [`TIE_BREAK_PROFILE`]
//! is used. A wrong guess changes which functional checks run and nothing
//! else.

use crate::domain::{DependencySpecifier, VerificationProfile};
use log::debug;

/// Profile chosen when no profile scores strictly highest
pub const TIE_BREAK_PROFILE: VerificationProfile = VerificationProfile::Generic;

/// Indicator substrings per non-default profile
pub static PROFILE_INDICATORS: &[(VerificationProfile, &[&str])] = &[
    (VerificationProfile::Azdev, &["azdev", "azure-cli", "knack"]),
    (
        VerificationProfile::AazDev,
        &["aaz", "schematics", "fuzzywuzzy", "pluralizer"],
    ),
];

/// Score of one profile against a manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileScore {
    /// The profile
    pub profile: VerificationProfile,
    /// Number of package names matching any indicator
    pub matches: usize,
}

/// Count, per profile, how many names contain one of its indicators
pub fn score(names: &[&str]) -> Vec<ProfileScore> {
    PROFILE_INDICATORS
        .iter()
        .map(|(profile, indicators)| {
            let matches = names
                .iter()
                .filter(|name| {
                    let lowered = name.to_ascii_lowercase();
                    indicators.iter().any(|ind| lowered.contains(ind))
                })
                .count();
            ProfileScore {
                profile: *profile,
                matches,
            }
        })
        .collect()
}

/// Choose the profile for a set of parsed specifiers
pub fn classify(specifiers: &[DependencySpecifier]) -> VerificationProfile {
    let names: Vec<&str> = specifiers.iter().map(|s| s.name.as_str()).collect();
    let scores = score(&names);
    let chosen = pick(&scores);
    debug!("profile scores {:?}; chose {}", scores, chosen);
    chosen
}

fn pick(scores: &[ProfileScore]) -> VerificationProfile {
    let Some(best) = scores.iter().map(|s| s.matches).max() else {
        return TIE_BREAK_PROFILE;
    };
    if best == 0 {
        return TIE_BREAK_PROFILE;
    }

    let mut leaders = scores.iter().filter(|s| s.matches == best);
    match (leaders.next(), leaders.next()) {
        (Some(leader), None) => leader.profile,
        _ => TIE_BREAK_PROFILE,
    }
}
