//! Identity resolution: canonical distribution name to import identifier
//!
//! Rules, in priority order:
//! 1. override table lookup (case-insensitive)
//! 2. vendor prefix rule: `azure-mgmt-core` -> `azure.mgmt.core`
//! 3. fallback: every `-` becomes `_`
//!
//! Resolution is pure and total: every name resolves to exactly one
//! identifier.

mod table;

pub use table::{BUILTIN_OVERRIDES, BUILTIN_SKIP, BUILTIN_VENDOR_PREFIXES};

use crate::domain::{canonicalize, ImportIdentifier};
use log::debug;
use std::collections::BTreeMap;
use std::fmt;

/// Which rule produced an identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionRule {
    /// Explicit override table entry
    Override,
    /// Vendor prefix rewrite, with the prefix that matched
    VendorPrefix(String),
    /// Hyphen-to-underscore fallback
    Fallback,
}

impl fmt::Display for ResolutionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionRule::Override => write!(f, "override"),
            ResolutionRule::VendorPrefix(prefix) => write!(f, "vendor prefix '{}'", prefix),
            ResolutionRule::Fallback => write!(f, "fallback"),
        }
    }
}

/// A hyphenated distribution prefix and its package root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorPrefix {
    /// Canonical prefix including the trailing hyphen, e.g. `azure-`
    pub prefix: String,
    /// Dotted package root, e.g. `azure`
    pub root: String,
}

impl VendorPrefix {
    /// Creates a vendor prefix; the prefix is canonicalized
    pub fn new(prefix: &str, root: impl Into<String>) -> Self {
        Self {
            prefix: canonicalize(prefix),
            root: root.into(),
        }
    }

    /// Rewrites `name` under this vendor root, if the prefix applies
    fn rewrite(&self, name: &str) -> Option<String> {
        let rest = name.strip_prefix(&self.prefix)?;
        let segments: Vec<&str> = rest.split('-').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return None;
        }
        Some(format!("{}.{}", self.root, segments.join(".")))
    }
}

/// Maps canonical package names to import identifiers
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    overrides: BTreeMap<String, String>,
    // Longest prefix first
    vendor_prefixes: Vec<VendorPrefix>,
}

impl IdentityResolver {
    /// Creates a resolver from explicit tables
    pub fn new<O, K, V>(overrides: O, vendor_prefixes: Vec<VendorPrefix>) -> Self
    where
        O: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let overrides = overrides
            .into_iter()
            .map(|(k, v)| (canonicalize(k.as_ref()), v.into()))
            .collect();
        let mut resolver = Self {
            overrides,
            vendor_prefixes,
        };
        resolver.sort_prefixes();
        resolver
    }

    /// Creates a resolver with the built-in tables
    pub fn builtin() -> Self {
        let prefixes = BUILTIN_VENDOR_PREFIXES
            .iter()
            .map(|(prefix, root)| VendorPrefix::new(prefix, *root))
            .collect();
        Self::new(BUILTIN_OVERRIDES.iter().copied(), prefixes)
    }

    /// Layers additional overrides on top; later entries win
    pub fn with_overrides<O, K, V>(mut self, overrides: O) -> Self
    where
        O: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (k, v) in overrides {
            self.overrides.insert(canonicalize(k.as_ref()), v.into());
        }
        self
    }

    /// Adds vendor prefixes; an existing prefix gets the new root
    pub fn with_vendor_prefixes(mut self, prefixes: Vec<VendorPrefix>) -> Self {
        for prefix in prefixes {
            self.vendor_prefixes.retain(|p| p.prefix != prefix.prefix);
            self.vendor_prefixes.push(prefix);
        }
        self.sort_prefixes();
        self
    }

    fn sort_prefixes(&mut self) {
        self.vendor_prefixes
            .sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()).then(a.prefix.cmp(&b.prefix)));
    }

    /// Returns the number of override entries
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    /// Resolve a package name to its import identifier
    pub fn resolve(&self, name: &str) -> ImportIdentifier {
        self.resolve_with_rule(name).0
    }

    /// Resolve a package name and report which rule applied
    pub fn resolve_with_rule(&self, name: &str) -> (ImportIdentifier, ResolutionRule) {
        let key = canonicalize(name);
        let vendor = self
            .vendor_prefixes
            .iter()
            .find_map(|p| p.rewrite(&key).map(|module| (p, module)));

        if let Some(module) = self.overrides.get(&key) {
            if let Some((prefix, rewritten)) = &vendor {
                if rewritten != module {
                    debug!(
                        "override '{}' -> '{}' takes precedence over vendor prefix '{}' ('{}')",
                        key, module, prefix.prefix, rewritten
                    );
                }
            }
            return (ImportIdentifier::new(module.clone()), ResolutionRule::Override);
        }

        if let Some((prefix, module)) = vendor {
            return (
                ImportIdentifier::new(module),
                ResolutionRule::VendorPrefix(prefix.prefix.clone()),
            );
        }

        (
            ImportIdentifier::new(key.replace('-', "_")),
            ResolutionRule::Fallback,
        )
    }
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(name: &str) -> String {
        IdentityResolver::builtin().resolve(name).to_string()
    }

    #[test]
    fn test_override_pyyaml() {
        assert_eq!(resolve("pyyaml"), "yaml");
    }

    #[test]
    fn test_override_case_insensitive() {
        assert_eq!(resolve("PyYAML"), "yaml");
        assert_eq!(resolve("Beautifulsoup4"), "bs4");
        assert_eq!(resolve("python_dateutil"), "dateutil");
    }

    #[test]
    fn test_fallback_replaces_hyphens_only() {
        assert_eq!(
            resolve("definitely-not-a-real-package-xyz"),
            "definitely_not_a_real_package_xyz"
        );
        assert_eq!(resolve("typing-extensions"), "typing_extensions");
        assert_eq!(resolve("jinja2"), "jinja2");
        assert_eq!(resolve("zope.interface"), "zope.interface");
    }

    #[test]
    fn test_vendor_prefix_azure() {
        assert_eq!(resolve("azure-mgmt-core"), "azure.mgmt.core");
        assert_eq!(resolve("azure-storage-blob"), "azure.storage.blob");
        assert_eq!(resolve("azure-cli-core"), "azure.cli.core");
        assert_eq!(resolve("azure_identity"), "azure.identity");
    }

    #[test]
    fn test_vendor_prefix_multi_segment() {
        assert_eq!(resolve("google-cloud-storage"), "google.cloud.storage");
        assert_eq!(
            resolve("opentelemetry-instrumentation-flask"),
            "opentelemetry.instrumentation.flask"
        );
    }

    #[test]
    fn test_vendor_prefix_needs_remainder() {
        // "azure" alone has no "azure-" prefix; falls back
        assert_eq!(resolve("azure"), "azure");
    }

    #[test]
    fn test_override_beats_vendor_prefix() {
        let (id, rule) = IdentityResolver::builtin().resolve_with_rule("azure-devtools");
        assert_eq!(id.as_str(), "azure_devtools");
        assert_eq!(rule, ResolutionRule::Override);
    }

    #[test]
    fn test_rules_reported() {
        let resolver = IdentityResolver::builtin();
        assert_eq!(resolver.resolve_with_rule("pyyaml").1, ResolutionRule::Override);
        assert_eq!(
            resolver.resolve_with_rule("azure-mgmt-core").1,
            ResolutionRule::VendorPrefix("azure-".to_string())
        );
        assert_eq!(resolver.resolve_with_rule("click").1, ResolutionRule::Fallback);
    }

    #[test]
    fn test_deterministic() {
        let resolver = IdentityResolver::builtin();
        for name in ["pyyaml", "azure-mgmt-core", "some-thing", "discord.py"] {
            assert_eq!(resolver.resolve(name), resolver.resolve(name));
        }
    }

    #[test]
    fn test_user_overrides_win() {
        let resolver = IdentityResolver::builtin()
            .with_overrides([("pyyaml", "ruamel.yaml"), ("My_Dist", "mymod")]);
        assert_eq!(resolver.resolve("pyyaml").as_str(), "ruamel.yaml");
        assert_eq!(resolver.resolve("my-dist").as_str(), "mymod");
    }

    #[test]
    fn test_user_override_shadows_vendor_prefix() {
        let resolver =
            IdentityResolver::builtin().with_overrides([("azure-mgmt-core", "azure_mgmt_core")]);
        assert_eq!(resolver.resolve("azure-mgmt-core").as_str(), "azure_mgmt_core");
    }

    #[test]
    fn test_longest_vendor_prefix_wins() {
        let resolver = IdentityResolver::new(
            Vec::<(&str, &str)>::new(),
            vec![
                VendorPrefix::new("acme-", "acme"),
                VendorPrefix::new("acme-cloud-", "acme.cloud"),
            ],
        );
        assert_eq!(resolver.resolve("acme-cloud-store").as_str(), "acme.cloud.store");
        assert_eq!(resolver.resolve("acme-tools").as_str(), "acme.tools");
    }

    #[test]
    fn test_with_vendor_prefixes_replaces_root() {
        let resolver = IdentityResolver::builtin()
            .with_vendor_prefixes(vec![VendorPrefix::new("azure-", "azure_ns")]);
        assert_eq!(resolver.resolve("azure-core").as_str(), "azure_ns.core");
    }

    #[test]
    fn test_collapses_empty_segments() {
        assert_eq!(resolve("azure--core"), "azure.core");
    }

    #[test]
    fn test_builtin_override_count() {
        assert_eq!(
            IdentityResolver::builtin().override_count(),
            BUILTIN_OVERRIDES.len()
        );
    }
}
