//! Unused module detection logic.

use crate::closure::UsedSet;
use crate::model::ModuleName;

/// Name prefixes of platform assemblies that are never deleted.
pub const SYSTEM_PREFIXES: &[&str] = &[
    "System.",
    "Microsoft.",
    "Windows.",
    "netstandard",
    "mscorlib",
    "Accessibility",
    "Presentation",
    "WindowsBase",
];

/// User-supplied names exempt from cleanup.
///
/// An entry matches a module name exactly or as a dotted prefix, both
/// case-insensitively: `Acme` matches `Acme` and `Acme.Plugins`, not `AcmeX`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist {
    entries: Vec<String>,
}

impl Whitelist {
    pub fn new(entries: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let entries = entries
            .into_iter()
            .map(Into::into)
            .map(|e: String| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { entries }
    }

    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.entries
            .iter()
            .any(|w| name == *w || name.starts_with(&format!("{}.", w)))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

/// Built-in system prefixes plus any configured extras.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPrefixes {
    prefixes: Vec<String>,
}

impl Default for SystemPrefixes {
    fn default() -> Self {
        Self {
            prefixes: SYSTEM_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl SystemPrefixes {
    /// Built-ins extended with `extra`; the built-in list is never reduced.
    pub fn with_extra(extra: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut set = Self::default();
        for prefix in extra {
            let prefix: String = prefix.into();
            if !prefix.trim().is_empty() && !set.prefixes.contains(&prefix) {
                set.prefixes.push(prefix);
            }
        }
        set
    }

    pub fn matches(&self, name: &ModuleName) -> bool {
        self.prefixes.iter().any(|p| name.starts_with_ignore_case(p))
    }
}

/// Everything the detector consults besides the module itself.
#[derive(Debug, Clone)]
pub struct Exclusions<'a> {
    pub used: &'a UsedSet,
    pub entry: &'a ModuleName,
    pub whitelist: &'a Whitelist,
    pub system: &'a SystemPrefixes,
}

/// A regular module is unused iff it is unreachable, not the entry, not
/// whitelisted and not a system assembly.
pub fn is_unused(name: &ModuleName, ex: &Exclusions<'_>) -> bool {
    name != ex.entry
        && !ex.used.contains(name)
        && !ex.whitelist.matches(name.as_str())
        && !ex.system.matches(name)
}
