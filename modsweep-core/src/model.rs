//! Core data types shared by the walker, classifier, detector and aggregator.

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// A module name with case-insensitive identity.
///
/// The original spelling is kept for display; equality, hashing and ordering
/// use the lowercased key.
#[derive(Debug, Clone)]
pub struct ModuleName {
    display: String,
    key: String,
}

impl ModuleName {
    pub fn new(name: impl Into<String>) -> Self {
        let display = name.into();
        let key = display.to_lowercase();
        Self { display, key }
    }

    /// Module name of a file: its base name without the final extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_stem()
            .map(|stem| Self::new(stem.to_string_lossy().into_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// Lowercased comparison key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Case-insensitive prefix test.
    pub fn starts_with_ignore_case(&self, prefix: &str) -> bool {
        self.key.starts_with(&prefix.to_lowercase())
    }
}

impl PartialEq for ModuleName {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ModuleName {}

impl Hash for ModuleName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for ModuleName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ModuleName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl From<&str> for ModuleName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl Serialize for ModuleName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display)
    }
}

/// Kind of a binary module file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    Regular,
    LocaleSatellite,
}

/// Why a non-module file is considered auxiliary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuxiliaryKind {
    /// Extension from the cleanable allowlist (lowercase, without the dot)
    Extension(String),
    /// Transient file name prefix such as `~$`
    Transient,
}

impl fmt::Display for AuxiliaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extension(ext) => write!(f, ".{}", ext),
            Self::Transient => write!(f, "transient"),
        }
    }
}

/// Category assigned to each scanned file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileCategory {
    Module,
    LocaleSatellite,
    Auxiliary(AuxiliaryKind),
    Ignored,
}

/// A module file found under the scan root.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleFile {
    pub name: ModuleName,
    pub path: PathBuf,
    /// Path relative to the scan root, forward slashes
    pub relative: String,
    pub size_bytes: u64,
    pub kind: ModuleKind,
}

/// A cleanable non-module file.
#[derive(Debug, Clone, Serialize)]
pub struct AuxiliaryFile {
    pub path: PathBuf,
    pub relative: String,
    pub size_bytes: u64,
    pub category: AuxiliaryKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_module_name_case_insensitive_identity() {
        let a = ModuleName::new("Newtonsoft.Json");
        let b = ModuleName::new("newtonsoft.json");
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_module_name_keeps_display() {
        let name = ModuleName::new("Core");
        assert_eq!(name.to_string(), "Core");
        assert_eq!(name.key(), "core");
    }

    #[test]
    fn test_module_name_from_path() {
        let name = ModuleName::from_path(Path::new("fr-FR/App.resources.dll")).unwrap();
        assert_eq!(name.as_str(), "App.resources");
        assert!(ModuleName::from_path(Path::new("/")).is_none());
    }

    #[test]
    fn test_starts_with_ignore_case() {
        let name = ModuleName::new("System.Text.Json");
        assert!(name.starts_with_ignore_case("system."));
        assert!(name.starts_with_ignore_case("SYSTEM.TEXT"));
        assert!(!name.starts_with_ignore_case("Microsoft."));
    }

    #[test]
    fn test_auxiliary_kind_display() {
        assert_eq!(AuxiliaryKind::Extension("pdb".into()).to_string(), ".pdb");
        assert_eq!(AuxiliaryKind::Transient.to_string(), "transient");
    }
}
