//! File classification by path and name heuristics.
//!
//! Classification is pure: it looks only at the path relative to the scan
//! root, never at file contents, so repeated runs agree.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

use crate::model::{AuxiliaryKind, FileCategory};
use crate::scan::{extension_lower, is_module_file};

/// Extensions of build/debug leftovers that are safe to remove.
pub const AUXILIARY_EXTENSIONS: &[&str] = &["pdb", "xml", "config", "bak", "tmp", "log"];

/// File name prefix of transient office/editor lock files.
pub const TRANSIENT_PREFIX: &str = "~$";

/// Infix marking a resource-only satellite module.
const RESOURCE_MARKER: &str = ".resources.";

/// Culture directory names: `fr`, `de-DE`, `zh-cn`.
fn culture_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // SAFETY: This regex pattern is hardcoded and covered by tests.
    REGEX.get_or_init(|| {
        Regex::new(r"(?i)^[a-z]{2}(-[a-z]{2})?$").expect("Hardcoded regex pattern is valid")
    })
}

/// Returns true if `dir_name` looks like a culture code.
pub fn is_culture_name(dir_name: &str) -> bool {
    culture_regex().is_match(dir_name)
}

/// Locale heuristic on a path relative to the scan root.
///
/// True when the immediate parent directory is a culture code, or the file
/// name carries the `.resources.` marker.
pub fn is_locale_path(relative: &Path) -> bool {
    let in_culture_dir = relative
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .is_some_and(is_culture_name);

    if in_culture_dir {
        return true;
    }

    relative
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .is_some_and(|name| name.contains(RESOURCE_MARKER))
}

/// Auxiliary heuristic: allowlisted extension or transient name prefix.
pub fn auxiliary_kind(path: &Path) -> Option<AuxiliaryKind> {
    if let Some(ext) = extension_lower(path) {
        if AUXILIARY_EXTENSIONS.contains(&ext.as_str()) {
            return Some(AuxiliaryKind::Extension(ext));
        }
    }

    let transient = path
        .file_name()
        .map(|n| n.to_string_lossy().starts_with(TRANSIENT_PREFIX))
        .unwrap_or(false);

    transient.then_some(AuxiliaryKind::Transient)
}

/// Assigns each scanned file to exactly one category.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    clean_auxiliary: bool,
}

impl Classifier {
    pub fn new(clean_auxiliary: bool) -> Self {
        Self { clean_auxiliary }
    }

    /// Classifies a path relative to the scan root.
    ///
    /// Rules, in order: module extension (satellite or regular), auxiliary
    /// when enabled, otherwise ignored.
    pub fn classify(&self, relative: &Path) -> FileCategory {
        if is_module_file(relative) {
            return if is_locale_path(relative) {
                FileCategory::LocaleSatellite
            } else {
                FileCategory::Module
            };
        }

        if self.clean_auxiliary {
            if let Some(kind) = auxiliary_kind(relative) {
                return FileCategory::Auxiliary(kind);
            }
        }

        FileCategory::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_culture_names() {
        for name in ["fr", "de-DE", "zh-cn", "PT-br"] {
            assert!(is_culture_name(name), "{} should be a culture", name);
        }
        for name in ["bin", "x64", "zh-Hans", "runtimes", "f"] {
            assert!(!is_culture_name(name), "{} should not be a culture", name);
        }
    }

    #[test]
    fn test_regular_module() {
        let c = Classifier::new(false);
        assert_eq!(c.classify(Path::new("Core.dll")), FileCategory::Module);
        assert_eq!(c.classify(Path::new("App.EXE")), FileCategory::Module);
        assert_eq!(c.classify(Path::new("lib/Core.dll")), FileCategory::Module);
    }

    #[test]
    fn test_locale_by_directory() {
        let c = Classifier::new(false);
        assert_eq!(
            c.classify(Path::new("fr-FR/App.resources.dll")),
            FileCategory::LocaleSatellite
        );
        assert_eq!(c.classify(Path::new("de/Anything.dll")), FileCategory::LocaleSatellite);
    }

    #[test]
    fn test_locale_by_marker() {
        let c = Classifier::new(false);
        assert_eq!(
            c.classify(Path::new("App.Resources.dll")),
            FileCategory::LocaleSatellite
        );
    }

    #[test]
    fn test_scan_root_name_is_not_a_culture_dir() {
        // Only the parent below the scan root counts.
        let c = Classifier::new(false);
        assert_eq!(c.classify(Path::new("Core.dll")), FileCategory::Module);
    }

    #[test]
    fn test_auxiliary_only_when_enabled() {
        let off = Classifier::new(false);
        let on = Classifier::new(true);

        assert_eq!(off.classify(Path::new("App.pdb")), FileCategory::Ignored);
        assert_eq!(
            on.classify(Path::new("App.pdb")),
            FileCategory::Auxiliary(AuxiliaryKind::Extension("pdb".into()))
        );
        assert_eq!(
            on.classify(Path::new("~$report.docx")),
            FileCategory::Auxiliary(AuxiliaryKind::Transient)
        );
        assert_eq!(on.classify(Path::new("readme.md")), FileCategory::Ignored);
    }

    #[test]
    fn test_module_rule_wins_over_auxiliary() {
        let c = Classifier::new(true);
        assert_eq!(c.classify(Path::new("~$Temp.dll")), FileCategory::Module);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let c = Classifier::new(true);
        for p in ["fr/App.resources.dll", "Core.dll", "App.xml", "data.bin"] {
            assert_eq!(c.classify(Path::new(p)), c.classify(Path::new(p)));
        }
    }
}
