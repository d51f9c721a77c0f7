//! Deterministic file discovery under the scan root.
//!
//! - Top-level only unless recursive
//! - Regular files only: symlinks are neither followed nor listed
//! - Listing sorted by full path, so the first match for a module name is
//!   stable across runs and platforms

use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::classify::is_locale_path;
use crate::error::{SweepError, SweepResult};
use crate::model::ModuleName;

/// Module file extensions, in the order they are tried during resolution.
pub const MODULE_EXTENSIONS: &[&str] = &["dll", "exe"];

/// Entry hint meaning "detect the entry module automatically".
pub const AUTO_ENTRY: &str = "*";

/// A regular file found under the scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub path: PathBuf,
    /// Path relative to the scan root, forward slashes
    pub relative: String,
    pub size_bytes: u64,
}

/// Lowercased extension of a path, if any.
pub fn extension_lower(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Index into [`MODULE_EXTENSIONS`] if the path has a module extension.
pub fn module_extension_index(path: &Path) -> Option<usize> {
    let ext = extension_lower(path)?;
    MODULE_EXTENSIONS.iter().position(|m| *m == ext)
}

pub fn is_module_file(path: &Path) -> bool {
    module_extension_index(path).is_some()
}

/// Path of `path` relative to `root` with forward slashes.
///
/// Falls back to the full path when `path` is not under `root`.
pub fn relative_display(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

/// Gathers every regular file under `root`, sorted by full path.
///
/// Unreadable directory entries are logged and skipped.
pub fn gather_files(root: &Path, recursive: bool) -> SweepResult<Vec<ScannedFile>> {
    if !root.is_dir() {
        return Err(SweepError::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut walker = WalkDir::new(root).min_depth(1).follow_links(false);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files: Vec<ScannedFile> = walker
        .into_iter()
        .par_bridge()
        .filter_map(|entry| match entry {
            Ok(e) if e.file_type().is_file() => match e.metadata() {
                Ok(meta) => Some(ScannedFile {
                    relative: relative_display(root, e.path()),
                    path: e.into_path(),
                    size_bytes: meta.len(),
                }),
                Err(err) => {
                    warn!(path = %e.path().display(), error = %err, "cannot stat file, skipping");
                    None
                }
            },
            Ok(_) => None,
            Err(err) => {
                warn!(error = %err, "cannot read directory entry, skipping");
                None
            }
        })
        .collect();

    files.sort_by(|a, b| a.path.cmp(&b.path));
    debug!(root = %root.display(), count = files.len(), recursive, "scan complete");
    Ok(files)
}

/// Resolves referenced module names to files under the scan root.
///
/// For each name, extensions are tried in [`MODULE_EXTENSIONS`] order and
/// the first file in the sorted listing wins.
#[derive(Debug, Default, Clone)]
pub struct ModuleIndex {
    by_name: HashMap<ModuleName, Vec<Option<PathBuf>>>,
}

impl ModuleIndex {
    /// Builds the index from a listing already sorted by path.
    pub fn from_files(files: &[ScannedFile]) -> Self {
        let mut by_name: HashMap<ModuleName, Vec<Option<PathBuf>>> = HashMap::new();

        for file in files {
            let Some(ext_idx) = module_extension_index(&file.path) else {
                continue;
            };
            let Some(name) = ModuleName::from_path(&file.path) else {
                continue;
            };
            let slots = by_name
                .entry(name)
                .or_insert_with(|| vec![None; MODULE_EXTENSIONS.len()]);
            if slots[ext_idx].is_none() {
                slots[ext_idx] = Some(file.path.clone());
            }
        }

        Self { by_name }
    }

    /// Gathers the listing and builds the index in one step.
    pub fn build(root: &Path, recursive: bool) -> SweepResult<Self> {
        Ok(Self::from_files(&gather_files(root, recursive)?))
    }

    pub fn resolve(&self, name: &ModuleName) -> Option<&Path> {
        self.by_name
            .get(name)?
            .iter()
            .flatten()
            .next()
            .map(PathBuf::as_path)
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Finds the entry module in the top level of `dir`.
///
/// With [`AUTO_ENTRY`] (or an empty hint): the first `.exe` in sorted order,
/// else the first `.dll` that is neither a locale satellite nor a test
/// assembly. Otherwise `dir/hint`, trying `.exe` then `.dll` when the
/// hint carries no extension.
pub fn find_entry_file(dir: &Path, hint: &str) -> SweepResult<PathBuf> {
    let hint = hint.trim();
    let not_found = || SweepError::EntryNotFound {
        hint: hint.to_string(),
        dir: dir.to_path_buf(),
    };

    if hint.is_empty() || hint == AUTO_ENTRY {
        let top = gather_files(dir, false)?;
        let has_ext = |f: &&ScannedFile, ext: &str| extension_lower(&f.path).as_deref() == Some(ext);

        if let Some(exe) = top.iter().find(|f| has_ext(f, "exe")) {
            return Ok(exe.path.clone());
        }

        return top
            .iter()
            .filter(|f| has_ext(f, "dll"))
            .filter(|f| !is_locale_path(Path::new(&f.relative)))
            .find(|f| !f.relative.to_lowercase().contains("test"))
            .map(|f| f.path.clone())
            .ok_or_else(not_found);
    }

    let direct = dir.join(hint);
    if direct.is_file() {
        return Ok(direct);
    }

    if Path::new(hint).extension().is_none() {
        for ext in ["exe", "dll"] {
            let candidate = dir.join(format!("{}.{}", hint, ext));
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }

    Err(not_found())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_temp_dir(name: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir()
            .join("modsweep_scan_test")
            .join(format!("{}_{}_{}", name, std::process::id(), id));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn touch(path: &Path, bytes: usize) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, vec![0u8; bytes]).unwrap();
    }

    #[test]
    fn test_gather_files_top_level_only() {
        let dir = create_temp_dir("top_level");
        touch(&dir.join("App.exe"), 10);
        touch(&dir.join("sub/Deep.dll"), 5);

        let files = gather_files(&dir, false).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative, "App.exe");
        assert_eq!(files[0].size_bytes, 10);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_gather_files_recursive_sorted() {
        let dir = create_temp_dir("recursive");
        touch(&dir.join("b.dll"), 1);
        touch(&dir.join("a.dll"), 1);
        touch(&dir.join("sub/c.dll"), 1);

        let files = gather_files(&dir, true).unwrap();
        let rel: Vec<&str> = files.iter().map(|f| f.relative.as_str()).collect();
        assert_eq!(rel, vec!["a.dll", "b.dll", "sub/c.dll"]);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_gather_files_missing_dir() {
        let dir = create_temp_dir("missing").join("nope");
        let err = gather_files(&dir, false).unwrap_err();
        assert!(matches!(err, SweepError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_module_index_prefers_dll_then_first_path() {
        let dir = create_temp_dir("index");
        touch(&dir.join("Core.exe"), 1);
        touch(&dir.join("a/Core.dll"), 1);
        touch(&dir.join("b/Core.dll"), 1);

        let index = ModuleIndex::build(&dir, true).unwrap();
        let resolved = index.resolve(&ModuleName::new("core")).unwrap();
        assert_eq!(resolved, dir.join("a/Core.dll"));
        assert!(index.resolve(&ModuleName::new("Missing")).is_none());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_module_index_ignores_non_modules() {
        let dir = create_temp_dir("index_non_mod");
        touch(&dir.join("Core.pdb"), 1);

        let index = ModuleIndex::build(&dir, false).unwrap();
        assert!(index.is_empty());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_find_entry_auto_single_exe() {
        let dir = create_temp_dir("entry_auto");
        touch(&dir.join("App.exe"), 1);
        touch(&dir.join("Core.dll"), 1);

        assert_eq!(find_entry_file(&dir, "*").unwrap(), dir.join("App.exe"));
        assert_eq!(find_entry_file(&dir, "").unwrap(), dir.join("App.exe"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_find_entry_auto_dll_skips_tests_and_resources() {
        let dir = create_temp_dir("entry_auto_dll");
        touch(&dir.join("App.Tests.dll"), 1);
        touch(&dir.join("App.resources.dll"), 1);
        touch(&dir.join("Service.dll"), 1);

        assert_eq!(find_entry_file(&dir, "*").unwrap(), dir.join("Service.dll"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_find_entry_by_name_without_extension() {
        let dir = create_temp_dir("entry_named");
        touch(&dir.join("Tool.dll"), 1);

        assert_eq!(find_entry_file(&dir, "Tool").unwrap(), dir.join("Tool.dll"));
        assert_eq!(find_entry_file(&dir, "Tool.dll").unwrap(), dir.join("Tool.dll"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_find_entry_missing() {
        let dir = create_temp_dir("entry_missing");
        touch(&dir.join("notes.txt"), 1);

        assert!(matches!(
            find_entry_file(&dir, "App"),
            Err(SweepError::EntryNotFound { .. })
        ));
        assert!(matches!(
            find_entry_file(&dir, "*"),
            Err(SweepError::EntryNotFound { .. })
        ));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_relative_display() {
        let root = Path::new("/publish");
        assert_eq!(relative_display(root, Path::new("/publish/fr-FR/App.resources.dll")), "fr-FR/App.resources.dll");
        assert_eq!(relative_display(root, Path::new("/other/x.dll")), "/other/x.dll");
    }
}
