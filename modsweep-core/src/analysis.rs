//! Directory analysis: scan, closure walk, classification and savings totals.
//!
//! ```rust,ignore
//! use modsweep_core::prelude::*;
//!
//! let options = Options::new("./publish").entry("App").recursive(true);
//! let result = analyze_directory(&options, &DotnetReader)?;
//! println!("{} unused modules", result.unused_modules.len());
//! ```

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::classify::Classifier;
use crate::closure::{Closure, ClosureWalker, UsedSet};
use crate::config::Options;
use crate::detect::{is_unused, Exclusions};
use crate::error::{SweepError, SweepResult};
use crate::metadata::MetadataReader;
use crate::model::{AuxiliaryFile, FileCategory, ModuleFile, ModuleKind, ModuleName};
use crate::scan::{find_entry_file, gather_files, ModuleIndex, ScannedFile};

/// Result of analyzing one scan root. Built once per run, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub scan_root: PathBuf,
    pub entry_file: PathBuf,

    /// Every regular file in the listing, whatever its category
    pub total_files: usize,
    pub total_bytes: u64,

    /// Regular (non-satellite) modules
    pub module_count: usize,
    pub module_bytes: u64,

    /// Locale satellites, whether or not locale cleanup is enabled
    pub locale_count: usize,
    pub locale_bytes: u64,

    /// Names reachable from the entry module
    pub used_modules: UsedSet,

    pub unused_modules: Vec<ModuleFile>,
    pub unused_bytes: u64,

    /// Satellites selected for cleanup (empty unless locale cleanup is on)
    pub locale_files: Vec<ModuleFile>,
    pub locale_savable_bytes: u64,

    /// Auxiliary files (empty unless auxiliary cleanup is on)
    pub auxiliary_files: Vec<AuxiliaryFile>,
    pub auxiliary_bytes: u64,

    pub total_savable_bytes: u64,
    pub total_savable_count: usize,
    /// `total_savable_bytes / total_bytes`, absent for an empty directory
    pub reduction_ratio: Option<f64>,

    pub unreadable: Vec<PathBuf>,
    pub unresolved: Vec<String>,
}

impl AnalysisResult {
    pub fn used_count(&self) -> usize {
        self.used_modules.len()
    }

    pub fn has_savings(&self) -> bool {
        self.total_savable_count > 0
    }

    pub fn remaining_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.total_savable_bytes)
    }

    pub fn remaining_count(&self) -> usize {
        self.total_files.saturating_sub(self.total_savable_count)
    }

    /// Reduction ratio as a percentage, 0 for an empty directory.
    pub fn reduction_percent(&self) -> f64 {
        self.reduction_ratio.map(|r| r * 100.0).unwrap_or(0.0)
    }

    /// Every savable file in deletion order: unused modules, locale
    /// satellites, auxiliary files.
    pub fn savable_paths(&self) -> Vec<PathBuf> {
        self.unused_modules
            .iter()
            .map(|m| m.path.clone())
            .chain(self.locale_files.iter().map(|m| m.path.clone()))
            .chain(self.auxiliary_files.iter().map(|a| a.path.clone()))
            .collect()
    }
}

fn ratio(part: u64, whole: u64) -> Option<f64> {
    (whole > 0).then(|| part as f64 / whole as f64)
}

fn module_file(file: &ScannedFile, name: ModuleName, kind: ModuleKind) -> ModuleFile {
    ModuleFile {
        name,
        path: file.path.clone(),
        relative: file.relative.clone(),
        size_bytes: file.size_bytes,
        kind,
    }
}

/// Folds classified files and a closure into an [`AnalysisResult`].
///
/// Pure: no I/O, and the outcome does not depend on the order of `files`.
pub fn aggregate(
    options: &Options,
    scan_root: &Path,
    entry_file: &Path,
    files: &[ScannedFile],
    closure: &Closure,
) -> AnalysisResult {
    let classifier = Classifier::new(options.clean_auxiliary);
    let entry_name = ModuleName::from_path(entry_file).unwrap_or_else(|| ModuleName::new(""));
    let exclusions = Exclusions {
        used: &closure.used,
        entry: &entry_name,
        whitelist: &options.whitelist,
        system: &options.system_prefixes,
    };

    let mut module_count = 0usize;
    let mut module_bytes = 0u64;
    let mut locale_count = 0usize;
    let mut locale_bytes = 0u64;
    let mut unused_modules = Vec::new();
    let mut locale_files = Vec::new();
    let mut auxiliary_files = Vec::new();

    for file in files {
        let category = classifier.classify(Path::new(&file.relative));
        let name = ModuleName::from_path(&file.path);

        match (category, name) {
            (FileCategory::Module, Some(name)) => {
                module_count += 1;
                module_bytes += file.size_bytes;
                if is_unused(&name, &exclusions) {
                    unused_modules.push(module_file(file, name, ModuleKind::Regular));
                }
            }
            (FileCategory::LocaleSatellite, Some(name)) => {
                locale_count += 1;
                locale_bytes += file.size_bytes;
                if options.clean_locale && !options.whitelist.matches(name.as_str()) {
                    locale_files.push(module_file(file, name, ModuleKind::LocaleSatellite));
                }
            }
            (FileCategory::Auxiliary(category), _) => auxiliary_files.push(AuxiliaryFile {
                path: file.path.clone(),
                relative: file.relative.clone(),
                size_bytes: file.size_bytes,
                category,
            }),
            _ => {}
        }
    }

    unused_modules.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.relative.cmp(&b.relative)));
    locale_files.sort_by(|a, b| file_name_key(a).cmp(&file_name_key(b)).then_with(|| a.relative.cmp(&b.relative)));
    auxiliary_files.sort_by(|a, b| a.relative.cmp(&b.relative));

    let total_files = files.len();
    let total_bytes: u64 = files.iter().map(|f| f.size_bytes).sum();
    let unused_bytes: u64 = unused_modules.iter().map(|m| m.size_bytes).sum();
    let locale_savable_bytes: u64 = locale_files.iter().map(|m| m.size_bytes).sum();
    let auxiliary_bytes: u64 = auxiliary_files.iter().map(|a| a.size_bytes).sum();
    let total_savable_bytes = unused_bytes + locale_savable_bytes + auxiliary_bytes;
    let total_savable_count = unused_modules.len() + locale_files.len() + auxiliary_files.len();

    let mut unreadable = closure.unreadable.clone();
    unreadable.sort();

    AnalysisResult {
        scan_root: scan_root.to_path_buf(),
        entry_file: entry_file.to_path_buf(),
        total_files,
        total_bytes,
        module_count,
        module_bytes,
        locale_count,
        locale_bytes,
        used_modules: closure.used.clone(),
        unused_modules,
        unused_bytes,
        locale_files,
        locale_savable_bytes,
        auxiliary_files,
        auxiliary_bytes,
        total_savable_bytes,
        total_savable_count,
        reduction_ratio: ratio(total_savable_bytes, total_bytes),
        unreadable,
        unresolved: closure.unresolved.iter().map(|n| n.to_string()).collect(),
    }
}

fn file_name_key(file: &ModuleFile) -> String {
    file.path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Makes a relative scan root absolute against the working directory.
fn absolute_root(root: &Path) -> SweepResult<PathBuf> {
    if root.is_absolute() {
        return Ok(root.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| SweepError::io(root, e))?;
    Ok(cwd.join(root))
}

/// Runs the full analysis for `options`.
///
/// Fails only on fatal conditions (missing directory, unresolvable entry);
/// unreadable modules are recorded in the result.
pub fn analyze_directory<R: MetadataReader + ?Sized>(
    options: &Options,
    reader: &R,
) -> SweepResult<AnalysisResult> {
    let root = absolute_root(&options.scan_root)?;
    if !root.is_dir() {
        return Err(SweepError::DirectoryNotFound { path: root });
    }

    let entry = find_entry_file(&root, &options.entry_hint)?;
    info!(root = %root.display(), entry = %entry.display(), "analyzing directory");

    let files = gather_files(&root, options.recursive)?;
    let index = ModuleIndex::from_files(&files);
    let closure = ClosureWalker::new(reader, &index).walk(&entry);

    let result = aggregate(options, &root, &entry, &files, &closure);
    info!(
        total_files = result.total_files,
        unused = result.unused_modules.len(),
        locale = result.locale_files.len(),
        auxiliary = result.auxiliary_files.len(),
        savable_bytes = result.total_savable_bytes,
        "analysis complete"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanned(relative: &str, size: u64) -> ScannedFile {
        ScannedFile {
            path: PathBuf::from(format!("/publish/{}", relative)),
            relative: relative.to_string(),
            size_bytes: size,
        }
    }

    fn closure_with(names: &[&str]) -> Closure {
        Closure {
            used: names.iter().map(|n| ModuleName::new(*n)).collect(),
            ..Default::default()
        }
    }

    fn listing() -> Vec<ScannedFile> {
        vec![
            scanned("App.exe", 100),
            scanned("App.pdb", 7),
            scanned("Core.dll", 50),
            scanned("Unused.dll", 30),
            scanned("fr-FR/App.resources.dll", 20),
        ]
    }

    #[test]
    fn test_aggregate_basic_counts() {
        let opts = Options::new("/publish");
        let result = aggregate(
            &opts,
            Path::new("/publish"),
            Path::new("/publish/App.exe"),
            &listing(),
            &closure_with(&["App", "Core"]),
        );

        assert_eq!(result.total_files, 5);
        assert_eq!(result.total_bytes, 207);
        assert_eq!(result.module_count, 3);
        assert_eq!(result.module_bytes, 180);
        assert_eq!(result.locale_count, 1);
        assert_eq!(result.locale_bytes, 20);
        assert_eq!(result.unused_modules.len(), 1);
        assert_eq!(result.unused_modules[0].name.as_str(), "Unused");
        assert!(result.locale_files.is_empty());
        assert!(result.auxiliary_files.is_empty());
        assert_eq!(result.total_savable_count, 1);
        assert_eq!(result.total_savable_bytes, 30);
    }

    #[test]
    fn test_aggregate_with_locale_and_auxiliary() {
        let opts = Options::new("/publish").clean_locale(true).clean_auxiliary(true);
        let result = aggregate(
            &opts,
            Path::new("/publish"),
            Path::new("/publish/App.exe"),
            &listing(),
            &closure_with(&["App", "Core"]),
        );

        assert_eq!(result.total_savable_count, 3);
        assert_eq!(
            result.total_savable_bytes,
            result.unused_bytes + result.locale_savable_bytes + result.auxiliary_bytes
        );
        assert_eq!(result.total_savable_bytes, 57);
        assert_eq!(result.remaining_bytes(), 150);
        assert_eq!(result.remaining_count(), 2);
        assert_eq!(
            result.savable_paths(),
            vec![
                PathBuf::from("/publish/Unused.dll"),
                PathBuf::from("/publish/fr-FR/App.resources.dll"),
                PathBuf::from("/publish/App.pdb"),
            ]
        );
    }

    #[test]
    fn test_whitelist_filters_locale_files() {
        let opts = Options::new("/publish").clean_locale(true).whitelist(["App"]);
        let result = aggregate(
            &opts,
            Path::new("/publish"),
            Path::new("/publish/App.exe"),
            &listing(),
            &closure_with(&["App", "Core"]),
        );
        assert!(result.locale_files.is_empty());
        assert_eq!(result.locale_count, 1);
    }

    #[test]
    fn test_empty_listing_has_no_ratio() {
        let opts = Options::new("/publish");
        let result = aggregate(
            &opts,
            Path::new("/publish"),
            Path::new("/publish/App.exe"),
            &[],
            &Closure::default(),
        );
        assert_eq!(result.total_files, 0);
        assert!(result.reduction_ratio.is_none());
        assert_eq!(result.reduction_percent(), 0.0);
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let opts = Options::new("/publish").clean_locale(true).clean_auxiliary(true);
        let mut reversed = listing();
        reversed.reverse();
        let closure = closure_with(&["App"]);

        let a = aggregate(&opts, Path::new("/publish"), Path::new("/publish/App.exe"), &listing(), &closure);
        let b = aggregate(&opts, Path::new("/publish"), Path::new("/publish/App.exe"), &reversed, &closure);

        assert_eq!(a.total_savable_bytes, b.total_savable_bytes);
        assert_eq!(a.savable_paths(), b.savable_paths());
    }

    #[test]
    fn test_ratio() {
        assert_eq!(ratio(0, 0), None);
        assert_eq!(ratio(25, 100), Some(0.25));
    }
}
