//! Cleanup report: a flat text document under `<root>/CleanupReports/`.
//!
//! Section order is fixed: header, summary, unused modules, locale files,
//! auxiliary files, projection. Given the same analysis and timestamp the
//! output is byte-identical.

use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::analysis::AnalysisResult;
use crate::display::Text;
use crate::error::{IoResultExt, SweepResult};
use crate::size::format_size;

/// Report directory name under the scan root.
pub const REPORT_DIR: &str = "CleanupReports";

const RULE: &str = "--------------------------------------------------";

/// Path of the report written at `generated_at`.
pub fn report_path(scan_root: &Path, generated_at: NaiveDateTime) -> PathBuf {
    scan_root.join(REPORT_DIR).join(format!(
        "cleanup-report-{}.txt",
        generated_at.format("%Y%m%d-%H%M%S")
    ))
}

/// Renders the report text.
pub fn render_report(result: &AnalysisResult, generated_at: NaiveDateTime) -> String {
    let entry = result
        .entry_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut out = Text::new();
    out.line("==================== MODULE CLEANUP REPORT ====================")
        .line(format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S")))
        .line(format!("Directory: {}", result.scan_root.display()))
        .line(format!("Entry:     {}", entry))
        .blank();

    out.line("SUMMARY")
        .line(RULE)
        .line(format!("Total files:        {}", result.total_files))
        .line(format!("Total size:         {}", format_size(result.total_bytes)))
        .line(format!("Module files:       {}", result.module_count))
        .line(format!("Locale files:       {}", result.locale_count))
        .line(format!("Referenced modules: {}", result.used_count()))
        .blank();

    out.line("REMOVABLE CONTENT").line(RULE);

    if !result.unused_modules.is_empty() {
        out.line(format!(
            "Unused modules ({}, {}):",
            result.unused_modules.len(),
            format_size(result.unused_bytes)
        ));
        for module in &result.unused_modules {
            out.line(format!("  - {} ({})", module.relative, format_size(module.size_bytes)));
        }
        out.blank();
    }

    if !result.locale_files.is_empty() {
        out.line(format!(
            "Locale files ({}, {}):",
            result.locale_files.len(),
            format_size(result.locale_savable_bytes)
        ));
        for file in &result.locale_files {
            out.line(format!("  - {} ({})", file.relative, format_size(file.size_bytes)));
        }
        out.blank();
    }

    if !result.auxiliary_files.is_empty() {
        out.line(format!(
            "Auxiliary files ({}, {}):",
            result.auxiliary_files.len(),
            format_size(result.auxiliary_bytes)
        ));
        for file in &result.auxiliary_files {
            out.line(format!("  - {} ({})", file.relative, format_size(file.size_bytes)));
        }
        out.blank();
    }

    if !result.has_savings() {
        out.line("(none)").blank();
    }

    out.line("PROJECTION")
        .line(RULE)
        .line(format!("Removable files:    {}", result.total_savable_count))
        .line(format!("Space to free:      {}", format_size(result.total_savable_bytes)))
        .line(format!("Reduction:          {:.1}%", result.reduction_percent()))
        .line(format!("Remaining size:     {}", format_size(result.remaining_bytes())));
    out.finish()
}

/// Writes the report under the scan root and returns its path.
pub fn write_report(result: &AnalysisResult, generated_at: NaiveDateTime) -> SweepResult<PathBuf> {
    let path = report_path(&result.scan_root, generated_at);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_path(dir)?;
    }
    fs::write(&path, render_report(result, generated_at)).with_path(&path)?;
    info!(path = %path.display(), "report written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregate;
    use crate::closure::Closure;
    use crate::config::Options;
    use crate::model::ModuleName;
    use crate::scan::ScannedFile;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap()
    }

    fn sample(root: &Path) -> AnalysisResult {
        let files: Vec<ScannedFile> = [
            ("App.exe", 100),
            ("Zeta.dll", 30),
            ("Alpha.dll", 20),
            ("fr-FR/App.resources.dll", 10),
        ]
        .iter()
        .map(|(rel, size)| ScannedFile {
            path: root.join(rel),
            relative: rel.to_string(),
            size_bytes: *size,
        })
        .collect();
        let closure = Closure {
            used: std::iter::once(ModuleName::new("App")).collect(),
            ..Default::default()
        };
        let opts = Options::new(root).clean_locale(true);
        aggregate(&opts, root, &root.join("App.exe"), &files, &closure)
    }

    #[test]
    fn test_report_path_format() {
        let path = report_path(Path::new("/publish"), timestamp());
        assert_eq!(
            path,
            PathBuf::from("/publish/CleanupReports/cleanup-report-20240309-140507.txt")
        );
    }

    #[test]
    fn test_report_section_order() {
        let text = render_report(&sample(Path::new("/publish")), timestamp());
        assert!(text.contains("Generated: 2024-03-09 14:05:07"));
        assert!(text.contains("Entry:     App.exe"));

        let summary = text.find("SUMMARY").unwrap();
        let unused = text.find("Unused modules (2").unwrap();
        let locale = text.find("Locale files (1").unwrap();
        let projection = text.find("PROJECTION").unwrap();
        assert!(summary < unused && unused < locale && locale < projection);

        // sorted by name
        assert!(text.find("Alpha.dll").unwrap() < text.find("Zeta.dll").unwrap());
    }

    #[test]
    fn test_report_without_savings_has_none_section() {
        let root = Path::new("/publish");
        let files = vec![ScannedFile {
            path: root.join("App.exe"),
            relative: "App.exe".to_string(),
            size_bytes: 100,
        }];
        let closure = Closure {
            used: std::iter::once(ModuleName::new("App")).collect(),
            ..Default::default()
        };
        let result = aggregate(&Options::new(root), root, &root.join("App.exe"), &files, &closure);

        let text = render_report(&result, timestamp());
        assert!(text.contains(&format!("REMOVABLE CONTENT\n{}\n(none)\n\nPROJECTION\n", RULE)));
        assert!(text.ends_with("Remaining size:     100 B\n"));
    }

    #[test]
    fn test_report_is_deterministic() {
        let result = sample(Path::new("/publish"));
        assert_eq!(render_report(&result, timestamp()), render_report(&result, timestamp()));
    }

    #[test]
    fn test_write_report_creates_directory() {
        let root = std::env::temp_dir().join(format!("modsweep_report_{}", std::process::id()));
        fs::remove_dir_all(&root).ok();
        fs::create_dir_all(&root).unwrap();

        let path = write_report(&sample(&root), timestamp()).unwrap();
        assert!(path.starts_with(root.join(REPORT_DIR)));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("PROJECTION"));

        fs::remove_dir_all(&root).ok();
    }
}
