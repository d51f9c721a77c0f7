//! Console rendering - plaintext and JSON.
//!
//! Renderers return strings so callers (and tests) decide where output goes.

use crate::analysis::AnalysisResult;
use crate::cleanup::CleanupSummary;
use crate::config::{OperationMode, Options};
use crate::size::format_size;

/// Unused modules listed in the analysis summary.
pub const SUMMARY_LIST_LIMIT: usize = 5;

/// Locale files listed in the preview.
pub const PREVIEW_LOCALE_LIMIT: usize = 10;

const RULE_WIDTH: usize = 50;

/// Line-oriented text builder shared by the renderers.
#[derive(Debug, Default)]
pub(crate) struct Text {
    buf: String,
}

impl Text {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends `text` followed by a newline.
    pub(crate) fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.buf.push_str(text.as_ref());
        self.buf.push('\n');
        self
    }

    pub(crate) fn blank(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    pub(crate) fn finish(self) -> String {
        self.buf
    }
}

fn rule(ch: char) -> String {
    std::iter::repeat(ch).take(RULE_WIDTH).collect()
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Echo of the resolved options, printed before analysis starts.
pub fn render_configuration(options: &Options) -> String {
    let mut out = Text::new();
    out.line("CONFIGURATION")
        .line(rule('-'))
        .line(format!("  Directory:  {}", options.scan_root.display()))
        .line(format!("  Entry:      {}", options.entry_hint))
        .line(format!(
            "  Scan:       {}",
            if options.recursive { "recursive" } else { "top level only" }
        ))
        .line(format!("  Mode:       {}", options.mode));
    if !options.whitelist.is_empty() {
        out.line(format!("  Whitelist:  {}", options.whitelist.entries().join(", ")));
    }
    if options.mode != OperationMode::AnalyzeOnly {
        out.line(format!("  Locale:     {}", yes_no(options.clean_locale)))
            .line(format!("  Auxiliary:  {}", yes_no(options.clean_auxiliary)));
    }
    out.finish()
}

/// Analysis summary: original state, savable content, projection.
pub fn render_summary(result: &AnalysisResult, options: &Options) -> String {
    let mut out = Text::new();
    out.line("ANALYSIS SUMMARY")
        .line(rule('-'))
        .line(format!("Entry: {}", file_name(&result.entry_file)))
        .blank()
        .line("Original state:")
        .line(format!("  - Total files:     {}", result.total_files))
        .line(format!("  - Total size:      {}", format_size(result.total_bytes)))
        .line(format!(
            "  - Modules:         {} ({})",
            result.module_count,
            format_size(result.module_bytes)
        ))
        .line(format!(
            "  - Locale files:    {} ({})",
            result.locale_count,
            format_size(result.locale_bytes)
        ))
        .line(format!("  - Referenced:      {}", result.used_count()));

    if options.verbose {
        for name in &result.unresolved {
            out.line(format!("  ! unresolved reference: {}", name));
        }
        for path in &result.unreadable {
            out.line(format!("  ! unreadable module: {}", path.display()));
        }
    }

    if !result.has_savings() {
        out.blank().line("No removable files found.").line(rule('='));
        return out.finish();
    }

    out.blank().line("Removable:");
    if !result.unused_modules.is_empty() {
        out.line(format!(
            "  - Unused modules:  {} ({})",
            result.unused_modules.len(),
            format_size(result.unused_bytes)
        ));
        if matches!(
            options.mode,
            OperationMode::AnalyzeOnly | OperationMode::PreviewCleanup
        ) {
            for module in result.unused_modules.iter().take(SUMMARY_LIST_LIMIT) {
                out.line(format!(
                    "      {} ({})",
                    module.name,
                    format_size(module.size_bytes)
                ));
            }
            if result.unused_modules.len() > SUMMARY_LIST_LIMIT {
                out.line(format!(
                    "      ... and {} more",
                    result.unused_modules.len() - SUMMARY_LIST_LIMIT
                ));
            }
        }
    }
    if !result.locale_files.is_empty() {
        out.line(format!(
            "  - Locale files:    {} ({})",
            result.locale_files.len(),
            format_size(result.locale_savable_bytes)
        ));
    }
    if !result.auxiliary_files.is_empty() {
        out.line(format!(
            "  - Auxiliary files: {} ({})",
            result.auxiliary_files.len(),
            format_size(result.auxiliary_bytes)
        ));
    }

    out.blank()
        .line("After cleanup:")
        .line(format!("  - Remaining files: {}", result.remaining_count()))
        .line(format!("  - Remaining size:  {}", format_size(result.remaining_bytes())))
        .line(format!("  - Reduction:       {:.1}%", result.reduction_percent()))
        .blank()
        .line(format!("Space to free: {}", format_size(result.total_savable_bytes)))
        .line(rule('='));
    out.finish()
}

/// Preview of every file delete mode would remove.
pub fn render_preview(result: &AnalysisResult) -> String {
    let mut out = Text::new();
    out.line("PREVIEW - files that would be removed").line(rule('-'));

    if !result.unused_modules.is_empty() {
        out.blank()
            .line(format!("Unused modules ({}):", result.unused_modules.len()));
        for module in &result.unused_modules {
            out.line(format!("  - {} ({})", module.relative, format_size(module.size_bytes)));
        }
    }

    if !result.locale_files.is_empty() {
        out.blank()
            .line(format!("Locale files ({}):", result.locale_files.len()));
        for file in result.locale_files.iter().take(PREVIEW_LOCALE_LIMIT) {
            out.line(format!("  - {} ({})", file.relative, format_size(file.size_bytes)));
        }
        if result.locale_files.len() > PREVIEW_LOCALE_LIMIT {
            out.line(format!(
                "  ... and {} more",
                result.locale_files.len() - PREVIEW_LOCALE_LIMIT
            ));
        }
    }

    if !result.auxiliary_files.is_empty() {
        out.blank()
            .line(format!("Auxiliary files ({}):", result.auxiliary_files.len()));
        for file in &result.auxiliary_files {
            out.line(format!(
                "  - {} [{}] ({})",
                file.relative,
                file.category,
                format_size(file.size_bytes)
            ));
        }
    }

    out.blank()
        .line(format!(
            "Total: {} files, {}",
            result.total_savable_count,
            format_size(result.total_savable_bytes)
        ))
        .line("Run without --preview to delete them.");
    out.finish()
}

/// Delete-run summary.
pub fn render_cleanup(summary: &CleanupSummary) -> String {
    let mut out = Text::new();
    out.line(rule('-'))
        .line("Cleanup complete:")
        .line(format!("  - Deleted:     {} files", summary.deleted_count()))
        .line(format!("  - Failed:      {} files", summary.failed_count()));
    for failure in &summary.failed {
        out.line(format!("      {}: {}", failure.path.display(), failure.message));
    }
    out.line(format!("  - Freed:       {}", format_size(summary.freed_bytes)));
    if !summary.dirs_pruned.is_empty() {
        out.line(format!("  - Empty dirs:  {} removed", summary.dirs_pruned.len()));
    }
    out.finish()
}

/// Pretty JSON of the whole analysis.
///
/// Falls back to a minimal object if serialization fails.
pub fn render_json(result: &AnalysisResult) -> String {
    match serde_json::to_string_pretty(result) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(error = %e, "JSON serialization failed");
            format!(
                "{{\"total_savable_count\": {}, \"total_savable_bytes\": {}}}",
                result.total_savable_count, result.total_savable_bytes
            )
        }
    }
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
