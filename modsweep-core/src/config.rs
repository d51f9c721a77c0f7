//! Run configuration: resolved [`Options`] plus optional `modsweep.toml`.
//!
//! Options are resolved once (flags, then prompts, then the config file) and
//! are read-only for the rest of the run.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::{fs, path::Path, path::PathBuf};

use crate::detect::{SystemPrefixes, Whitelist};
use crate::scan::AUTO_ENTRY;

/// Name of the optional per-directory config file.
pub const CONFIG_FILE: &str = "modsweep.toml";

/// What a run does with its analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationMode {
    /// Ask the user which terminal mode to run
    #[default]
    Interactive,
    AnalyzeOnly,
    PreviewCleanup,
    DeleteFiles,
    GenerateReport,
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interactive => write!(f, "interactive"),
            Self::AnalyzeOnly => write!(f, "analyze only"),
            Self::PreviewCleanup => write!(f, "preview cleanup"),
            Self::DeleteFiles => write!(f, "delete files"),
            Self::GenerateReport => write!(f, "generate report"),
        }
    }
}

/// Mode-selecting command line flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModeFlags {
    pub analyze: bool,
    pub preview: bool,
    pub report: bool,
}

/// Resolves the initial mode from flags.
///
/// No arguments at all means interactive; arguments without a mode flag
/// mean delete.
pub fn resolve_mode(flags: ModeFlags, has_args: bool) -> OperationMode {
    if !has_args {
        OperationMode::Interactive
    } else if flags.analyze {
        OperationMode::AnalyzeOnly
    } else if flags.preview {
        OperationMode::PreviewCleanup
    } else if flags.report {
        OperationMode::GenerateReport
    } else {
        OperationMode::DeleteFiles
    }
}

/// Splits a comma or semicolon separated list, dropping blanks.
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(|c: char| c == ',' || c == ';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Resolved run options.
#[derive(Debug, Clone)]
pub struct Options {
    pub scan_root: PathBuf,
    /// File name, base name, or `*` for auto-detection
    pub entry_hint: String,
    pub whitelist: Whitelist,
    pub system_prefixes: SystemPrefixes,
    pub recursive: bool,
    pub clean_locale: bool,
    pub clean_auxiliary: bool,
    pub mode: OperationMode,
    pub verbose: bool,
    /// Print the analysis as JSON instead of text
    pub json: bool,
    /// Skip the delete confirmation prompt
    pub assume_yes: bool,
}

impl Options {
    pub fn new(scan_root: impl Into<PathBuf>) -> Self {
        Self {
            scan_root: scan_root.into(),
            entry_hint: AUTO_ENTRY.to_string(),
            whitelist: Whitelist::default(),
            system_prefixes: SystemPrefixes::default(),
            recursive: false,
            clean_locale: false,
            clean_auxiliary: false,
            mode: OperationMode::Interactive,
            verbose: false,
            json: false,
            assume_yes: false,
        }
    }

    pub fn entry(mut self, hint: impl Into<String>) -> Self {
        let hint = hint.into();
        self.entry_hint = if hint.trim().is_empty() {
            AUTO_ENTRY.to_string()
        } else {
            hint
        };
        self
    }

    pub fn whitelist(mut self, entries: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.whitelist = Whitelist::new(entries);
        self
    }

    pub fn recursive(mut self, enabled: bool) -> Self {
        self.recursive = enabled;
        self
    }

    pub fn clean_locale(mut self, enabled: bool) -> Self {
        self.clean_locale = enabled;
        self
    }

    pub fn clean_auxiliary(mut self, enabled: bool) -> Self {
        self.clean_auxiliary = enabled;
        self
    }

    pub fn mode(mut self, mode: OperationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }

    pub fn json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }

    pub fn assume_yes(mut self, enabled: bool) -> Self {
        self.assume_yes = enabled;
        self
    }

    /// Merges a config file: whitelist and system prefixes are extended,
    /// `format = "json"` turns on JSON output.
    pub fn with_config(mut self, cfg: &SweepConfig) -> Self {
        if let Some(list) = &cfg.whitelist {
            let mut merged: Vec<String> = self.whitelist.entries().to_vec();
            merged.extend(list.iter().cloned());
            self.whitelist = Whitelist::new(merged);
        }
        if let Some(prefixes) = &cfg.system_prefixes {
            self.system_prefixes = SystemPrefixes::with_extra(prefixes.iter().cloned());
        }
        if cfg
            .output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
        {
            self.json = true;
        }
        self
    }
}

/// Contents of `modsweep.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct SweepConfig {
    /// Module names exempt from cleanup.
    pub whitelist: Option<Vec<String>>,
    /// Extra name prefixes treated as platform assemblies.
    pub system_prefixes: Option<Vec<String>>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
}

/// Loads configuration from `modsweep.toml` in `root` if it exists.
pub fn load_config(root: &Path) -> Result<Option<SweepConfig>> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let cfg = toml::from_str(&content).context("Invalid modsweep.toml")?;
    Ok(Some(cfg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_mode_no_args_is_interactive() {
        assert_eq!(resolve_mode(ModeFlags::default(), false), OperationMode::Interactive);
    }

    #[test]
    fn test_resolve_mode_args_without_mode_is_delete() {
        assert_eq!(resolve_mode(ModeFlags::default(), true), OperationMode::DeleteFiles);
    }

    #[test]
    fn test_resolve_mode_flags() {
        let analyze = ModeFlags { analyze: true, ..Default::default() };
        let preview = ModeFlags { preview: true, ..Default::default() };
        let report = ModeFlags { report: true, ..Default::default() };
        assert_eq!(resolve_mode(analyze, true), OperationMode::AnalyzeOnly);
        assert_eq!(resolve_mode(preview, true), OperationMode::PreviewCleanup);
        assert_eq!(resolve_mode(report, true), OperationMode::GenerateReport);
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list("A, B;C,,  "), vec!["A", "B", "C"]);
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_options_blank_entry_means_auto() {
        let opts = Options::new("/publish").entry("  ");
        assert_eq!(opts.entry_hint, AUTO_ENTRY);
    }

    #[test]
    fn test_with_config_merges() {
        let cfg: SweepConfig = toml::from_str(
            "whitelist = [\"Plugin\"]\nsystem_prefixes = [\"Acme.\"]\n[output]\nformat = \"json\"\n",
        )
        .unwrap();

        let opts = Options::new("/publish").whitelist(["Keep"]).with_config(&cfg);
        assert!(opts.whitelist.matches("Keep"));
        assert!(opts.whitelist.matches("plugin.extra"));
        assert!(opts.system_prefixes.matches(&crate::model::ModuleName::new("Acme.Core")));
        assert!(opts.json);
    }

    #[test]
    fn test_load_config_missing_is_none() {
        let dir = std::env::temp_dir().join(format!("modsweep_cfg_none_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        assert!(load_config(&dir).unwrap().is_none());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_config_invalid_is_error() {
        let dir = std::env::temp_dir().join(format!("modsweep_cfg_bad_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE), "whitelist = 42").unwrap();
        assert!(load_config(&dir).is_err());
        fs::remove_dir_all(&dir).ok();
    }
}
