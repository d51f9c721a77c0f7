//! modsweep-core: dependency-closure analysis and cleanup of unused assemblies
//!
//! Given a publish directory and an entry module, this library computes which
//! modules the entry can actually load, classifies every file in the
//! directory, and reports or removes what is left over.
//!
//! # Features
//!
//! - **Closure walk**: breadth-first over references read lazily from module
//!   metadata, one parallel batch per level
//! - **Classification**: regular modules, locale satellites, auxiliary files
//! - **Safety exclusions**: whitelist and built-in system prefixes
//! - **Cleanup**: best-effort batch delete with failure accounting
//! - **Reports**: deterministic text report under `CleanupReports/`
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use modsweep_core::prelude::*;
//!
//! let options = Options::new("./publish").clean_locale(true);
//! let result = analyze_directory(&options, &DotnetReader)?;
//!
//! for module in &result.unused_modules {
//!     println!("Unused: {}", module.name);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`scan`]: file enumeration, module index, entry resolution
//! - [`metadata`]: the metadata reader seam
//! - [`closure`]: dependency closure walker
//! - [`classify`]: file classification heuristics
//! - [`detect`]: unused-module detection
//! - [`analysis`]: aggregation into an [`AnalysisResult`]
//! - [`cleanup`]: deletion and empty directory pruning
//! - [`report`]: report generation
//! - [`mode`]: operation mode dispatch
//! - [`error`]: typed error handling
//!
//! # Cargo Features
//!
//! - `dotnet` (default): read .NET PE metadata through `dotscope`

pub mod analysis;
pub mod classify;
pub mod cleanup;
pub mod closure;
pub mod config;
pub mod detect;
pub mod display;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod mode;
pub mod model;
pub mod prelude;
pub mod report;
pub mod scan;
pub mod size;

// ============================================================================
// Explicit Re-exports
// ============================================================================

// Error types
pub use error::{IoResultExt, SweepError, SweepResult};

// Analysis
pub use analysis::{aggregate, analyze_directory, AnalysisResult};

// Classification and detection
pub use classify::{auxiliary_kind, is_culture_name, is_locale_path, Classifier};
pub use detect::{is_unused, Exclusions, SystemPrefixes, Whitelist, SYSTEM_PREFIXES};

// Closure
pub use closure::{Closure, ClosureWalker, UsedSet};

// Cleanup
pub use cleanup::{
    execute, execute_cleanup, prune_empty_dirs, remove_file, CleanupFailure, CleanupSummary,
};

// Configuration
pub use config::{
    load_config, parse_list, resolve_mode, ModeFlags, OperationMode, Options, OutputConfig,
    SweepConfig, CONFIG_FILE,
};

// Display and reporting
pub use display::{render_cleanup, render_configuration, render_json, render_preview, render_summary};
pub use report::{render_report, report_path, write_report, REPORT_DIR};
pub use size::format_size;

// Logging
pub use logging::init_structured_logging;

// Metadata readers
#[cfg(feature = "dotnet")]
pub use metadata::DotnetReader;
pub use metadata::{MapReader, MetadataReader, ModuleMetadata};

// Mode dispatch
pub use mode::{dispatch, AssumeYes, Confirmer, ModeOutcome};

// Model
pub use model::{AuxiliaryFile, AuxiliaryKind, FileCategory, ModuleFile, ModuleKind, ModuleName};

// Scanning
pub use scan::{find_entry_file, gather_files, ModuleIndex, ScannedFile, AUTO_ENTRY};
