//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use modsweep_core::prelude::*;
//! ```

// Errors
pub use crate::error::{SweepError, SweepResult};

// Analysis
pub use crate::analysis::{analyze_directory, AnalysisResult};

// Configuration
pub use crate::config::{load_config, OperationMode, Options, SweepConfig};

// Metadata readers
#[cfg(feature = "dotnet")]
pub use crate::metadata::DotnetReader;
pub use crate::metadata::{MapReader, MetadataReader};

// Mode dispatch
pub use crate::mode::{dispatch, AssumeYes, Confirmer, ModeOutcome};

// Cleanup
pub use crate::cleanup::{execute_cleanup, CleanupSummary};
