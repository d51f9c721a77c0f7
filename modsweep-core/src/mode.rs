//! Mode controller: one-shot dispatch of a resolved terminal mode.
//!
//! `Interactive` is resolved by the caller before analysis; by the time an
//! [`AnalysisResult`] exists the mode is terminal and exactly one consumer
//! runs.

use chrono::Local;
use std::io::Write;
use std::path::PathBuf;

use crate::analysis::AnalysisResult;
use crate::cleanup::{execute_cleanup, CleanupSummary};
use crate::config::{OperationMode, Options};
use crate::display::{render_cleanup, render_json, render_preview, render_summary};
use crate::error::{IoResultExt, SweepError, SweepResult};
use crate::report::write_report;
use crate::size::format_size;

/// Asks the user to approve a destructive step.
pub trait Confirmer {
    fn confirm(&mut self, prompt: &str) -> SweepResult<bool>;
}

/// Approves every prompt (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirmer for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> SweepResult<bool> {
        Ok(true)
    }
}

/// What the dispatched mode did.
#[derive(Debug, Clone)]
pub enum ModeOutcome {
    Analyzed,
    Previewed,
    /// Preview or delete with no savable files
    NothingToClean,
    /// Delete mode, user answered no
    Declined,
    Cleaned(CleanupSummary),
    Reported(PathBuf),
}

impl ModeOutcome {
    /// Process exit code: 1 only when a delete run had failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Cleaned(summary) if !summary.is_success() => 1,
            _ => 0,
        }
    }
}

fn emit<W: Write + ?Sized>(out: &mut W, text: &str) -> SweepResult<()> {
    out.write_all(text.as_bytes()).with_path("<stdout>")
}

/// Runs the consumer for `options.mode` over `result`.
pub fn dispatch<W, C>(
    result: &AnalysisResult,
    options: &Options,
    confirmer: &mut C,
    out: &mut W,
) -> SweepResult<ModeOutcome>
where
    W: Write + ?Sized,
    C: Confirmer + ?Sized,
{
    if options.json {
        emit(out, &render_json(result))?;
        emit(out, "\n")?;
    } else {
        emit(out, &render_summary(result, options))?;
    }

    match options.mode {
        OperationMode::Interactive => Err(SweepError::interaction(
            "operation mode must be resolved before dispatch",
        )),
        OperationMode::AnalyzeOnly => {
            if !options.json && result.has_savings() {
                emit(out, "Analysis only, nothing was deleted. Use --preview for details.\n")?;
            }
            Ok(ModeOutcome::Analyzed)
        }
        OperationMode::PreviewCleanup => {
            if !result.has_savings() {
                return Ok(ModeOutcome::NothingToClean);
            }
            emit(out, &render_preview(result))?;
            Ok(ModeOutcome::Previewed)
        }
        OperationMode::DeleteFiles => run_delete(result, options, confirmer, out),
        OperationMode::GenerateReport => {
            let path = write_report(result, Local::now().naive_local())?;
            emit(out, &format!("Report written to {}\n", path.display()))?;
            Ok(ModeOutcome::Reported(path))
        }
    }
}

fn run_delete<W, C>(
    result: &AnalysisResult,
    options: &Options,
    confirmer: &mut C,
    out: &mut W,
) -> SweepResult<ModeOutcome>
where
    W: Write + ?Sized,
    C: Confirmer + ?Sized,
{
    if !result.has_savings() {
        emit(out, "Nothing to clean.\n")?;
        return Ok(ModeOutcome::NothingToClean);
    }

    let prompt = format!(
        "Delete {} files and free {}?",
        result.total_savable_count,
        format_size(result.total_savable_bytes)
    );
    if !confirmer.confirm(&prompt)? {
        emit(out, "Cancelled.\n")?;
        return Ok(ModeOutcome::Declined);
    }

    let summary = execute_cleanup(&result.savable_paths(), &result.scan_root, options.recursive);
    emit(out, &render_cleanup(&summary))?;
    Ok(ModeOutcome::Cleaned(summary))
}
