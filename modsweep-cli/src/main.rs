//! modsweep CLI - find and remove assemblies an application never loads.
//!
//! Features:
//! - Dependency closure from the entry assembly's metadata
//! - Locale satellite and auxiliary file cleanup
//! - Analyze, preview, delete and report modes
//! - Interactive menu when run without arguments

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use dialoguer::{Confirm, Input, Select};
use is_terminal::IsTerminal;
use std::io;
use std::path::PathBuf;
use tracing::warn;

use modsweep_core::{
    analyze_directory, dispatch, init_structured_logging, load_config, parse_list,
    render_configuration, resolve_mode, Confirmer, DotnetReader, ModeFlags, OperationMode,
    Options, SweepError, SweepResult, AUTO_ENTRY,
};

#[derive(Parser, Debug)]
#[command(
    name = "modsweep",
    author,
    version,
    about = "Find and remove assemblies an application never loads",
    after_help = "Run without arguments for the interactive menu. \
                  Without a mode flag, files are deleted after confirmation."
)]
#[command(group(
    ArgGroup::new("mode")
        .args(["analyze", "preview", "report", "delete"])
        .multiple(false)
))]
pub struct Cli {
    /// Analyze only, never delete
    #[arg(short = 'a', long)]
    analyze: bool,

    /// List every file that would be removed
    #[arg(short = 'p', long)]
    preview: bool,

    /// Write a cleanup report under <DIR>/CleanupReports
    #[arg(long)]
    report: bool,

    /// Delete removable files (the default when other flags are given)
    #[arg(long)]
    delete: bool,

    /// Directory to analyze (default: current directory)
    #[arg(short = 'd', long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Entry assembly file or base name; `*` auto-detects
    #[arg(short = 'e', long, value_name = "NAME")]
    entry: Option<String>,

    /// Names never removed, comma or semicolon separated
    #[arg(short = 'w', long, value_name = "LIST")]
    whitelist: Option<String>,

    /// Scan subdirectories and prune directories left empty
    #[arg(short = 'r', long)]
    recursive: bool,

    /// Remove locale satellite assemblies.
    ///
    /// The name is historical: passing it ENABLES locale cleanup.
    #[arg(long = "no-locale")]
    clean_locale: bool,

    /// Remove auxiliary files (.pdb, .xml, .config, .bak, .tmp, .log, ~$*)
    #[arg(long)]
    clean_other: bool,

    /// Verbose logging and diagnostics
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Print the analysis as JSON
    #[arg(long)]
    json: bool,

    /// Delete without asking for confirmation
    #[arg(short = 'y', long)]
    yes: bool,
}

impl Cli {
    fn mode_flags(&self) -> ModeFlags {
        ModeFlags {
            analyze: self.analyze,
            preview: self.preview,
            report: self.report,
        }
    }

    /// Options for a mode resolved from flags.
    fn options(&self, mode: OperationMode) -> Result<Options> {
        let dir = match &self.dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("Failed to read current directory")?,
        };

        Ok(Options::new(dir)
            .entry(self.entry.clone().unwrap_or_default())
            .whitelist(self.whitelist.as_deref().map(parse_list).unwrap_or_default())
            .recursive(self.recursive)
            .clean_locale(self.clean_locale)
            .clean_auxiliary(self.clean_other)
            .mode(mode)
            .verbose(self.verbose)
            .json(self.json)
            .assume_yes(self.yes))
    }
}

/// Confirms on the terminal; a non-terminal stdin declines.
struct TerminalConfirmer {
    assume_yes: bool,
}

impl Confirmer for TerminalConfirmer {
    fn confirm(&mut self, prompt: &str) -> SweepResult<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        if !io::stdin().is_terminal() {
            warn!("stdin is not a terminal, treating confirmation as declined (use --yes)");
            return Ok(false);
        }
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| SweepError::interaction(e.to_string()))
    }
}

/// Interactive menu and prompts. `None` means the user quit.
fn prompt_options() -> Result<Option<Options>> {
    if !io::stdin().is_terminal() {
        eprintln!("Interactive mode needs a terminal. Use --analyze, --preview or --report.");
        return Ok(None);
    }

    let items = vec![
        "[1] Analyze only",
        "[2] Preview cleanup",
        "[3] Delete files",
        "[4] Generate report",
        "[5] Quit",
    ];

    let selection = Select::new()
        .with_prompt("What would you like to do?")
        .items(&items)
        .default(0)
        .interact_opt()?;

    let mode = match selection {
        Some(0) => OperationMode::AnalyzeOnly,
        Some(1) => OperationMode::PreviewCleanup,
        Some(2) => OperationMode::DeleteFiles,
        Some(3) => OperationMode::GenerateReport,
        _ => return Ok(None),
    };

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let dir: String = Input::new()
        .with_prompt("Directory to analyze")
        .default(cwd.display().to_string())
        .interact_text()?;
    let entry: String = Input::new()
        .with_prompt("Entry assembly (* to auto-detect)")
        .default(AUTO_ENTRY.to_string())
        .interact_text()?;
    let whitelist: String = Input::new()
        .with_prompt("Whitelist (comma separated, empty to skip)")
        .allow_empty(true)
        .interact_text()?;
    let recursive = Confirm::new()
        .with_prompt("Scan subdirectories?")
        .default(false)
        .interact()?;

    let (clean_locale, clean_auxiliary) = if mode == OperationMode::AnalyzeOnly {
        (false, false)
    } else {
        let locale = Confirm::new()
            .with_prompt("Remove locale satellite files?")
            .default(false)
            .interact()?;
        let auxiliary = Confirm::new()
            .with_prompt("Remove auxiliary files (.pdb/.xml etc.)?")
            .default(false)
            .interact()?;
        (locale, auxiliary)
    };

    Ok(Some(
        Options::new(dir)
            .entry(entry)
            .whitelist(parse_list(&whitelist))
            .recursive(recursive)
            .clean_locale(clean_locale)
            .clean_auxiliary(clean_auxiliary)
            .mode(mode),
    ))
}

/// Merges `modsweep.toml` from the scan root; a bad file only warns.
fn apply_config(options: Options) -> Options {
    match load_config(&options.scan_root) {
        Ok(Some(cfg)) => options.with_config(&cfg),
        Ok(None) => options,
        Err(e) => {
            warn!(error = %format!("{:#}", e), "config load failed");
            eprintln!("[WARN] config load failed: {:#}", e);
            options
        }
    }
}

fn run(cli: &Cli, has_args: bool) -> Result<i32> {
    let mode = resolve_mode(cli.mode_flags(), has_args);

    let options = if mode == OperationMode::Interactive {
        match prompt_options()? {
            Some(options) => options,
            None => return Ok(0),
        }
    } else {
        cli.options(mode)?
    };
    let options = apply_config(options);

    if !options.json {
        println!("{}", render_configuration(&options));
    }

    let result = analyze_directory(&options, &DotnetReader)
        .with_context(|| format!("Failed to analyze {}", options.scan_root.display()))?;

    let mut confirmer = TerminalConfirmer {
        assume_yes: options.assume_yes,
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = dispatch(&result, &options, &mut confirmer, &mut out)?;

    Ok(outcome.exit_code())
}

/// Exit code after an internal error (panic).
const PANIC_EXIT_CODE: i32 = 2;

fn panic_notice(info: &dyn std::fmt::Display) -> String {
    format!(
        "[PANIC] modsweep internal error: {}\n[PANIC] No further files will be touched; exiting with code {}.",
        info, PANIC_EXIT_CODE
    )
}

fn main() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("{}", panic_notice(info));
        std::process::exit(PANIC_EXIT_CODE);
    }));

    let has_args = std::env::args_os().len() > 1;
    let cli = Cli::parse();

    // JSON to stderr, respects RUST_LOG
    init_structured_logging(cli.verbose);

    let code = match run(&cli, has_args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            1
        }
    };
    std::process::exit(code);
}
