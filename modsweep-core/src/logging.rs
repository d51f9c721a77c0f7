//! Structured logging using **tracing**.
//!
//! Events go to stderr as JSON so stdout stays clean for the summary, preview
//! and `--json` output.

use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber.
///
/// Should be called once at startup. A second call is a no-op.
///
/// # Environment Variables
/// - `RUST_LOG`: Overrides the filter (e.g., `RUST_LOG=modsweep_core=trace`)
pub fn init_structured_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_current_span(true)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "modsweep_core=debug,modsweep=debug"
    } else {
        "warn"
    }
}
