//! Tracing subscriber setup.
//!
//! Default level is `info`, raised by `-v` flags and lowered to errors
//! only by `--quiet`. `RUST_LOG` overrides both when set. Logs go to
//! stderr so report JSON on stdout stays machine-readable.

use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber for the CLI.
///
/// # Errors
///
/// Returns an error when a global subscriber is already installed.
pub fn init_logging(
    verbose: u8,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dbperf={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()?;
    Ok(())
}

/// Best-effort subscriber for tests; safe to call repeatedly.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("dbperf=debug"))
        .with_test_writer()
        .try_init();
}
