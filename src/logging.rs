//! Tracing subscriber setup.
//!
//! Filter precedence: `RUST_LOG`, then `-v` flags, then the configured level.
//! Logs go to stderr so converted Markdown on stdout stays clean.

use tracing_subscriber::EnvFilter;

/// Pick the default filter directive for a verbosity count.
pub fn default_directive(verbosity: u8, configured: &str) -> String {
    match verbosity {
        0 => configured.trim().to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(verbosity: u8, configured: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(default_directive(verbosity, configured))
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
