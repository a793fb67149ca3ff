//! Tracing setup for the CLI.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn,grafsync_cli=info,grafsync_connector=info,grafsync_connector_grafana=info",
        1 => "info,grafsync_cli=debug,grafsync_connector=debug,grafsync_connector_grafana=debug",
        _ => "debug,grafsync_connector_grafana=trace",
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays
/// reserved for command output.
pub fn init(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose))),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
