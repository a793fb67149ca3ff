//! CLI error types and exit codes

use grafsync_connector::error::ConnectorError;
use grafsync_connector_grafana::ConfigError;
use thiserror::Error;

/// Exit codes for the CLI
/// - 0: Success
/// - 1: General error
/// - 2: Authentication failed
/// - 3: Network error
/// - 4: Configuration or validation error
/// - 5: Server error
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Sync failed: {0}")]
    Sync(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::AuthenticationFailed(_) | CliError::PermissionDenied(_) => 2,
            CliError::Network(_) => 3,
            CliError::Config(_) => 4,
            CliError::Api { status, .. } => {
                if *status >= 500 {
                    5
                } else {
                    1
                }
            }
            CliError::Sync(_) | CliError::Io(_) => 1,
        }
    }

    /// Print the error, and a suggestion when one applies, to stderr.
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {}", suggestion);
            } else {
                eprintln!("\nSuggestion: {}", suggestion);
            }
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::Config(_) => Some(
                "Set GRAFANA_USERNAME and one of GRAFANA_ACCESS_TOKEN or GRAFANA_PASSWORD, \
                 or pass the matching flags.",
            ),
            CliError::AuthenticationFailed(_) => {
                Some("Check that the access token or password is still valid.")
            }
            CliError::PermissionDenied(_) => {
                Some("The account needs read access to organizations and their users.")
            }
            CliError::Network(_) => Some("Verify --base-url points at a reachable Grafana server."),
            _ => None,
        }
    }
}

impl From<ConnectorError> for CliError {
    fn from(err: ConnectorError) -> Self {
        let message = err.to_string();
        match err.root() {
            ConnectorError::InvalidConfiguration { .. } => CliError::Config(message),
            ConnectorError::AuthenticationFailed => CliError::AuthenticationFailed(message),
            ConnectorError::AuthorizationFailed { .. } => CliError::PermissionDenied(message),
            ConnectorError::ConnectionFailed { .. }
            | ConnectorError::ConnectionTimeout { .. }
            | ConnectorError::NetworkError { .. }
            | ConnectorError::TargetUnavailable { .. } => CliError::Network(message),
            ConnectorError::Api { status, .. } => CliError::Api {
                status: *status,
                message,
            },
            _ => CliError::Sync(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Io(format!("failed to encode output: {err}"))
    }
}
