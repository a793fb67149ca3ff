//! Error types for the Grafana connector.

use grafsync_connector::error::ConnectorError;
use thiserror::Error;

/// Result type alias using `GrafanaError`.
pub type GrafanaResult<T> = Result<T, GrafanaError>;

/// Errors that can occur when talking to the Grafana HTTP API.
#[derive(Debug, Error)]
pub enum GrafanaError {
    /// Configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credentials were rejected (401).
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Credentials lack access to the endpoint (403).
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Any other non-success response.
    #[error("Grafana API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A success response whose body does not match the expected records.
    #[error("invalid response body from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The request did not complete within the configured timeout.
    #[error("request timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Maximum retry attempts exceeded on transient failures.
    #[error("Maximum retries ({attempts}) exceeded: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

impl From<GrafanaError> for ConnectorError {
    fn from(err: GrafanaError) -> Self {
        match err {
            GrafanaError::Config(message) => ConnectorError::InvalidConfiguration { message },
            GrafanaError::Auth(_) => ConnectorError::AuthenticationFailed,
            GrafanaError::PermissionDenied(operation) => {
                ConnectorError::AuthorizationFailed { operation }
            }
            GrafanaError::NotFound(identifier) => ConnectorError::ObjectNotFound { identifier },
            GrafanaError::Api { status, message } => ConnectorError::Api { status, message },
            GrafanaError::Timeout { timeout_secs } => {
                ConnectorError::ConnectionTimeout { timeout_secs }
            }
            GrafanaError::Decode { path, source } => ConnectorError::Serialization {
                message: format!("invalid response body from {path}: {source}"),
            },
            GrafanaError::Http(e) if e.is_decode() || e.is_body() => {
                ConnectorError::Serialization {
                    message: format!("invalid response body: {e}"),
                }
            }
            GrafanaError::Http(e) if e.is_connect() => {
                ConnectorError::connection_failed_with_source(format!("request failed: {e}"), e)
            }
            GrafanaError::Http(e) => {
                ConnectorError::network_with_source(format!("request failed: {e}"), e)
            }
            GrafanaError::Url(e) => ConnectorError::InvalidConfiguration {
                message: format!("invalid URL: {e}"),
            },
            GrafanaError::MaxRetriesExceeded {
                attempts,
                last_error,
            } => ConnectorError::TargetUnavailable {
                message: format!("gave up after {attempts} attempts: {last_error}"),
            },
        }
    }
}
