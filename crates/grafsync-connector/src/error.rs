//! Connector Framework error types
//!
//! Error definitions with transient/permanent classification. Nothing in the
//! framework retries; the classification is for the caller driving the sync.

use thiserror::Error;

/// Error produced while decoding or advancing a pagination cursor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// The serialized cursor is not a valid bag.
    #[error("malformed pagination cursor: {message}")]
    Malformed { message: String },

    /// The stored page token is not an unsigned integer.
    #[error("invalid page token '{token}' for resource type '{resource_type}'")]
    InvalidPageToken {
        token: String,
        resource_type: String,
    },

    /// The top frame belongs to a different listing.
    #[error("cursor frame is for '{found}', expected '{expected}'")]
    ResourceTypeMismatch { expected: String, found: String },

    /// `advance` was called on a bag without a current frame.
    #[error("no active page state in pagination cursor")]
    NoActiveFrame,
}

/// Error that can occur during connector operations.
#[derive(Debug, Error)]
pub enum ConnectorError {
    // Connection errors (usually transient)
    /// Failed to establish connection to the directory.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Connection timed out.
    #[error("connection timeout after {timeout_secs} seconds")]
    ConnectionTimeout { timeout_secs: u64 },

    /// Directory is temporarily unavailable.
    #[error("target system unavailable: {message}")]
    TargetUnavailable { message: String },

    /// Network error during communication.
    #[error("network error: {message}")]
    NetworkError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Authentication errors (permanent)
    /// Invalid credentials provided.
    #[error("authentication failed: invalid credentials")]
    AuthenticationFailed,

    /// Insufficient permissions for the operation.
    #[error("authorization failed: insufficient permissions for {operation}")]
    AuthorizationFailed { operation: String },

    // Configuration errors (permanent)
    /// Connector configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// The directory answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Object not found in the directory.
    #[error("object not found: {identifier}")]
    ObjectNotFound { identifier: String },

    /// A raw record could not be projected into the identity graph.
    #[error("invalid record {record_id}: {message}")]
    InvalidData { record_id: String, message: String },

    /// The pagination cursor could not be decoded or advanced.
    #[error(transparent)]
    Cursor(#[from] CursorError),

    /// A sync operation failed; carries which operation and resource type.
    #[error("{operation} for resource type '{resource_type}' failed: {source}")]
    Sync {
        operation: &'static str,
        resource_type: String,
        #[source]
        source: Box<ConnectorError>,
    },

    // Internal errors
    /// Internal error.
    #[error("internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization error.
    #[error("serialization error: {message}")]
    Serialization { message: String },
}

impl ConnectorError {
    /// Check if this error is transient and the operation could be retried.
    ///
    /// A `Sync` wrapper is as transient as the error it wraps.
    pub fn is_transient(&self) -> bool {
        match self {
            ConnectorError::Sync { source, .. } => source.is_transient(),
            ConnectorError::ConnectionFailed { .. }
            | ConnectorError::ConnectionTimeout { .. }
            | ConnectorError::TargetUnavailable { .. }
            | ConnectorError::NetworkError { .. } => true,
            ConnectorError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Get an error code for classification.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConnectorError::ConnectionFailed { .. } => "CONNECTION_FAILED",
            ConnectorError::ConnectionTimeout { .. } => "CONNECTION_TIMEOUT",
            ConnectorError::TargetUnavailable { .. } => "TARGET_UNAVAILABLE",
            ConnectorError::NetworkError { .. } => "NETWORK_ERROR",
            ConnectorError::AuthenticationFailed => "AUTH_FAILED",
            ConnectorError::AuthorizationFailed { .. } => "AUTHORIZATION_FAILED",
            ConnectorError::InvalidConfiguration { .. } => "INVALID_CONFIG",
            ConnectorError::Api { .. } => "API_ERROR",
            ConnectorError::ObjectNotFound { .. } => "OBJECT_NOT_FOUND",
            ConnectorError::InvalidData { .. } => "INVALID_DATA",
            ConnectorError::Cursor(_) => "INVALID_CURSOR",
            ConnectorError::Sync { source, .. } => source.error_code(),
            ConnectorError::Internal { .. } => "INTERNAL_ERROR",
            ConnectorError::Serialization { .. } => "SERIALIZATION_ERROR",
        }
    }

    /// Returns the innermost error, unwrapping `Sync` context layers.
    pub fn root(&self) -> &ConnectorError {
        match self {
            ConnectorError::Sync { source, .. } => source.root(),
            other => other,
        }
    }

    /// Wrap this error with the sync operation and resource type that failed.
    pub fn during(self, operation: &'static str, resource_type: impl Into<String>) -> Self {
        ConnectorError::Sync {
            operation,
            resource_type: resource_type.into(),
            source: Box::new(self),
        }
    }

    // Convenience constructors

    /// Create a connection failed error with source.
    pub fn connection_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ConnectorError::ConnectionFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid data error for the record with the given id.
    pub fn invalid_data(record_id: impl Into<String>, message: impl Into<String>) -> Self {
        ConnectorError::InvalidData {
            record_id: record_id.into(),
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ConnectorError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Create a network error with source.
    pub fn network_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ConnectorError::NetworkError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<serde_json::Error> for ConnectorError {
    fn from(e: serde_json::Error) -> Self {
        ConnectorError::Serialization {
            message: e.to_string(),
        }
    }
}

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;
