//! Grafana connector configuration.

use serde::{Deserialize, Serialize};

use grafsync_connector::config::{AuthConfig, ConnectionSettings, ConnectorConfig};
use grafsync_connector::error::{ConnectorError, ConnectorResult};
use grafsync_connector::pagination::DEFAULT_PAGE_SIZE;

const REDACTED: &str = "***REDACTED***";

/// Configuration for the Grafana connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrafanaConfig {
    /// Grafana root URL (e.g., "http://localhost:3000").
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Username of the account the connector acts as.
    pub username: String,

    /// Service account or personal access token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Password for basic authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Organizations to sync, by name or id. Empty syncs every organization.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub orgs: Vec<String>,

    /// Records requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Connection settings (timeouts, retries).
    #[serde(default)]
    pub connection: ConnectionSettings,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl GrafanaConfig {
    /// Create a config with required fields and defaults elsewhere.
    pub fn new(base_url: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            access_token: None,
            password: None,
            orgs: Vec::new(),
            page_size: default_page_size(),
            connection: ConnectionSettings::default(),
        }
    }

    /// Authenticate with a bearer token.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Authenticate with basic auth.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Limit syncing to the given organizations.
    pub fn with_orgs<I, S>(mut self, orgs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.orgs = orgs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_connection(mut self, connection: ConnectionSettings) -> Self {
        self.connection = connection;
        self
    }

    /// Authentication derived from the configured credentials.
    ///
    /// A token takes precedence; validation guarantees only one is set.
    pub fn auth(&self) -> AuthConfig {
        match (&self.access_token, &self.password) {
            (Some(token), _) => AuthConfig::bearer(token.clone()),
            (None, Some(password)) => AuthConfig::basic(self.username.clone(), password.clone()),
            (None, None) => AuthConfig::None,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_reader(|key| std::env::var(key))
    }

    /// Load configuration from a custom variable reader.
    ///
    /// Empty values count as unset.
    pub fn from_reader<F>(reader: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let read = |key: &str| reader(key).ok().filter(|v| !v.trim().is_empty());

        let username = read("GRAFANA_USERNAME")
            .ok_or_else(|| ConfigError::MissingVar("GRAFANA_USERNAME".into()))?;

        let mut config = Self::new(
            read("GRAFANA_BASE_URL").unwrap_or_else(default_base_url),
            username,
        );
        config.access_token = read("GRAFANA_ACCESS_TOKEN");
        config.password = read("GRAFANA_PASSWORD");

        if let Some(orgs) = read("GRAFANA_ORGS") {
            config.orgs = orgs
                .split(',')
                .map(str::trim)
                .filter(|org| !org.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(page_size) = read("GRAFANA_PAGE_SIZE") {
            config.page_size = page_size.parse::<u32>().map_err(|e| {
                ConfigError::InvalidValue("GRAFANA_PAGE_SIZE".into(), e.to_string())
            })?;
        }

        Ok(config)
    }
}

impl ConnectorConfig for GrafanaConfig {
    fn validate(&self) -> ConnectorResult<()> {
        let invalid = |message: &str| ConnectorError::InvalidConfiguration {
            message: message.to_string(),
        };

        let url = url::Url::parse(&self.base_url).map_err(|e| ConnectorError::InvalidConfiguration {
            message: format!("base_url '{}' is not a valid URL: {e}", self.base_url),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(invalid("base_url must use http or https"));
        }

        if self.username.trim().is_empty() {
            return Err(invalid("username is required"));
        }

        match (&self.access_token, &self.password) {
            (Some(_), Some(_)) => {
                return Err(invalid(
                    "access_token and password are mutually exclusive",
                ))
            }
            (None, None) => return Err(invalid("one of access_token or password is required")),
            _ => {}
        }

        if self.page_size == 0 {
            return Err(invalid("page_size must be greater than zero"));
        }

        Ok(())
    }

    fn redacted(&self) -> Self {
        Self {
            access_token: self.access_token.as_ref().map(|_| REDACTED.to_string()),
            password: self.password.as_ref().map(|_| REDACTED.to_string()),
            ..self.clone()
        }
    }
}

/// Errors loading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(String),

    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}
