//! CLI command implementations

pub mod sync;
pub mod validate;

use clap::Args;
use std::collections::HashMap;

use grafsync_connector::config::ConnectorConfig;
use grafsync_connector_grafana::GrafanaConfig;

use crate::error::CliResult;

/// Grafana connection flags shared by every command.
///
/// Flags take precedence over the matching `GRAFANA_*` environment variables.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Grafana root URL [env: GRAFANA_BASE_URL]
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Username of the syncing account [env: GRAFANA_USERNAME]
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Service account token [env: GRAFANA_ACCESS_TOKEN]
    #[arg(long, global = true, conflicts_with = "password")]
    pub access_token: Option<String>,

    /// Password for basic authentication [env: GRAFANA_PASSWORD]
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Organization to sync, by name or id; repeatable [env: GRAFANA_ORGS]
    #[arg(long = "org", global = true)]
    pub orgs: Vec<String>,

    /// Records per page [env: GRAFANA_PAGE_SIZE]
    #[arg(long, global = true)]
    pub page_size: Option<u32>,
}

impl ConnectionArgs {
    fn overrides(&self) -> HashMap<&'static str, String> {
        let mut overrides = HashMap::new();
        let mut set = |key: &'static str, value: Option<String>| {
            if let Some(value) = value {
                overrides.insert(key, value);
            }
        };

        set("GRAFANA_BASE_URL", self.base_url.clone());
        set("GRAFANA_USERNAME", self.username.clone());
        set("GRAFANA_ACCESS_TOKEN", self.access_token.clone());
        set("GRAFANA_PASSWORD", self.password.clone());
        set(
            "GRAFANA_ORGS",
            (!self.orgs.is_empty()).then(|| self.orgs.join(",")),
        );
        set("GRAFANA_PAGE_SIZE", self.page_size.map(|p| p.to_string()));
        overrides
    }

    /// Merge flags over the environment and validate the result.
    pub fn load_config(&self) -> CliResult<GrafanaConfig> {
        self.load_config_with(|key| std::env::var(key))
    }

    /// Like [`Self::load_config`], reading the environment through `env`.
    pub fn load_config_with<F>(&self, env: F) -> CliResult<GrafanaConfig>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let overrides = self.overrides();
        let config = GrafanaConfig::from_reader(|key| match overrides.get(key) {
            Some(value) => Ok(value.clone()),
            None => env(key),
        })?;
        config.validate()?;
        Ok(config)
    }
}
