//! Grafana connector façade.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument};

use grafsync_connector::config::ConnectorConfig;
use grafsync_connector::error::{ConnectorError, ConnectorResult};
use grafsync_connector::traits::{Connector, ConnectorMetadata, ResourceSyncer};
use grafsync_connector::types::ResourceKind;

use crate::client::{DirectoryClient, GrafanaClient};
use crate::config::GrafanaConfig;
use crate::organizations::{OrgAllowList, OrganizationSyncer};
use crate::users::UserSyncer;

/// Connector syncing Grafana organizations and their members.
pub struct GrafanaConnector {
    client: Arc<dyn DirectoryClient>,
    page_size: u32,
    allow_list: OrgAllowList,
}

impl GrafanaConnector {
    /// Validate `config`, connect and verify the credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or Grafana rejects the credentials.
    #[instrument(skip(config), fields(base_url = %config.base_url))]
    pub async fn connect(config: &GrafanaConfig) -> ConnectorResult<Self> {
        config.validate()?;
        let client = GrafanaClient::connect(config).await?;
        info!(config = ?config.redacted(), "Grafana connector ready");
        Ok(Self::with_client(Arc::new(client), config))
    }

    /// Build around an existing directory client without contacting it.
    pub fn with_client(client: Arc<dyn DirectoryClient>, config: &GrafanaConfig) -> Self {
        Self {
            client,
            page_size: config.page_size,
            allow_list: OrgAllowList::new(&config.orgs),
        }
    }

    pub fn allow_list(&self) -> &OrgAllowList {
        &self.allow_list
    }
}

#[async_trait]
impl Connector for GrafanaConnector {
    fn metadata(&self) -> ConnectorMetadata {
        ConnectorMetadata {
            display_name: "Grafana".to_string(),
            description: "Connector syncing Grafana organizations, users and role memberships"
                .to_string(),
        }
    }

    /// Fetch the first page of organizations with the configured credentials.
    #[instrument(skip(self))]
    async fn validate(&self) -> ConnectorResult<()> {
        self.client
            .fetch_organizations(1, self.page_size)
            .await
            .map_err(|e| {
                ConnectorError::from(e).during("validate", ResourceKind::Organization.as_str())
            })?;
        info!("Grafana credentials validated");
        Ok(())
    }

    fn resource_syncers(&self) -> Vec<Arc<dyn ResourceSyncer>> {
        vec![
            Arc::new(OrganizationSyncer::new(
                Arc::clone(&self.client),
                self.page_size,
                self.allow_list.clone(),
            )),
            Arc::new(UserSyncer::new(Arc::clone(&self.client), self.page_size)),
        ]
    }
}
