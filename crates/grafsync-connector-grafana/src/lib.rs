//! Grafana Connector
//!
//! Projects Grafana organizations, their users and role memberships into the
//! identity graph of [`grafsync_connector`], using the Grafana HTTP API.
//!
//! # Features
//!
//! - Bearer token or basic authentication
//! - Page-number pagination with resumable cursors
//! - Organizations with Viewer, Editor and Admin role entitlements
//! - Per-organization user listing
//! - Optional organization allow-list
//!
//! # Example
//!
//! ```no_run
//! use grafsync_connector::sync::SyncDriver;
//! use grafsync_connector_grafana::{GrafanaConfig, GrafanaConnector};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GrafanaConfig::new("http://localhost:3000", "admin").with_access_token("glsa_...");
//! let connector = GrafanaConnector::connect(&config).await?;
//! let graph = SyncDriver::for_connector(&connector).run().await?;
//! println!("{} grants", graph.grants.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod connector;
mod error;
mod models;
mod organizations;
mod roles;
mod users;

#[cfg(test)]
mod testing;

// Re-exports
pub use client::{CurrentUser, DirectoryClient, GrafanaClient};
pub use config::{ConfigError, GrafanaConfig};
pub use connector::GrafanaConnector;
pub use error::{GrafanaError, GrafanaResult};
pub use models::{GrafanaErrorBody, GrafanaOrg, GrafanaUser, OrgMembership, OrgUserSearchResponse};
pub use organizations::{org_resource, OrgAllowList, OrganizationSyncer};
pub use roles::Role;
pub use users::{user_resource, UserSyncer};
