//! Organization projector.

use async_trait::async_trait;
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use grafsync_connector::error::ConnectorResult;
use grafsync_connector::pagination::PageCursor;
use grafsync_connector::resource::{
    title_case, Entitlement, Grant, Profile, Resource, ResourceId, ResourceType,
};
use grafsync_connector::traits::{Page, ResourceSyncer};
use grafsync_connector::types::ResourceKind;

use crate::client::DirectoryClient;
use crate::models::GrafanaOrg;
use crate::roles::Role;
use crate::users::user_resource;

/// Organizations the connector is limited to. Empty allows every organization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrgAllowList {
    entries: BTreeSet<String>,
}

impl OrgAllowList {
    /// Build from configured names or ids.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| entry.as_ref().trim().to_lowercase())
                .filter(|entry| !entry.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name matches ignore case; ids match exactly.
    pub fn allows(&self, org: &GrafanaOrg) -> bool {
        self.is_empty()
            || self.entries.contains(&org.name.to_lowercase())
            || self.entries.contains(&org.id.to_string())
    }
}

/// Project a directory organization into an Org resource.
pub fn org_resource(org: &GrafanaOrg) -> ConnectorResult<Resource> {
    let mut profile = Profile::new();
    profile.insert("org_id".to_string(), json!(org.id));
    profile.insert("name".to_string(), json!(org.name));

    Resource::new(ResourceKind::Organization, org.id.to_string(), title_case(&org.name))?
        .with_profile(profile)
        .map(|resource| resource.with_child_resource_type(ResourceKind::User))
}

/// Lists organizations, their role entitlements and membership grants.
pub struct OrganizationSyncer {
    client: Arc<dyn DirectoryClient>,
    page_size: u32,
    allow_list: OrgAllowList,
}

impl OrganizationSyncer {
    pub fn new(
        client: Arc<dyn DirectoryClient>,
        page_size: u32,
        allow_list: OrgAllowList,
    ) -> Self {
        Self {
            client,
            page_size,
            allow_list,
        }
    }

    async fn list_page(&self, token: &str) -> ConnectorResult<Page<Resource>> {
        let cursor = PageCursor::parse(token, ResourceKind::Organization, None)?;
        let orgs = self
            .client
            .fetch_organizations(cursor.page(), self.page_size)
            .await?;

        // The next-page decision uses the unfiltered count.
        let fetched = orgs.len();
        let resources = orgs
            .iter()
            .filter(|org| self.allow_list.allows(org))
            .map(org_resource)
            .collect::<ConnectorResult<Vec<_>>>()?;

        debug!(
            page = cursor.page(),
            fetched,
            kept = resources.len(),
            "Fetched organizations"
        );

        Ok(Page::new(resources, cursor.advance(self.page_size, fetched)?))
    }

    async fn membership_grants(&self, org: &Resource) -> ConnectorResult<Vec<Grant>> {
        let members = self.client.fetch_members_of_org(org.external_id()).await?;

        let mut grants = Vec::with_capacity(members.len());
        for member in &members {
            let Some(role) = Role::grantable(&member.role) else {
                warn!(
                    org_id = %org.external_id(),
                    user_id = member.user_id,
                    role = %member.role,
                    "Skipping membership with unknown role"
                );
                continue;
            };

            let principal = user_resource(&member.to_user(), Some(&org.id))?;
            grants.push(Grant::new(org, role.as_str(), principal));
        }

        info!(
            org_id = %org.external_id(),
            members = members.len(),
            grants = grants.len(),
            "Listed organization grants"
        );
        Ok(grants)
    }
}

#[async_trait]
impl ResourceSyncer for OrganizationSyncer {
    fn resource_type(&self) -> ResourceType {
        ResourceType::organization()
    }

    #[instrument(skip(self, token))]
    async fn list(
        &self,
        _parent: Option<&ResourceId>,
        token: &str,
    ) -> ConnectorResult<Page<Resource>> {
        self.list_page(token)
            .await
            .map_err(|e| e.during("list", ResourceKind::Organization.as_str()))
    }

    async fn entitlements(&self, resource: &Resource) -> ConnectorResult<Vec<Entitlement>> {
        Ok(Role::all()
            .iter()
            .map(|role| {
                Entitlement::permission(resource, role.as_str())
                    .with_display_name(format!("{} {}", resource.display_name, role))
                    .with_description(format!(
                        "{} role in {} Grafana organization",
                        role, resource.display_name
                    ))
                    .with_grantable_to(ResourceKind::User)
            })
            .collect())
    }

    /// Membership is not paginated; every call returns the full, final page.
    #[instrument(skip(self, resource, _token), fields(org = %resource.id))]
    async fn grants(&self, resource: &Resource, _token: &str) -> ConnectorResult<Page<Grant>> {
        self.membership_grants(resource)
            .await
            .map(Page::last)
            .map_err(|e| e.during("grants", ResourceKind::Organization.as_str()))
    }
}
