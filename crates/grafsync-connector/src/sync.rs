//! Sequential sync driver.
//!
//! Walks every resource syncer of a connector page by page, descends into
//! child resource types, then collects entitlements and grants. One request
//! is in flight at a time.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::error::{ConnectorError, ConnectorResult};
use crate::resource::{Entitlement, Grant, Resource, ResourceId, ResourceType};
use crate::traits::{Connector, ResourceSyncer};
use crate::types::ResourceKind;

/// Everything one full sync produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncGraph {
    pub resource_types: Vec<ResourceType>,
    pub resources: Vec<Resource>,
    pub entitlements: Vec<Entitlement>,
    pub grants: Vec<Grant>,
}

impl SyncGraph {
    /// Resources of one kind.
    pub fn resources_of(&self, kind: ResourceKind) -> impl Iterator<Item = &Resource> {
        self.resources.iter().filter(move |r| r.kind() == kind)
    }

    #[must_use]
    pub fn summary(&self) -> SyncSummary {
        SyncSummary {
            organizations: self.resources_of(ResourceKind::Organization).count(),
            users: self.resources_of(ResourceKind::User).count(),
            entitlements: self.entitlements.len(),
            grants: self.grants.len(),
        }
    }
}

/// Counts of a finished sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    pub organizations: usize,
    pub users: usize,
    pub entitlements: usize,
    pub grants: usize,
}

/// Drives a full sync over a set of resource syncers.
pub struct SyncDriver {
    syncers: Vec<Arc<dyn ResourceSyncer>>,
}

impl SyncDriver {
    pub fn new(syncers: Vec<Arc<dyn ResourceSyncer>>) -> Self {
        Self { syncers }
    }

    pub fn for_connector(connector: &dyn Connector) -> Self {
        Self::new(connector.resource_syncers())
    }

    fn syncer_for(&self, kind: ResourceKind) -> Option<&Arc<dyn ResourceSyncer>> {
        self.syncers
            .iter()
            .find(|syncer| syncer.resource_type().id == kind)
    }

    /// Run a full sync. The first error aborts the run.
    #[instrument(skip(self))]
    pub async fn run(&self) -> ConnectorResult<SyncGraph> {
        let mut graph = SyncGraph {
            resource_types: self.syncers.iter().map(|s| s.resource_type()).collect(),
            ..SyncGraph::default()
        };
        let mut seen: HashSet<ResourceId> = HashSet::new();

        for syncer in &self.syncers {
            for resource in self.list_all(syncer.as_ref(), None).await? {
                if seen.insert(resource.id.clone()) {
                    graph.resources.push(resource);
                }
            }
        }

        // Resources appended here are visited by the same loop.
        let mut next = 0;
        while next < graph.resources.len() {
            let parent = graph.resources[next].clone();
            next += 1;

            for kind in &parent.child_resource_types {
                let Some(syncer) = self.syncer_for(*kind) else {
                    debug!(parent = %parent.id, child_type = %kind, "No syncer for child type");
                    continue;
                };

                for child in self.list_all(syncer.as_ref(), Some(&parent.id)).await? {
                    if seen.insert(child.id.clone()) {
                        graph.resources.push(child);
                    }
                }
            }
        }

        for resource in &graph.resources {
            let Some(syncer) = self.syncer_for(resource.kind()) else {
                continue;
            };
            if syncer.resource_type().skip_entitlements_and_grants {
                continue;
            }

            graph
                .entitlements
                .extend(syncer.entitlements(resource).await?);
            graph
                .grants
                .extend(self.grants_all(syncer.as_ref(), resource).await?);
        }

        let summary = graph.summary();
        info!(
            organizations = summary.organizations,
            users = summary.users,
            entitlements = summary.entitlements,
            grants = summary.grants,
            "Sync completed"
        );

        Ok(graph)
    }

    /// List every page of one syncer.
    pub async fn list_all(
        &self,
        syncer: &dyn ResourceSyncer,
        parent: Option<&ResourceId>,
    ) -> ConnectorResult<Vec<Resource>> {
        let mut resources = Vec::new();
        let mut token = String::new();

        loop {
            let page = syncer.list(parent, &token).await?;
            debug!(
                resource_type = %syncer.resource_type().id,
                count = page.items.len(),
                "Listed page"
            );
            resources.extend(page.items);

            if page.next_token.is_empty() {
                return Ok(resources);
            }
            if page.next_token == token {
                return Err(ConnectorError::internal(format!(
                    "cursor for resource type '{}' did not advance",
                    syncer.resource_type().id
                )));
            }
            token = page.next_token;
        }
    }

    async fn grants_all(
        &self,
        syncer: &dyn ResourceSyncer,
        resource: &Resource,
    ) -> ConnectorResult<Vec<Grant>> {
        let mut grants = Vec::new();
        let mut token = String::new();

        loop {
            let page = syncer.grants(resource, &token).await?;
            grants.extend(page.items);

            if page.next_token.is_empty() {
                return Ok(grants);
            }
            if page.next_token == token {
                return Err(ConnectorError::internal(format!(
                    "grant cursor for {} did not advance",
                    resource.id
                )));
            }
            token = page.next_token;
        }
    }
}
