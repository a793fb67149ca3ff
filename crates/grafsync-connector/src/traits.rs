//! Connector Framework traits
//!
//! A connector exposes one [`ResourceSyncer`] per resource kind. The sync
//! driver calls them page by page, passing back the opaque cursor each call
//! returned until the cursor comes back empty.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ConnectorResult;
use crate::resource::{Entitlement, Grant, Resource, ResourceId, ResourceType};

/// One page of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor for the next call; empty when the listing is complete.
    pub next_token: String,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_token: impl Into<String>) -> Self {
        Self {
            items,
            next_token: next_token.into(),
        }
    }

    /// A page with nothing after it.
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, String::new())
    }

    /// A complete, empty listing.
    pub fn empty() -> Self {
        Self::last(Vec::new())
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.next_token.is_empty()
    }
}

/// Sync operations for one resource kind.
#[async_trait]
pub trait ResourceSyncer: Send + Sync {
    /// The resource type this syncer lists.
    fn resource_type(&self) -> ResourceType;

    /// List one page of resources, scoped to `parent` when given.
    ///
    /// `token` is empty for the first page, otherwise a cursor previously
    /// returned by this method.
    async fn list(&self, parent: Option<&ResourceId>, token: &str)
        -> ConnectorResult<Page<Resource>>;

    /// Entitlements offered by `resource`.
    async fn entitlements(&self, resource: &Resource) -> ConnectorResult<Vec<Entitlement>>;

    /// One page of grants on `resource`'s entitlements.
    async fn grants(&self, resource: &Resource, token: &str) -> ConnectorResult<Page<Grant>>;
}

/// Descriptive information about a connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorMetadata {
    pub display_name: String,
    pub description: String,
}

/// Base trait for connectors.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Display name and description of this connector.
    fn metadata(&self) -> ConnectorMetadata;

    /// Check that the configured credentials can read the directory.
    async fn validate(&self) -> ConnectorResult<()>;

    /// Syncers for every resource kind, in sync order.
    fn resource_syncers(&self) -> Vec<Arc<dyn ResourceSyncer>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_last() {
        let page: Page<u8> = Page::last(vec![1, 2]);
        assert!(page.is_last());
        assert_eq!(page.items.len(), 2);

        let page: Page<u8> = Page::new(vec![], "cursor");
        assert!(!page.is_last());
        assert!(Page::<u8>::empty().is_last());
    }
}
