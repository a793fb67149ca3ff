//! # Connector Framework
//!
//! Core abstractions for projecting a remote directory into an identity graph
//! of resources, entitlements and grants.
//!
//! ## Architecture
//!
//! - [`traits::ResourceSyncer`] - per resource kind: list, entitlements, grants
//! - [`traits::Connector`] - metadata, credential validation, syncer set
//! - [`pagination`] - opaque, resumable, nestable page cursors
//! - [`sync::SyncDriver`] - sequential driver producing a [`sync::SyncGraph`]
//!
//! ## Example
//!
//! ```ignore
//! use grafsync_connector::prelude::*;
//!
//! let driver = SyncDriver::for_connector(&connector);
//! let graph = driver.run().await?;
//! println!("{} grants", graph.grants.len());
//! ```
//!
//! ## Crate Organization
//!
//! - [`types`] - Resource kinds, traits and statuses
//! - [`resource`] - Resource, Entitlement, Grant values
//! - [`error`] - Error types with transient/permanent classification
//! - [`config`] - Configuration trait, auth and connection settings

pub mod config;
pub mod error;
pub mod pagination;
pub mod resource;
pub mod sync;
pub mod traits;
pub mod types;

/// Prelude module for convenient imports.
///
/// ```
/// use grafsync_connector::prelude::*;
/// ```
pub mod prelude {
    pub use crate::types::{EntitlementPurpose, ResourceKind, ResourceTrait, UserStatus};

    pub use crate::error::{ConnectorError, ConnectorResult, CursorError};

    pub use crate::traits::{Connector, ConnectorMetadata, Page, ResourceSyncer};

    pub use crate::resource::{
        title_case, Entitlement, Grant, Profile, Resource, ResourceId, ResourceType, UserTrait,
    };

    pub use crate::pagination::{Bag, PageCursor, PageState, DEFAULT_PAGE_SIZE};

    pub use crate::config::{AuthConfig, ConnectionSettings, ConnectorConfig};

    pub use crate::sync::{SyncDriver, SyncGraph, SyncSummary};
}

// Re-export async_trait for connector implementors
pub use async_trait::async_trait;
