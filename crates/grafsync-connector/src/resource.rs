//! Identity graph nodes and edges.
//!
//! Resources, entitlements and grants are plain values: constructing one never
//! touches the network and never mutates shared state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{ConnectorError, ConnectorResult};
use crate::types::{EntitlementPurpose, ResourceKind, ResourceTrait, UserStatus};

/// Scalar profile attributes attached to a resource.
pub type Profile = BTreeMap<String, serde_json::Value>;

/// Descriptor of a resource type exposed by a connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceType {
    pub id: ResourceKind,
    pub display_name: String,
    pub traits: Vec<ResourceTrait>,
    /// Resources of this type never carry entitlements or grants.
    #[serde(default)]
    pub skip_entitlements_and_grants: bool,
}

impl ResourceType {
    /// The organization resource type.
    #[must_use]
    pub fn organization() -> Self {
        Self {
            id: ResourceKind::Organization,
            display_name: ResourceKind::Organization.display_name().to_string(),
            traits: vec![ResourceTrait::Group],
            skip_entitlements_and_grants: false,
        }
    }

    /// The user resource type.
    #[must_use]
    pub fn user() -> Self {
        Self {
            id: ResourceKind::User,
            display_name: ResourceKind::User.display_name().to_string(),
            traits: vec![ResourceTrait::User],
            skip_entitlements_and_grants: true,
        }
    }
}

/// Identifier of a resource: its type plus the directory-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId {
    pub resource_type: ResourceKind,
    pub resource: String,
}

impl ResourceId {
    pub fn new(resource_type: ResourceKind, resource: impl Into<String>) -> Self {
        Self {
            resource_type,
            resource: resource.into(),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.resource)
    }
}

/// User-specific attributes of a user resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTrait {
    pub login: String,
    /// Primary email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub status: UserStatus,
}

/// A normalized directory object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub display_name: String,
    /// Owning resource, for resources listed inside a parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_resource_id: Option<ResourceId>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub profile: Profile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_trait: Option<UserTrait>,
    /// Resource types listed with this resource as parent.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_resource_types: Vec<ResourceKind>,
}

impl Resource {
    /// Create a resource, rejecting an empty external id.
    pub fn new(
        kind: ResourceKind,
        external_id: impl Into<String>,
        display_name: impl Into<String>,
    ) -> ConnectorResult<Self> {
        let external_id = external_id.into();
        if external_id.trim().is_empty() {
            return Err(ConnectorError::invalid_data(
                "<empty>",
                format!("{kind} resource has an empty external id"),
            ));
        }

        Ok(Self {
            id: ResourceId::new(kind, external_id),
            display_name: display_name.into(),
            parent_resource_id: None,
            profile: Profile::new(),
            user_trait: None,
            child_resource_types: Vec::new(),
        })
    }

    /// Set the parent resource.
    #[must_use]
    pub fn with_parent(mut self, parent: ResourceId) -> Self {
        self.parent_resource_id = Some(parent);
        self
    }

    /// Declare a child resource type listed under this resource.
    #[must_use]
    pub fn with_child_resource_type(mut self, kind: ResourceKind) -> Self {
        if !self.child_resource_types.contains(&kind) {
            self.child_resource_types.push(kind);
        }
        self
    }

    /// Attach the user trait.
    #[must_use]
    pub fn with_user_trait(mut self, user_trait: UserTrait) -> Self {
        self.user_trait = Some(user_trait);
        self
    }

    /// Attach profile attributes. Only scalar values are accepted.
    pub fn with_profile(mut self, profile: Profile) -> ConnectorResult<Self> {
        for (key, value) in &profile {
            if value.is_array() || value.is_object() {
                return Err(ConnectorError::invalid_data(
                    self.id.resource.clone(),
                    format!("profile attribute '{key}' is not a scalar"),
                ));
            }
        }
        self.profile = profile;
        Ok(self)
    }

    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.id.resource_type
    }

    #[must_use]
    pub fn external_id(&self) -> &str {
        &self.id.resource
    }
}

/// A grantable permission scoped to one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    pub id: String,
    pub resource: ResourceId,
    pub slug: String,
    pub display_name: String,
    pub description: String,
    pub grantable_to: Vec<ResourceKind>,
    pub purpose: EntitlementPurpose,
}

impl Entitlement {
    /// Create a permission entitlement on `resource` identified by `slug`.
    pub fn permission(resource: &Resource, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        Self {
            id: entitlement_id(&resource.id, &slug),
            resource: resource.id.clone(),
            display_name: slug.clone(),
            slug,
            description: String::new(),
            grantable_to: Vec::new(),
            purpose: EntitlementPurpose::Permission,
        }
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_grantable_to(mut self, kind: ResourceKind) -> Self {
        if !self.grantable_to.contains(&kind) {
            self.grantable_to.push(kind);
        }
        self
    }
}

/// Entitlement id in the form `<type>:<resource>:<slug>`.
pub fn entitlement_id(resource: &ResourceId, slug: &str) -> String {
    format!("{resource}:{slug}")
}

/// Assertion that `principal` holds entitlement `slug` on `resource`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grant {
    pub id: String,
    pub entitlement_id: String,
    pub resource: ResourceId,
    pub slug: String,
    pub principal: Resource,
}

impl Grant {
    pub fn new(resource: &Resource, slug: impl Into<String>, principal: Resource) -> Self {
        let slug = slug.into();
        let entitlement_id = entitlement_id(&resource.id, &slug);
        Self {
            id: format!("{entitlement_id}:{}", principal.id),
            entitlement_id,
            resource: resource.id.clone(),
            slug,
            principal,
        }
    }
}

/// Title-case a display string: the first letter of every word upper case,
/// the rest lower case.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;

    for c in s.chars() {
        if c.is_alphanumeric() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            // "o'neil" stays one word
            at_word_start = c != '\'';
        }
    }

    out
}
