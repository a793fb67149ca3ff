//! Connector Framework type definitions
//!
//! Enums describing the kinds of nodes in the identity graph.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of a directory resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Organization (a grouping that owns role entitlements).
    #[serde(rename = "org")]
    Organization,
    /// Individual user account.
    User,
}

impl ResourceKind {
    /// Get all resource kinds, in sync order.
    #[must_use]
    pub fn all() -> &'static [ResourceKind] {
        &[ResourceKind::Organization, ResourceKind::User]
    }

    /// Get the resource type id used in cursors and graph ids.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Organization => "org",
            ResourceKind::User => "user",
        }
    }

    /// Human readable name of the resource type.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            ResourceKind::Organization => "Org",
            ResourceKind::User => "User",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ParseResourceKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "org" | "organization" => Ok(ResourceKind::Organization),
            "user" => Ok(ResourceKind::User),
            _ => Err(ParseResourceKindError(s.to_string())),
        }
    }
}

/// Error parsing resource kind from string.
#[derive(Debug, Clone)]
pub struct ParseResourceKindError(String);

impl fmt::Display for ParseResourceKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid resource type '{}', expected one of: org, user",
            self.0
        )
    }
}

impl std::error::Error for ParseResourceKindError {}

/// Trait a resource type carries in the governance platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceTrait {
    Group,
    User,
}

/// Account status of a user resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Enabled,
    Disabled,
}

impl UserStatus {
    /// Status for a directory account with the given disabled flag.
    #[must_use]
    pub fn from_disabled(is_disabled: bool) -> Self {
        if is_disabled {
            UserStatus::Disabled
        } else {
            UserStatus::Enabled
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Enabled => "enabled",
            UserStatus::Disabled => "disabled",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a granted entitlement means to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EntitlementPurpose {
    #[default]
    Permission,
}
