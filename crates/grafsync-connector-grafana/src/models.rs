//! Raw records returned by the Grafana HTTP API.

use serde::{Deserialize, Serialize};

/// Organization visible to the authenticated user (`/api/user/orgs`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrafanaOrg {
    #[serde(rename = "orgId")]
    pub id: i64,
    pub name: String,
    /// Role of the authenticated user in this organization.
    #[serde(default)]
    pub role: Option<String>,
}

/// User account as listed inside an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrafanaUser {
    #[serde(rename = "userId")]
    pub id: i64,
    pub login: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_disabled: bool,
    #[serde(default)]
    pub last_seen_at: Option<String>,
    #[serde(default)]
    pub auth_labels: Option<Vec<String>>,
}

/// Membership of a user in an organization (`/api/orgs/{id}/users`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgMembership {
    pub user_id: i64,
    pub org_id: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub login: String,
    /// Raw role string; anything outside Viewer/Editor/Admin is ignored.
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_disabled: bool,
    #[serde(default)]
    pub last_seen_at: Option<String>,
    #[serde(default)]
    pub auth_labels: Option<Vec<String>>,
}

impl OrgMembership {
    /// The user half of the membership record.
    #[must_use]
    pub fn to_user(&self) -> GrafanaUser {
        GrafanaUser {
            id: self.user_id,
            login: self.login.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            avatar_url: self.avatar_url.clone(),
            is_disabled: self.is_disabled,
            last_seen_at: self.last_seen_at.clone(),
            auth_labels: self.auth_labels.clone(),
        }
    }
}

/// Envelope of `/api/orgs/{id}/users/search`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgUserSearchResponse {
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub org_users: Vec<GrafanaUser>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// Error body returned by Grafana on failure.
#[derive(Debug, Clone, Deserialize)]
pub struct GrafanaErrorBody {
    pub message: String,
}
