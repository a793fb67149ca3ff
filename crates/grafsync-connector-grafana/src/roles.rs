//! Grafana organization roles.

use std::fmt;

const GRANTABLE: &[Role] = &[Role::Viewer, Role::Editor, Role::Admin];

/// Role a user holds inside an organization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Viewer,
    Editor,
    Admin,
    /// Any role string the connector does not model, kept verbatim.
    Unknown(String),
}

impl Role {
    /// Every grantable role, in entitlement order.
    pub fn all() -> &'static [Role] {
        GRANTABLE
    }

    /// Parse a raw role string, ignoring case and surrounding whitespace.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        Role::all()
            .iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(trimmed))
            .cloned()
            .unwrap_or_else(|| Role::Unknown(raw.to_string()))
    }

    /// The grantable role for a raw string; unknown roles yield `None`.
    pub fn grantable(raw: &str) -> Option<Self> {
        match Role::parse(raw) {
            Role::Unknown(_) => None,
            role => Some(role),
        }
    }

    /// Canonical name, also used as the entitlement slug.
    pub fn as_str(&self) -> &str {
        match self {
            Role::Viewer => "Viewer",
            Role::Editor => "Editor",
            Role::Admin => "Admin",
            Role::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
