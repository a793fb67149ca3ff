//! In-memory directory for projector tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::client::DirectoryClient;
use crate::error::{GrafanaError, GrafanaResult};
use crate::models::{GrafanaOrg, GrafanaUser, OrgMembership};

pub fn org(id: i64, name: &str) -> GrafanaOrg {
    GrafanaOrg {
        id,
        name: name.to_string(),
        role: None,
    }
}

pub fn user(id: i64, login: &str) -> GrafanaUser {
    GrafanaUser {
        id,
        login: login.to_string(),
        name: String::new(),
        email: String::new(),
        avatar_url: None,
        is_disabled: false,
        last_seen_at: None,
        auth_labels: None,
    }
}

pub fn membership(org_id: i64, user_id: i64, login: &str, role: &str) -> OrgMembership {
    OrgMembership {
        user_id,
        org_id,
        email: format!("{login}@example.com"),
        name: String::new(),
        login: login.to_string(),
        role: role.to_string(),
        avatar_url: None,
        is_disabled: false,
        last_seen_at: None,
        auth_labels: None,
    }
}

/// Serves fixed records, slicing them into pages like the real API.
#[derive(Default)]
pub struct FakeDirectory {
    orgs: Vec<GrafanaOrg>,
    org_users: HashMap<String, Vec<GrafanaUser>>,
    members: HashMap<String, Vec<OrgMembership>>,
    failing: bool,
    requested_pages: Mutex<Vec<u32>>,
}

impl FakeDirectory {
    pub fn with_orgs(mut self, orgs: Vec<GrafanaOrg>) -> Self {
        self.orgs = orgs;
        self
    }

    pub fn with_org_users(mut self, org_id: &str, users: Vec<GrafanaUser>) -> Self {
        self.org_users.insert(org_id.to_string(), users);
        self
    }

    pub fn with_members(mut self, org_id: &str, members: Vec<OrgMembership>) -> Self {
        self.members.insert(org_id.to_string(), members);
        self
    }

    /// Every call fails with a 503.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Page numbers requested so far, in order.
    pub fn requested_pages(&self) -> Vec<u32> {
        self.requested_pages
            .lock()
            .map(|pages| pages.clone())
            .unwrap_or_default()
    }

    fn check(&self) -> GrafanaResult<()> {
        if self.failing {
            return Err(GrafanaError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn slice<T: Clone>(&self, records: &[T], page: u32, page_size: u32) -> Vec<T> {
        if let Ok(mut pages) = self.requested_pages.lock() {
            pages.push(page);
        }
        let start = (page.saturating_sub(1) as usize) * page_size as usize;
        records
            .iter()
            .skip(start)
            .take(page_size as usize)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl DirectoryClient for FakeDirectory {
    async fn fetch_organizations(
        &self,
        page: u32,
        page_size: u32,
    ) -> GrafanaResult<Vec<GrafanaOrg>> {
        self.check()?;
        Ok(self.slice(&self.orgs, page, page_size))
    }

    async fn fetch_users_in_org(
        &self,
        org_id: &str,
        page: u32,
        page_size: u32,
    ) -> GrafanaResult<Vec<GrafanaUser>> {
        self.check()?;
        let users = self.org_users.get(org_id).cloned().unwrap_or_default();
        Ok(self.slice(&users, page, page_size))
    }

    async fn fetch_members_of_org(&self, org_id: &str) -> GrafanaResult<Vec<OrgMembership>> {
        self.check()?;
        Ok(self.members.get(org_id).cloned().unwrap_or_default())
    }
}
