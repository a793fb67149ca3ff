//! User projector.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, instrument};

use grafsync_connector::error::{ConnectorError, ConnectorResult};
use grafsync_connector::pagination::PageCursor;
use grafsync_connector::resource::{
    Entitlement, Grant, Profile, Resource, ResourceId, ResourceType, UserTrait,
};
use grafsync_connector::traits::{Page, ResourceSyncer};
use grafsync_connector::types::{ResourceKind, UserStatus};

use crate::client::DirectoryClient;
use crate::models::GrafanaUser;

/// Project a directory user into a User resource.
///
/// The login doubles as display name. `parent` scopes the user to an
/// organization.
pub fn user_resource(
    user: &GrafanaUser,
    parent: Option<&ResourceId>,
) -> ConnectorResult<Resource> {
    let user_id = user.id.to_string();
    if user.login.trim().is_empty() {
        return Err(ConnectorError::invalid_data(user_id, "user has an empty login"));
    }

    let status = UserStatus::from_disabled(user.is_disabled);

    let mut profile = Profile::new();
    profile.insert("full_name".to_string(), json!(user.name));
    profile.insert("login".to_string(), json!(user.login));
    profile.insert("user_id".to_string(), json!(user.id));
    profile.insert("email".to_string(), json!(user.email));
    profile.insert("disabled".to_string(), json!(user.is_disabled));
    if let Some(last_seen_at) = &user.last_seen_at {
        profile.insert("last_seen_at".to_string(), json!(last_seen_at));
    }

    let email = (!user.email.is_empty()).then(|| user.email.clone());

    let mut resource = Resource::new(ResourceKind::User, user_id, user.login.clone())?
        .with_profile(profile)?
        .with_user_trait(UserTrait {
            login: user.login.clone(),
            email,
            status,
        });

    if let Some(parent) = parent {
        resource = resource.with_parent(parent.clone());
    }

    Ok(resource)
}

/// Lists the users of one organization.
pub struct UserSyncer {
    client: Arc<dyn DirectoryClient>,
    page_size: u32,
}

impl UserSyncer {
    pub fn new(client: Arc<dyn DirectoryClient>, page_size: u32) -> Self {
        Self { client, page_size }
    }

    async fn list_page(
        &self,
        parent: &ResourceId,
        token: &str,
    ) -> ConnectorResult<Page<Resource>> {
        if parent.resource_type != ResourceKind::Organization {
            return Err(ConnectorError::invalid_data(
                parent.to_string(),
                "users can only be listed inside an organization",
            ));
        }

        let cursor = PageCursor::parse(token, ResourceKind::User, Some(parent.resource.as_str()))?;
        let users = self
            .client
            .fetch_users_in_org(&parent.resource, cursor.page(), self.page_size)
            .await?;
        debug!(
            org_id = %parent.resource,
            page = cursor.page(),
            count = users.len(),
            "Fetched users"
        );

        let fetched = users.len();
        let resources = users
            .iter()
            .map(|user| user_resource(user, Some(parent)))
            .collect::<ConnectorResult<Vec<_>>>()?;

        Ok(Page::new(resources, cursor.advance(self.page_size, fetched)?))
    }
}

#[async_trait]
impl ResourceSyncer for UserSyncer {
    fn resource_type(&self) -> ResourceType {
        ResourceType::user()
    }

    /// Users only exist inside an organization; the top-level listing is empty.
    #[instrument(skip(self, token))]
    async fn list(
        &self,
        parent: Option<&ResourceId>,
        token: &str,
    ) -> ConnectorResult<Page<Resource>> {
        let Some(parent) = parent else {
            return Ok(Page::empty());
        };

        self.list_page(parent, token)
            .await
            .map_err(|e| e.during("list", ResourceKind::User.as_str()))
    }

    async fn entitlements(&self, _resource: &Resource) -> ConnectorResult<Vec<Entitlement>> {
        Ok(Vec::new())
    }

    async fn grants(&self, _resource: &Resource, _token: &str) -> ConnectorResult<Page<Grant>> {
        Ok(Page::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{user, FakeDirectory};
    use grafsync_connector::pagination::Bag;

    fn org_id(id: &str) -> ResourceId {
        ResourceId::new(ResourceKind::Organization, id)
    }

    #[test]
    fn test_user_resource_projection() {
        let mut raw = user(7, "jdoe");
        raw.name = "John Doe".to_string();
        raw.email = "jdoe@example.com".to_string();
        raw.is_disabled = true;

        let resource = user_resource(&raw, Some(&org_id("1"))).unwrap();

        assert_eq!(resource.id.to_string(), "user:7");
        assert_eq!(resource.display_name, "jdoe");
        assert_eq!(resource.parent_resource_id, Some(org_id("1")));
        assert_eq!(resource.profile["login"], json!("jdoe"));
        assert_eq!(resource.profile["user_id"], json!(7));
        assert_eq!(resource.profile["email"], json!("jdoe@example.com"));
        assert_eq!(resource.profile["full_name"], json!("John Doe"));

        let user_trait = resource.user_trait.unwrap();
        assert_eq!(user_trait.status, UserStatus::Disabled);
        assert_eq!(user_trait.email.as_deref(), Some("jdoe@example.com"));
    }

    #[test]
    fn test_user_resource_without_email() {
        let resource = user_resource(&user(3, "svc"), None).unwrap();
        assert!(resource.parent_resource_id.is_none());
        let user_trait = resource.user_trait.unwrap();
        assert_eq!(user_trait.status, UserStatus::Enabled);
        assert!(user_trait.email.is_none());
    }

    #[test]
    fn test_user_resource_rejects_empty_login() {
        let err = user_resource(&user(9, ""), None).unwrap_err();
        assert!(err.to_string().contains('9'));
    }

    #[tokio::test]
    async fn test_list_without_parent_is_empty() {
        let syncer = UserSyncer::new(Arc::new(FakeDirectory::default()), 2);
        let page = syncer.list(None, "").await.unwrap();
        assert!(page.items.is_empty());
        assert!(page.is_last());
    }

    #[tokio::test]
    async fn test_list_pages_through_org_users() {
        let directory = FakeDirectory::default().with_org_users(
            "1",
            vec![user(1, "a"), user(2, "b"), user(3, "c")],
        );
        let syncer = UserSyncer::new(Arc::new(directory), 2);
        let parent = org_id("1");

        let first = syncer.list(Some(&parent), "").await.unwrap();
        assert_eq!(first.items.len(), 2);
        let bag = Bag::unmarshal(&first.next_token).unwrap();
        let frame = bag.current().unwrap();
        assert_eq!(frame.resource_type_id, "user");
        assert_eq!(frame.resource_id, "1");
        assert_eq!(frame.token, "2");

        let second = syncer.list(Some(&parent), &first.next_token).await.unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].display_name, "c");
        assert!(second.is_last());
    }

    #[tokio::test]
    async fn test_list_rejects_cursor_of_other_type() {
        let syncer = UserSyncer::new(Arc::new(FakeDirectory::default()), 2);
        let token = r#"{"current_state":{"token":"2","resource_type_id":"org","resource_id":""}}"#;

        let err = syncer.list(Some(&org_id("1")), token).await.unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CURSOR");
        assert!(err.to_string().starts_with("list for resource type 'user' failed"));
    }

    #[tokio::test]
    async fn test_directory_failure_is_wrapped() {
        let directory = FakeDirectory::default().failing();
        let syncer = UserSyncer::new(Arc::new(directory), 2);

        let err = syncer.list(Some(&org_id("1")), "").await.unwrap_err();
        assert!(matches!(err, ConnectorError::Sync { operation: "list", .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_users_have_no_entitlements_or_grants() {
        let syncer = UserSyncer::new(Arc::new(FakeDirectory::default()), 2);
        let resource = user_resource(&user(1, "a"), None).unwrap();
        assert!(syncer.entitlements(&resource).await.unwrap().is_empty());
        assert!(syncer.grants(&resource, "").await.unwrap().is_last());
    }
}
