//! Common test utilities for grafsync-connector-grafana integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use grafsync_connector::config::ConnectionSettings;
use grafsync_connector_grafana::GrafanaConfig;

pub const TEST_TOKEN: &str = "glsa_test_token";

/// Test data factory for organizations as returned by `/api/user/orgs`.
pub fn create_test_org(id: i64, name: &str) -> Value {
    json!({
        "orgId": id,
        "name": name,
        "role": "Admin"
    })
}

/// Test data factory for users as returned by `/api/orgs/{id}/users/search`.
pub fn create_test_user(id: i64, login: &str) -> Value {
    json!({
        "orgId": 1,
        "userId": id,
        "email": format!("{}@example.com", login),
        "name": format!("Test User {}", login),
        "avatarUrl": "/avatar/0",
        "login": login,
        "role": "Viewer",
        "lastSeenAt": "2024-01-15T10:00:00Z",
        "lastSeenAtAge": "1m",
        "isDisabled": false,
        "authLabels": null
    })
}

/// Test data factory for memberships as returned by `/api/orgs/{id}/users`.
pub fn create_membership(org_id: i64, user_id: i64, login: &str, role: &str) -> Value {
    let mut member = create_test_user(user_id, login);
    member["orgId"] = json!(org_id);
    member["role"] = json!(role);
    member
}

/// Grafana error body.
pub fn create_error(message: &str) -> Value {
    json!({ "message": message })
}

/// Config pointing at a mock server with fast retries.
pub fn create_config(base_url: &str, page_size: u32) -> GrafanaConfig {
    GrafanaConfig::new(base_url, "admin")
        .with_access_token(TEST_TOKEN)
        .with_page_size(page_size)
        .with_connection(
            ConnectionSettings::new()
                .with_connection_timeout(5)
                .with_read_timeout(5)
                .with_retries(2, 10),
        )
}

/// Mock server wrapper with Grafana endpoint helpers.
pub struct MockGrafanaServer {
    pub server: MockServer,
}

impl MockGrafanaServer {
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Sets up `/api/user` for the credential check.
    pub async fn mock_current_user(&self) {
        Mock::given(method("GET"))
            .and(path("/api/user"))
            .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1,
                "login": "admin",
                "email": "admin@localhost",
                "orgId": 1,
                "isGrafanaAdmin": true
            })))
            .mount(&self.server)
            .await;
    }

    /// Sets up `/api/user/orgs`, one mock per page including the empty page
    /// after a full last page.
    pub async fn mock_orgs(&self, orgs: Vec<Value>, page_size: usize) {
        for (page, items) in paged(&orgs, page_size) {
            Mock::given(method("GET"))
                .and(path("/api/user/orgs"))
                .and(query_param("perpage", page_size.to_string()))
                .and(query_param("page", page.to_string()))
                .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(items)))
                .mount(&self.server)
                .await;
        }
    }

    /// Sets up `/api/orgs/{id}/users/search`, paged like [`Self::mock_orgs`].
    pub async fn mock_org_users(&self, org_id: i64, users: Vec<Value>, page_size: usize) {
        let total = users.len();
        for (page, items) in paged(&users, page_size) {
            Mock::given(method("GET"))
                .and(path(format!("/api/orgs/{org_id}/users/search")))
                .and(query_param("perpage", page_size.to_string()))
                .and(query_param("page", page.to_string()))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "totalCount": total,
                    "orgUsers": items,
                    "page": page,
                    "perPage": page_size
                })))
                .mount(&self.server)
                .await;
        }
    }

    /// Sets up `/api/orgs/{id}/users`.
    pub async fn mock_org_members(&self, org_id: i64, members: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path(format!("/api/orgs/{org_id}/users")))
            .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(members)))
            .mount(&self.server)
            .await;
    }

    /// Sets up `times` responses with `status` on `path_str`, ahead of any
    /// later mock for the same path.
    pub async fn mock_failures(&self, path_str: &str, status: u16, times: u64) {
        Mock::given(method("GET"))
            .and(path(path_str))
            .respond_with(ResponseTemplate::new(status).insert_header("Retry-After", "0"))
            .up_to_n_times(times)
            .expect(times)
            .mount(&self.server)
            .await;
    }
}

/// Split into 1-based pages; a trailing empty page follows a full last page.
fn paged(items: &[Value], page_size: usize) -> Vec<(usize, Vec<Value>)> {
    let mut pages: Vec<(usize, Vec<Value>)> = items
        .chunks(page_size)
        .enumerate()
        .map(|(i, chunk)| (i + 1, chunk.to_vec()))
        .collect();

    if items.len() % page_size == 0 {
        pages.push((pages.len() + 1, Vec::new()));
    }
    pages
}
