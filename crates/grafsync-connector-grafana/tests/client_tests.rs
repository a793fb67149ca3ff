//! HTTP-level tests for the Grafana client.

mod common;

use common::*;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

use std::time::Duration;

use grafsync_connector::config::ConnectionSettings;
use grafsync_connector::error::ConnectorError;
use grafsync_connector_grafana::{DirectoryClient, GrafanaClient, GrafanaConfig, GrafanaError};

#[tokio::test]
async fn test_connect_verifies_credentials() {
    let mock = MockGrafanaServer::new().await;
    mock.mock_current_user().await;

    let client = GrafanaClient::connect(&create_config(&mock.url(), 2)).await.unwrap();
    let user = client.current_user().await.unwrap();
    assert_eq!(user.login, "admin");
    assert!(user.is_grafana_admin);
}

#[tokio::test]
async fn test_connect_rejects_bad_credentials() {
    let mock = MockGrafanaServer::new().await;
    Mock::given(method("GET"))
        .and(path("/api/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(create_error("invalid API key")))
        .mount(&mock.server)
        .await;

    let err = GrafanaClient::connect(&create_config(&mock.url(), 2)).await.unwrap_err();
    assert!(matches!(err, GrafanaError::Auth(ref m) if m == "invalid API key"));

    let err: ConnectorError = err.into();
    assert_eq!(err.error_code(), "AUTH_FAILED");
}

#[tokio::test]
async fn test_basic_auth_header() {
    let mock = MockGrafanaServer::new().await;
    // admin:admin
    Mock::given(method("GET"))
        .and(path("/api/user/orgs"))
        .and(header("authorization", "Basic YWRtaW46YWRtaW4="))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(vec![create_test_org(1, "Main Org.")]),
        )
        .mount(&mock.server)
        .await;

    let config = GrafanaConfig::new(mock.url(), "admin").with_password("admin");
    let client = GrafanaClient::new(&config).unwrap();

    let orgs = client.fetch_organizations(1, 50).await.unwrap();
    assert_eq!(orgs.len(), 1);
    assert_eq!(orgs[0].name, "Main Org.");
}

#[tokio::test]
async fn test_fetch_organizations_sends_page_params() {
    let mock = MockGrafanaServer::new().await;
    mock.mock_orgs(
        vec![
            create_test_org(1, "acme"),
            create_test_org(2, "beta"),
            create_test_org(3, "gamma"),
        ],
        2,
    )
    .await;

    let client = GrafanaClient::new(&create_config(&mock.url(), 2)).unwrap();

    let first = client.fetch_organizations(1, 2).await.unwrap();
    let second = client.fetch_organizations(2, 2).await.unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].id, 3);
}

#[tokio::test]
async fn test_fetch_users_in_org_unwraps_envelope() {
    let mock = MockGrafanaServer::new().await;
    mock.mock_org_users(7, vec![create_test_user(10, "ann")], 50).await;

    let client = GrafanaClient::new(&create_config(&mock.url(), 50)).unwrap();
    let users = client.fetch_users_in_org("7", 1, 50).await.unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].login, "ann");
    assert_eq!(users[0].email, "ann@example.com");
}

#[tokio::test]
async fn test_fetch_members_of_org() {
    let mock = MockGrafanaServer::new().await;
    mock.mock_org_members(
        7,
        vec![
            create_membership(7, 10, "ann", "Admin"),
            create_membership(7, 11, "bob", "Viewer"),
        ],
    )
    .await;

    let client = GrafanaClient::new(&create_config(&mock.url(), 50)).unwrap();
    let members = client.fetch_members_of_org("7").await.unwrap();

    assert_eq!(members.len(), 2);
    assert_eq!(members[0].role, "Admin");
    assert_eq!(members[1].org_id, 7);
}

#[tokio::test]
async fn test_retries_after_rate_limit() {
    let mock = MockGrafanaServer::new().await;
    mock.mock_failures("/api/user/orgs", 429, 1).await;
    mock.mock_orgs(vec![create_test_org(1, "acme")], 50).await;

    let client = GrafanaClient::new(&create_config(&mock.url(), 50)).unwrap();
    let orgs = client.fetch_organizations(1, 50).await.unwrap();
    assert_eq!(orgs.len(), 1);
}

#[tokio::test]
async fn test_retries_transient_gateway_errors() {
    let mock = MockGrafanaServer::new().await;
    mock.mock_failures("/api/orgs/1/users", 503, 2).await;
    mock.mock_org_members(1, vec![create_membership(1, 10, "ann", "Editor")])
        .await;

    let client = GrafanaClient::new(&create_config(&mock.url(), 50)).unwrap();
    let members = client.fetch_members_of_org("1").await.unwrap();
    assert_eq!(members.len(), 1);
}

#[tokio::test]
async fn test_gives_up_after_max_retries() {
    let mock = MockGrafanaServer::new().await;
    // Initial attempt plus two retries.
    mock.mock_failures("/api/user/orgs", 502, 3).await;

    let client = GrafanaClient::new(&create_config(&mock.url(), 50)).unwrap();
    let err = client.fetch_organizations(1, 50).await.unwrap_err();
    assert!(matches!(err, GrafanaError::MaxRetriesExceeded { attempts: 3, .. }));

    let err: ConnectorError = err.into();
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_status_errors_are_typed() {
    let mock = MockGrafanaServer::new().await;
    Mock::given(method("GET"))
        .and(path("/api/orgs/9/users"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(create_error("Organization not found")),
        )
        .mount(&mock.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/orgs/8/users"))
        .respond_with(ResponseTemplate::new(403).set_body_json(create_error("Permission denied")))
        .mount(&mock.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/orgs/7/users"))
        .respond_with(ResponseTemplate::new(500).set_body_json(create_error("database locked")))
        .mount(&mock.server)
        .await;

    let client = GrafanaClient::new(&create_config(&mock.url(), 50)).unwrap();

    let err = client.fetch_members_of_org("9").await.unwrap_err();
    assert!(matches!(err, GrafanaError::NotFound(_)));

    let err = client.fetch_members_of_org("8").await.unwrap_err();
    assert!(matches!(err, GrafanaError::PermissionDenied(_)));

    // 500 is not retried.
    let err = client.fetch_members_of_org("7").await.unwrap_err();
    assert!(matches!(
        err,
        GrafanaError::Api { status: 500, ref message } if message == "database locked"
    ));
}

#[tokio::test]
async fn test_malformed_body_is_permanent_serialization_error() {
    let mock = MockGrafanaServer::new().await;
    Mock::given(method("GET"))
        .and(path("/api/user/orgs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{ "orgId": "not-a-number", "name": "x" }])),
        )
        .expect(1)
        .mount(&mock.server)
        .await;

    let client = GrafanaClient::new(&create_config(&mock.url(), 50)).unwrap();
    let err = client.fetch_organizations(1, 50).await.unwrap_err();
    assert!(matches!(err, GrafanaError::Decode { ref path, .. } if path == "api/user/orgs"));

    let err: ConnectorError = err.into();
    assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    assert!(!err.is_transient());
    assert!(err.to_string().contains("api/user/orgs"));
}

#[tokio::test]
async fn test_timeout_reports_configured_duration() {
    let mock = MockGrafanaServer::new().await;
    Mock::given(method("GET"))
        .and(path("/api/user/orgs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(vec![create_test_org(1, "acme")])
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock.server)
        .await;

    let config = create_config(&mock.url(), 50).with_connection(
        ConnectionSettings::new()
            .with_connection_timeout(1)
            .with_read_timeout(1)
            .with_retries(0, 10),
    );
    let client = GrafanaClient::new(&config).unwrap();

    let err = client.fetch_organizations(1, 50).await.unwrap_err();
    assert!(matches!(err, GrafanaError::Timeout { timeout_secs: 1 }));

    let err: ConnectorError = err.into();
    assert_eq!(err.error_code(), "CONNECTION_TIMEOUT");
    assert!(err.is_transient());
}
