//! Grafana HTTP API client.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, RETRY_AFTER};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use grafsync_connector::config::ConnectionSettings;

use crate::config::GrafanaConfig;
use crate::error::{GrafanaError, GrafanaResult};
use crate::models::{
    GrafanaErrorBody, GrafanaOrg, GrafanaUser, OrgMembership, OrgUserSearchResponse,
};

/// Longest delay honoured from a `Retry-After` header.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Read access to the directory the projectors need.
///
/// Page numbers are 1-based. A page shorter than `page_size` is the last one.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Organizations visible to the authenticated account.
    async fn fetch_organizations(&self, page: u32, page_size: u32)
        -> GrafanaResult<Vec<GrafanaOrg>>;

    /// Users belonging to one organization.
    async fn fetch_users_in_org(
        &self,
        org_id: &str,
        page: u32,
        page_size: u32,
    ) -> GrafanaResult<Vec<GrafanaUser>>;

    /// Every membership of one organization, with the member's role.
    async fn fetch_members_of_org(&self, org_id: &str) -> GrafanaResult<Vec<OrgMembership>>;
}

/// Client for the Grafana HTTP API.
#[derive(Debug, Clone)]
pub struct GrafanaClient {
    http_client: reqwest::Client,
    base_url: Url,
    settings: ConnectionSettings,
}

impl GrafanaClient {
    /// Build a client without contacting the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or credentials cannot be used.
    pub fn new(config: &GrafanaConfig) -> GrafanaResult<Self> {
        let mut base_url = Url::parse(&config.base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        if let Some(value) = config.auth().authorization_header() {
            let mut value = HeaderValue::from_str(&value).map_err(|_| {
                GrafanaError::Config("credentials contain invalid characters".into())
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(config.connection.connection_timeout())
            .timeout(config.connection.read_timeout())
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            settings: config.connection.clone(),
        })
    }

    /// Build a client and verify the credentials against `/api/user`.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the credentials or is unreachable.
    #[instrument(skip(config), fields(base_url = %config.base_url))]
    pub async fn connect(config: &GrafanaConfig) -> GrafanaResult<Self> {
        let client = Self::new(config)?;
        let user = client.current_user().await?;
        debug!(login = %user.login, "Authenticated against Grafana");
        Ok(client)
    }

    /// The authenticated account.
    pub async fn current_user(&self) -> GrafanaResult<CurrentUser> {
        self.get("api/user", &[]).await
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> GrafanaResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// GET `path` with retries on throttling and transient failures.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> GrafanaResult<T> {
        let url = self.endpoint(path)?;
        let max_retries = self.settings.max_retries;
        let mut attempt = 0u32;

        loop {
            let result = self.http_client.get(url.clone()).query(query).send().await;

            let response = match result {
                Ok(response) => response,
                Err(e) if (e.is_connect() || e.is_timeout()) && attempt < max_retries => {
                    attempt += 1;
                    let delay = self.settings.retry_delay(attempt);
                    warn!(
                        "Network error on {}, retry {}/{} after {:?}: {}",
                        path, attempt, max_retries, delay, e
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }
                Err(e) if attempt > 0 => {
                    return Err(GrafanaError::MaxRetriesExceeded {
                        attempts: attempt + 1,
                        last_error: e.to_string(),
                    })
                }
                Err(e) if e.is_timeout() => {
                    return Err(GrafanaError::Timeout {
                        timeout_secs: self.settings.read_timeout_secs,
                    })
                }
                Err(e) => return Err(e.into()),
            };

            let status = response.status();

            if is_retryable(status) {
                if attempt < max_retries {
                    attempt += 1;
                    let delay = retry_after(response.headers())
                        .unwrap_or_else(|| self.settings.retry_delay(attempt));
                    warn!(
                        "Transient error {}, retry {}/{} after {:?}",
                        status, attempt, max_retries, delay
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }
                if attempt > 0 {
                    return Err(GrafanaError::MaxRetriesExceeded {
                        attempts: attempt + 1,
                        last_error: status.to_string(),
                    });
                }
            }

            if status.is_success() {
                debug!(path, %status, "Grafana request succeeded");
                let body = response.bytes().await?;
                return serde_json::from_slice(&body).map_err(|source| GrafanaError::Decode {
                    path: path.to_string(),
                    source,
                });
            }

            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }
    }
}

#[async_trait]
impl DirectoryClient for GrafanaClient {
    #[instrument(skip(self))]
    async fn fetch_organizations(
        &self,
        page: u32,
        page_size: u32,
    ) -> GrafanaResult<Vec<GrafanaOrg>> {
        self.get("api/user/orgs", &page_query(page, page_size)).await
    }

    #[instrument(skip(self))]
    async fn fetch_users_in_org(
        &self,
        org_id: &str,
        page: u32,
        page_size: u32,
    ) -> GrafanaResult<Vec<GrafanaUser>> {
        let path = format!("api/orgs/{}/users/search", urlencoding::encode(org_id));
        let response: OrgUserSearchResponse = self.get(&path, &page_query(page, page_size)).await?;
        Ok(response.org_users)
    }

    #[instrument(skip(self))]
    async fn fetch_members_of_org(&self, org_id: &str) -> GrafanaResult<Vec<OrgMembership>> {
        let path = format!("api/orgs/{}/users", urlencoding::encode(org_id));
        self.get(&path, &[]).await
    }
}

/// Account returned by `/api/user`.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: i64,
    pub login: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub org_id: Option<i64>,
    #[serde(default)]
    pub is_grafana_admin: bool,
}

fn page_query(page: u32, page_size: u32) -> [(&'static str, String); 2] {
    [("perpage", page_size.to_string()), ("page", page.to_string())]
}

fn is_retryable(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

/// Delay requested by a `Retry-After` header given in seconds, capped at
/// [`MAX_RETRY_AFTER`].
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|secs| Duration::from_secs(secs).min(MAX_RETRY_AFTER))
}

fn status_error(status: StatusCode, body: &str) -> GrafanaError {
    let message = serde_json::from_str::<GrafanaErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::UNAUTHORIZED => GrafanaError::Auth(message),
        StatusCode::FORBIDDEN => GrafanaError::PermissionDenied(message),
        StatusCode::NOT_FOUND => GrafanaError::NotFound(message),
        _ => GrafanaError::Api {
            status: status.as_u16(),
            message,
        },
    }
}
