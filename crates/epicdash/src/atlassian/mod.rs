use epicdash_core::atlassian::error::JiraError;
use serde::de::DeserializeOwned;

use crate::prelude::*;

pub mod epic;
pub mod myself;

/// Jira host used when `JIRA_BASE_URL` is not set
pub const DEFAULT_BASE_URL: &str = "https://jira.tools.sap";

/// Jira configuration from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct JiraConfig {
    pub base_url: String,
}

impl JiraConfig {
    /// Load configuration from environment variables
    /// Uses JIRA_BASE_URL with default fallback
    pub fn from_env() -> Self {
        Self::from_base_url(
            std::env::var("JIRA_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        )
    }

    fn from_base_url(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Apply CLI overrides to the configuration
    pub fn with_overrides(self, base_url: Option<String>) -> Self {
        match base_url {
            Some(url) => Self::from_base_url(url),
            None => self,
        }
    }

    /// Absolute URL of a REST resource, e.g. `api/2/myself`
    pub fn rest_url(&self, resource: &str) -> String {
        format!("{}/rest/{}", self.base_url, resource.trim_start_matches('/'))
    }
}

/// Credentials sent with a single request
///
/// Passed explicitly into every client that needs them; nothing is kept between calls.
#[derive(Clone, Default)]
pub struct Credentials {
    pub token: Option<String>,
}

impl Credentials {
    /// Credentials from an optional token; blank tokens count as absent
    pub fn from_token(token: Option<String>) -> Self {
        Self {
            token: token
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Connection flags shared by every command talking to Jira
#[derive(Debug, Clone, clap::Args)]
pub struct ConnectionOptions {
    /// Jira base URL (defaults to JIRA_BASE_URL or https://jira.tools.sap)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Personal Access Token, sent as a Bearer token
    #[arg(long, env = "JIRA_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

impl ConnectionOptions {
    pub fn resolve(&self) -> (JiraConfig, Credentials) {
        (
            JiraConfig::from_env().with_overrides(self.base_url.clone()),
            Credentials::from_token(self.token.clone()),
        )
    }
}

/// Create an HTTP client sending JSON headers and, when present, a Bearer token
pub fn create_jira_client(credentials: &Credentials) -> Result<reqwest::Client> {
    use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    if let Some(token) = &credentials.token {
        log::debug!("Using Bearer token authentication");
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| eyre!("Invalid header value: {}", e))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    reqwest::Client::builder()
        .default_headers(headers)
        .cookie_store(true)
        .build()
        .map_err(|e| eyre!("Failed to build HTTP client: {}", e))
}

/// Map a transport failure to a Jira error
///
/// Refused connections and unresolvable hosts surface as status `0`, which
/// carries the VPN hint.
fn classify_send_error(err: reqwest::Error) -> JiraError {
    if err.is_connect() {
        JiraError::unreachable()
    } else {
        JiraError::Network(err.to_string())
    }
}

/// GET a Jira resource and deserialize its JSON body
///
/// Non-success statuses are returned as `JiraError::Http` with the server's
/// `errorMessages`. A success body that cannot be parsed is reported against
/// its status, as the browser client did.
pub async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    query: &[(&str, &str)],
) -> std::result::Result<T, JiraError> {
    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(classify_send_error)?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| JiraError::Network(e.to_string()))?;

    log::debug!("GET {} -> {} ({} bytes)", url, status, body.len());

    if !status.is_success() {
        log::debug!("Jira error body: {}", body);
        return Err(JiraError::from_response(
            status.as_u16(),
            status.canonical_reason(),
            &body,
        ));
    }

    serde_json::from_str(&body).map_err(|e| JiraError::Http {
        status: status.as_u16(),
        server_messages: Vec::new(),
        reason: Some(format!("Failed to parse Jira response: {e}")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{spawn_stub, unused_base_url};
    use axum::{http::StatusCode, routing::get, Json, Router};

    #[test]
    fn test_jira_config_override_trims_slash() {
        let config = JiraConfig::from_base_url("https://a.example.com".to_string())
            .with_overrides(Some("https://b.example.com/".to_string()));
        assert_eq!(config.base_url, "https://b.example.com");
    }

    #[test]
    fn test_jira_config_without_override() {
        let config = JiraConfig::from_base_url("https://a.example.com/".to_string())
            .with_overrides(None);
        assert_eq!(config.base_url, "https://a.example.com");
    }

    #[test]
    fn test_rest_url() {
        let config = JiraConfig::from_base_url("https://jira.example.com".to_string());
        assert_eq!(
            config.rest_url("api/2/search"),
            "https://jira.example.com/rest/api/2/search"
        );
        assert_eq!(
            config.rest_url("/api/2/myself"),
            "https://jira.example.com/rest/api/2/myself"
        );
    }

    #[test]
    fn test_credentials_blank_token_is_absent() {
        assert!(!Credentials::from_token(None).has_token());
        assert!(!Credentials::from_token(Some("   ".to_string())).has_token());
        assert_eq!(
            Credentials::from_token(Some(" abc ".to_string())).token,
            Some("abc".to_string())
        );
    }

    #[test]
    fn test_credentials_debug_redacts_token() {
        let debug = format!("{:?}", Credentials::from_token(Some("s3cret".to_string())));
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("redacted"));
    }

    #[tokio::test]
    async fn test_get_json_success() {
        let base = spawn_stub(Router::new().route(
            "/rest/ok",
            get(|| async { Json(serde_json::json!({"value": 7})) }),
        ))
        .await;
        let client = create_jira_client(&Credentials::default()).unwrap();

        let value: serde_json::Value = get_json(&client, &format!("{base}/rest/ok"), &[])
            .await
            .unwrap();

        assert_eq!(value["value"], 7);
    }

    #[tokio::test]
    async fn test_get_json_error_status_is_classified() {
        let base = spawn_stub(Router::new().route(
            "/rest/bad",
            get(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({"errorMessages": ["Bad JQL"], "errors": {}})),
                )
            }),
        ))
        .await;
        let client = create_jira_client(&Credentials::default()).unwrap();

        let err = get_json::<serde_json::Value>(&client, &format!("{base}/rest/bad"), &[])
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert_eq!(err.to_string(), "Invalid request: Bad JQL");
    }

    #[tokio::test]
    async fn test_get_json_unparseable_body() {
        let base = spawn_stub(Router::new().route("/rest/html", get(|| async { "<html></html>" })))
            .await;
        let client = create_jira_client(&Credentials::default()).unwrap();

        let err = get_json::<serde_json::Value>(&client, &format!("{base}/rest/html"), &[])
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(200));
        assert!(err.to_string().starts_with("Server error: 200 - Failed to parse Jira response"));
    }

    #[tokio::test]
    async fn test_get_json_unreachable_host_mentions_vpn() {
        let base = unused_base_url().await;
        let client = create_jira_client(&Credentials::default()).unwrap();

        let err = get_json::<serde_json::Value>(&client, &format!("{base}/rest/api/2/myself"), &[])
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(0));
        assert!(err.to_string().contains("VPN"));
    }
}
