use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use epicdash_core::proxy::{
    forward_request_header, forward_response_header, is_proxied_path, rewrite_cookie_domain,
    upstream_url, PROXY_PREFIX,
};
use tower_http::cors::{Any, CorsLayer};

use crate::atlassian::JiraConfig;
use crate::prelude::{eprintln, *};

/// Options for the development reverse proxy
#[derive(Debug, clap::Args, Clone)]
#[command(after_help = "EXAMPLES:
  # Forward http://127.0.0.1:4200/rest/... to JIRA_BASE_URL:
  epicdash proxy

  # Another port and Jira host:
  epicdash proxy --port 8080 --target https://jira.example.com

NOTES:
  - Only paths under /rest are forwarded; everything else gets 404
  - TLS certificates of the target are not verified")]
pub struct ProxyOptions {
    /// Host to bind to
    #[arg(long, env = "EPICDASH_PROXY_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "EPICDASH_PROXY_PORT", default_value = "4200")]
    pub port: u16,

    /// Jira host requests are forwarded to (defaults to JIRA_BASE_URL)
    #[arg(long)]
    pub target: Option<String>,

    /// Domain written into every Set-Cookie header of a response
    #[arg(long, default_value = "localhost")]
    pub cookie_domain: String,
}

/// Shared by every forwarded request
#[derive(Debug)]
pub struct ProxyState {
    pub client: reqwest::Client,
    pub target: String,
    pub cookie_domain: String,
}

impl ProxyState {
    pub fn new(target: &str, cookie_domain: &str) -> Result<Self> {
        Ok(Self {
            client: create_proxy_client()?,
            target: target.trim_end_matches('/').to_string(),
            cookie_domain: cookie_domain.to_string(),
        })
    }
}

/// Upstream client: no certificate checks, redirects handed back to the caller
fn create_proxy_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .map_err(|e| eyre!("Failed to build proxy client: {}", e))
}

/// Router forwarding `/rest` to the target
pub fn router(state: Arc<ProxyState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new().fallback(forward).layer(cors).with_state(state)
}

fn request_headers(headers: &HeaderMap) -> HeaderMap {
    headers
        .iter()
        .filter(|(name, _)| forward_request_header(name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

fn response_header(name: &HeaderName, value: &HeaderValue, cookie_domain: &str) -> HeaderValue {
    if name != SET_COOKIE {
        return value.clone();
    }

    let Ok(cookie) = value.to_str() else {
        return value.clone();
    };

    HeaderValue::from_str(&rewrite_cookie_domain(cookie, cookie_domain)).unwrap_or_else(|e| {
        log::warn!("Keeping Set-Cookie as received: {}", e);
        value.clone()
    })
}

async fn forward(
    State(state): State<Arc<ProxyState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path();

    if !is_proxied_path(path) {
        log::debug!("{} {} is outside {}", method, path, PROXY_PREFIX);
        return (StatusCode::NOT_FOUND, f!("Only {PROXY_PREFIX} is proxied")).into_response();
    }

    let path_and_query = uri.path_and_query().map_or(path, |pq| pq.as_str());
    let url = upstream_url(&state.target, path_and_query);

    log::info!(
        "{} {} (authorization: {}, cookies: {})",
        method,
        path,
        headers.contains_key(AUTHORIZATION),
        headers.contains_key(COOKIE)
    );

    let upstream = state
        .client
        .request(method.clone(), &url)
        .headers(request_headers(&headers))
        .body(body)
        .send()
        .await;

    let upstream = match upstream {
        Ok(upstream) => upstream,
        Err(e) => {
            log::warn!("{} {} failed: {}", method, url, e);
            return (StatusCode::BAD_GATEWAY, f!("Upstream request failed: {e}")).into_response();
        }
    };

    let status = upstream.status();
    let upstream_headers = upstream.headers().clone();

    let bytes = match upstream.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("{} {} body failed: {}", method, url, e);
            return (StatusCode::BAD_GATEWAY, f!("Upstream body failed: {e}")).into_response();
        }
    };

    log::info!("{} {} <- {}", method, path, status);

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;

    let response_headers = response.headers_mut();
    for (name, value) in upstream_headers
        .iter()
        .filter(|(name, _)| forward_response_header(name.as_str()))
    {
        response_headers.append(name.clone(), response_header(name, value, &state.cookie_domain));
    }

    response
}

/// Run the proxy until interrupted
pub async fn run(options: ProxyOptions, global: crate::Global) -> Result<()> {
    let target = JiraConfig::from_env()
        .with_overrides(options.target.clone())
        .base_url;
    let addr = f!("{}:{}", options.host, options.port);

    let state = Arc::new(ProxyState::new(&target, &options.cookie_domain)?);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    if global.verbose {
        eprintln!("Proxy listening on http://{}", addr);
        eprintln!("Forwarding {} to {}", PROXY_PREFIX, target);
    }
    log::info!("Proxy listening on http://{} -> {}", addr, target);

    axum::serve(listener, router(state))
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}
