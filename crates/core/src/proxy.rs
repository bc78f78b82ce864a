//! Rewriting rules for the development reverse proxy
//!
//! The proxy lets a locally served client talk to a Jira host that does not
//! allow cross-origin requests. Only paths under [`PROXY_PREFIX`] are forwarded.

use std::sync::LazyLock;

use regex::Regex;

/// Path prefix forwarded to the upstream Jira host
pub const PROXY_PREFIX: &str = "/rest";

/// Headers that describe a single connection and must not be forwarded
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

static COOKIE_DOMAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i);(\s*)domain=[^;]*").expect("cookie domain pattern is valid"));

/// Whether a request path is handled by the proxy
///
/// Matches `/rest` itself and anything below it, but not `/restore`.
pub fn is_proxied_path(path: &str) -> bool {
    path == PROXY_PREFIX
        || path
            .strip_prefix(PROXY_PREFIX)
            .is_some_and(|rest| rest.starts_with('/') || rest.starts_with('?'))
}

/// Build the upstream URL for a proxied request
///
/// # Arguments
/// * `target` - Upstream base URL, e.g. `https://jira.example.com`
/// * `path_and_query` - Path and query of the incoming request
pub fn upstream_url(target: &str, path_and_query: &str) -> String {
    format!("{}{}", target.trim_end_matches('/'), path_and_query)
}

/// Whether a request header should be sent upstream
///
/// `Host` is dropped so the upstream client sets the target host, and
/// `Content-Length` is recomputed from the forwarded body.
pub fn forward_request_header(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name != "host" && name != "content-length" && !HOP_BY_HOP.contains(&name.as_str())
}

/// Whether an upstream response header should be returned to the client
pub fn forward_response_header(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name != "content-length" && !HOP_BY_HOP.contains(&name.as_str())
}

/// Replace the `Domain` attribute of a `Set-Cookie` value
///
/// Cookies without a `Domain` attribute are returned unchanged; they already
/// bind to whatever host served them.
pub fn rewrite_cookie_domain(set_cookie: &str, domain: &str) -> String {
    COOKIE_DOMAIN
        .replace_all(set_cookie, |caps: &regex::Captures| {
            format!(";{}Domain={}", &caps[1], domain)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_proxied_path() {
        assert!(is_proxied_path("/rest"));
        assert!(is_proxied_path("/rest/api/2/search"));
        assert!(is_proxied_path("/rest?x=1"));
        assert!(!is_proxied_path("/restore"));
        assert!(!is_proxied_path("/"));
        assert!(!is_proxied_path("/api/rest"));
    }

    #[test]
    fn test_upstream_url() {
        assert_eq!(
            upstream_url("https://jira.example.com/", "/rest/api/2/myself"),
            "https://jira.example.com/rest/api/2/myself"
        );
        assert_eq!(
            upstream_url("https://jira.example.com", "/rest/api/2/search?jql=a%20b"),
            "https://jira.example.com/rest/api/2/search?jql=a%20b"
        );
    }

    #[test]
    fn test_forward_request_header() {
        assert!(forward_request_header("Authorization"));
        assert!(forward_request_header("cookie"));
        assert!(forward_request_header("Accept"));
        assert!(!forward_request_header("Host"));
        assert!(!forward_request_header("Content-Length"));
        assert!(!forward_request_header("Connection"));
        assert!(!forward_request_header("transfer-encoding"));
    }

    #[test]
    fn test_forward_response_header() {
        assert!(forward_response_header("set-cookie"));
        assert!(forward_response_header("Content-Type"));
        assert!(!forward_response_header("Transfer-Encoding"));
        assert!(!forward_response_header("content-length"));
    }

    #[test]
    fn test_rewrite_cookie_domain() {
        assert_eq!(
            rewrite_cookie_domain(
                "JSESSIONID=abc; Path=/; Domain=jira.tools.sap; HttpOnly",
                "localhost"
            ),
            "JSESSIONID=abc; Path=/; Domain=localhost; HttpOnly"
        );
    }

    #[test]
    fn test_rewrite_cookie_domain_case_insensitive_and_last() {
        assert_eq!(
            rewrite_cookie_domain("a=b;domain=.example.com", "localhost"),
            "a=b;Domain=localhost"
        );
    }

    #[test]
    fn test_rewrite_cookie_domain_without_domain() {
        let cookie = "atlassian.xsrf.token=xyz; Path=/; Secure";
        assert_eq!(rewrite_cookie_domain(cookie, "localhost"), cookie);
    }

    #[test]
    fn test_rewrite_cookie_domain_keeps_cookie_named_domain() {
        let cookie = "domain=abc; Path=/; Domain=jira.example.com";
        assert_eq!(
            rewrite_cookie_domain(cookie, "localhost"),
            "domain=abc; Path=/; Domain=localhost"
        );
        assert_eq!(rewrite_cookie_domain("domain=abc; Path=/", "localhost"), "domain=abc; Path=/");
    }

    #[test]
    fn test_rewrite_cookie_domain_ignores_value_text() {
        // A cookie value containing "domain=" is not an attribute
        let cookie = "pref=domain=x; Domain=jira.example.com";
        assert_eq!(
            rewrite_cookie_domain(cookie, "localhost"),
            "pref=domain=x; Domain=localhost"
        );
    }
}
