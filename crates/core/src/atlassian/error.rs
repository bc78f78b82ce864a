//! Classification of failed Jira calls into user-facing messages

use serde::Deserialize;

/// Failure of an Epic lookup or a Jira call
///
/// `Display` renders the message shown to the user; no structured error
/// crosses the command boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JiraError {
    /// The input is neither an issue key nor a browse URL
    #[error("Invalid Epic URL or key format")]
    InvalidFormat,

    /// No response was received
    #[error("Network error: {0}")]
    Network(String),

    /// Jira answered with a non-success status.
    ///
    /// Status `0` means the host could not be reached at all.
    #[error("{}", http_message(.status, .server_messages, .reason))]
    Http {
        status: u16,
        server_messages: Vec<String>,
        reason: Option<String>,
    },
}

impl JiraError {
    /// The host refused the connection or could not be resolved
    pub fn unreachable() -> Self {
        JiraError::Http {
            status: 0,
            server_messages: Vec::new(),
            reason: None,
        }
    }

    /// Build an HTTP failure from a response status, its reason phrase and raw body
    pub fn from_response(status: u16, reason: Option<&str>, body: &str) -> Self {
        JiraError::Http {
            status,
            server_messages: parse_error_messages(body),
            reason: reason.map(str::to_string),
        }
    }

    /// HTTP status of the failure, if Jira was involved at all
    pub fn status(&self) -> Option<u16> {
        match self {
            JiraError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Error body returned by Jira REST endpoints
#[derive(Debug, Deserialize, Default)]
struct JiraErrorBody {
    #[serde(rename = "errorMessages", default)]
    error_messages: Vec<String>,
}

/// Extract `errorMessages` from a Jira error body
///
/// Bodies that are not JSON (HTML error pages from proxies, empty bodies) yield no messages.
pub fn parse_error_messages(body: &str) -> Vec<String> {
    serde_json::from_str::<JiraErrorBody>(body)
        .map(|b| b.error_messages)
        .unwrap_or_default()
}

/// Map an HTTP status to the message shown to the user
///
/// # Arguments
/// * `status` - HTTP status code, `0` when the host was unreachable
/// * `server_messages` - `errorMessages` from the Jira error body
/// * `reason` - Canonical reason phrase, used when the server sent no messages
pub fn classify_http_status(status: u16, server_messages: &[String], reason: Option<&str>) -> String {
    let joined = (!server_messages.is_empty()).then(|| server_messages.join(", "));

    match status {
        0 => "Unable to connect to Jira. Please ensure you are connected to the VPN and restart the dev server.".to_string(),
        401 => "Unauthorized. Please enter a valid Personal Access Token.".to_string(),
        403 => "Forbidden. You do not have permission to access this Epic or Basic Auth is disabled.".to_string(),
        404 => "Epic not found. Please check the Epic key.".to_string(),
        400 => format!(
            "Invalid request: {}",
            joined.unwrap_or_else(|| "Please check the Epic key format.".to_string())
        ),
        429 => "Rate limit exceeded. Too many requests to Jira. Please wait a few minutes and try again.".to_string(),
        status => format!(
            "Server error: {} - {}",
            status,
            joined.unwrap_or_else(|| reason.unwrap_or("Unknown error").to_string())
        ),
    }
}

fn http_message(status: &u16, server_messages: &[String], reason: &Option<String>) -> String {
    classify_http_status(*status, server_messages, reason.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_classify_status_zero_mentions_vpn() {
        let msg = classify_http_status(0, &[], None);
        assert!(msg.contains("VPN"));
    }

    #[test]
    fn test_classify_404_mentions_not_found() {
        let msg = classify_http_status(404, &[], Some("Not Found"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn test_classify_auth_statuses() {
        assert!(classify_http_status(401, &[], None).contains("Personal Access Token"));
        assert!(classify_http_status(403, &[], None).starts_with("Forbidden"));
        assert!(classify_http_status(429, &[], None).starts_with("Rate limit exceeded"));
    }

    #[test]
    fn test_classify_400_joins_server_messages() {
        let msg = classify_http_status(
            400,
            &messages(&["Field 'parent' is invalid", "Bad JQL"]),
            None,
        );
        assert_eq!(msg, "Invalid request: Field 'parent' is invalid, Bad JQL");
    }

    #[test]
    fn test_classify_400_without_messages() {
        let msg = classify_http_status(400, &[], Some("Bad Request"));
        assert_eq!(msg, "Invalid request: Please check the Epic key format.");
    }

    #[test]
    fn test_classify_other_status_prefers_server_messages() {
        let msg = classify_http_status(500, &messages(&["Internal failure"]), Some("Internal Server Error"));
        assert_eq!(msg, "Server error: 500 - Internal failure");
    }

    #[test]
    fn test_classify_other_status_falls_back_to_reason() {
        let msg = classify_http_status(503, &[], Some("Service Unavailable"));
        assert_eq!(msg, "Server error: 503 - Service Unavailable");

        let msg = classify_http_status(599, &[], None);
        assert_eq!(msg, "Server error: 599 - Unknown error");
    }

    #[test]
    fn test_parse_error_messages() {
        let body = r#"{"errorMessages":["The value 'XYZ-1' does not exist"],"errors":{}}"#;
        assert_eq!(
            parse_error_messages(body),
            messages(&["The value 'XYZ-1' does not exist"])
        );
    }

    #[test]
    fn test_parse_error_messages_non_json_body() {
        assert!(parse_error_messages("<html>Bad Gateway</html>").is_empty());
        assert!(parse_error_messages("").is_empty());
        assert!(parse_error_messages(r#"{"errors":{"jql":"bad"}}"#).is_empty());
    }

    #[test]
    fn test_jira_error_display() {
        assert_eq!(
            JiraError::InvalidFormat.to_string(),
            "Invalid Epic URL or key format"
        );
        assert_eq!(
            JiraError::Network("connection reset".to_string()).to_string(),
            "Network error: connection reset"
        );
        assert!(JiraError::unreachable().to_string().contains("VPN"));

        let err = JiraError::from_response(400, Some("Bad Request"), r#"{"errorMessages":["bad jql"]}"#);
        assert_eq!(err.to_string(), "Invalid request: bad jql");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_jira_error_status_for_non_http() {
        assert_eq!(JiraError::InvalidFormat.status(), None);
        assert_eq!(JiraError::Network("x".to_string()).status(), None);
        assert_eq!(JiraError::unreachable().status(), Some(0));
    }
}
