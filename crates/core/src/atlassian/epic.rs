//! Epic key resolution and query building

use std::sync::LazyLock;

use regex::Regex;

use super::error::JiraError;

/// Fields requested from the search endpoint for every Epic child issue
pub const SEARCH_FIELDS: &str = "summary,status,labels,assignee,issuetype";

/// Page size requested from the search endpoint
pub const SEARCH_MAX_RESULTS: u32 = 1000;

static EPIC_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]+-[0-9]+$").expect("epic key pattern is valid"));

static BROWSE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"browse/([A-Z]+-[0-9]+)").expect("browse url pattern is valid"));

/// Resolve user input into a canonical Epic key
///
/// Accepts either a bare key (`CXCDC-30694`) or a browse URL
/// (`https://jira.example.com/browse/CXCDC-30694`). Surrounding whitespace is ignored.
///
/// # Errors
/// * `JiraError::InvalidFormat` - when the input is neither a key nor a browse URL
pub fn extract_epic_key(input: &str) -> Result<String, JiraError> {
    let trimmed = input.trim();

    if EPIC_KEY.is_match(trimmed) {
        return Ok(trimmed.to_string());
    }

    BROWSE_URL
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|key| key.as_str().to_string())
        .ok_or(JiraError::InvalidFormat)
}

/// Build the JQL matching every child of an Epic
///
/// Newer Jira versions link children through `parent`, older ones through the
/// `"Epic Link"` custom field, so both are queried.
pub fn epic_jql(epic_key: &str) -> String {
    format!("parent = {epic_key} OR \"Epic Link\" = {epic_key}")
}

/// Build the browse URL for an issue key
pub fn issue_browse_url(base_url: &str, issue_key: &str) -> String {
    format!("{}/browse/{}", base_url.trim_end_matches('/'), issue_key)
}
