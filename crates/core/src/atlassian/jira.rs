//! Transformation functions for Jira API responses

use std::cmp::Ordering;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use super::epic::issue_browse_url;

/// Assignee shown for issues nobody owns
pub const UNASSIGNED: &str = "Unassigned";

/// Deserialize a field, treating a missing or malformed value as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Jira issue response from API
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct JiraIssueResponse {
    pub key: String,
    #[serde(default)]
    pub fields: JiraIssueFields,
}

/// Fields requested for Epic children
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct JiraIssueFields {
    #[serde(default, deserialize_with = "lenient")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<JiraStatus>,
    #[serde(default, deserialize_with = "lenient")]
    pub labels: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub assignee: Option<JiraUser>,
    #[serde(default, deserialize_with = "lenient")]
    pub issuetype: Option<JiraIssueType>,
}

/// Jira status field
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct JiraStatus {
    pub name: String,
}

/// Jira issue type field
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct JiraIssueType {
    pub name: String,
}

/// Jira user, as returned for assignees and by `/rest/api/2/myself`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct JiraUser {
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(rename = "emailAddress", default)]
    pub email_address: Option<String>,
}

/// Search response from `GET /rest/api/2/search`
#[derive(Debug, Deserialize, Clone, Default)]
pub struct JiraSearchResponse {
    #[serde(default)]
    pub issues: Vec<JiraIssueResponse>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    #[serde(rename = "maxResults")]
    pub max_results: Option<u64>,
    #[serde(default)]
    #[serde(rename = "startAt")]
    pub start_at: Option<u64>,
}

/// Simplified view of a single Epic child issue
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IssueView {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub labels: Vec<String>,
    pub assignee: String,
    pub issuetype: String,
}

/// Output structure for the epic command
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct EpicIssuesOutput {
    pub epic_key: String,
    pub jql: String,
    /// Base URL used to build browse links
    pub base_url: String,
    /// Server-reported total, or the number of returned issues when absent
    pub total: usize,
    pub issues: Vec<IssueView>,
}

impl EpicIssuesOutput {
    /// Browse URL of the Epic itself
    pub fn epic_url(&self) -> String {
        issue_browse_url(&self.base_url, &self.epic_key)
    }

    /// Browse URL of one of the returned issues
    pub fn issue_url(&self, issue_key: &str) -> String {
        issue_browse_url(&self.base_url, issue_key)
    }
}

/// Identity reported by `/rest/api/2/myself`
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ConnectionOutput {
    pub display_name: String,
    pub email_address: String,
}

/// Map raw issue records to view models, preserving order
///
/// Total: a record with missing or malformed nested fields still yields a view,
/// with empty strings for the absent values.
pub fn transform_issues(records: Vec<JiraIssueResponse>) -> Vec<IssueView> {
    records
        .into_iter()
        .map(|issue| {
            let fields = issue.fields;

            let assignee = fields
                .assignee
                .and_then(|a| a.display_name)
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| UNASSIGNED.to_string());

            IssueView {
                key: issue.key,
                summary: fields.summary.unwrap_or_default(),
                status: fields.status.map(|s| s.name).unwrap_or_default(),
                labels: fields.labels.unwrap_or_default(),
                assignee,
                issuetype: fields.issuetype.map(|t| t.name).unwrap_or_default(),
            }
        })
        .collect()
}

/// Convert a Jira search response into the epic command output
///
/// # Arguments
/// * `base_url` - Jira base URL used for browse links
/// * `epic_key` - The resolved Epic key
/// * `jql` - The query that produced the response
/// * `search_response` - The raw response from the search API
pub fn transform_search_response(
    base_url: &str,
    epic_key: &str,
    jql: &str,
    search_response: JiraSearchResponse,
) -> EpicIssuesOutput {
    let issues = transform_issues(search_response.issues);
    let total = search_response
        .total
        .map(|t| t as usize)
        .unwrap_or(issues.len());

    EpicIssuesOutput {
        epic_key: epic_key.to_string(),
        jql: jql.to_string(),
        base_url: base_url.trim_end_matches('/').to_string(),
        total,
        issues,
    }
}

/// Convert the identity endpoint response into a connection report
pub fn transform_myself(user: JiraUser) -> ConnectionOutput {
    ConnectionOutput {
        display_name: user.display_name.unwrap_or_else(|| "Unknown".to_string()),
        email_address: user.email_address.unwrap_or_else(|| "Unknown".to_string()),
    }
}

/// Column of the issue table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueColumn {
    Key,
    Summary,
    Status,
    Labels,
    Assignee,
    IssueType,
}

impl FromStr for IssueColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "key" => Ok(IssueColumn::Key),
            "summary" => Ok(IssueColumn::Summary),
            "status" => Ok(IssueColumn::Status),
            "labels" => Ok(IssueColumn::Labels),
            "assignee" => Ok(IssueColumn::Assignee),
            "issuetype" | "type" => Ok(IssueColumn::IssueType),
            other => Err(format!(
                "Invalid column: {other}. Valid columns: key, summary, status, labels, assignee, issuetype"
            )),
        }
    }
}

/// Sort direction for the issue table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Compare issue keys by project prefix, then numerically by suffix
///
/// `ABC-9` sorts before `ABC-10`. Keys without a numeric suffix fall back to
/// plain string comparison.
pub fn compare_issue_keys(a: &str, b: &str) -> Ordering {
    match (split_key(a), split_key(b)) {
        (Some((pa, na)), Some((pb, nb))) => pa.cmp(pb).then(na.cmp(&nb)),
        _ => a.cmp(b),
    }
}

fn split_key(key: &str) -> Option<(&str, u64)> {
    let (prefix, number) = key.rsplit_once('-')?;
    Some((prefix, number.parse().ok()?))
}

/// Sort issues by a column (stable)
pub fn sort_issues(mut issues: Vec<IssueView>, column: IssueColumn, direction: SortDirection) -> Vec<IssueView> {
    issues.sort_by(|a, b| {
        let ordering = match column {
            IssueColumn::Key => compare_issue_keys(&a.key, &b.key),
            IssueColumn::Summary => a.summary.cmp(&b.summary),
            IssueColumn::Status => a.status.cmp(&b.status),
            IssueColumn::Labels => a.labels.join(", ").cmp(&b.labels.join(", ")),
            IssueColumn::Assignee => a.assignee.cmp(&b.assignee),
            IssueColumn::IssueType => a.issuetype.cmp(&b.issuetype),
        };

        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });

    issues
}

/// Keep issues where any displayed column contains `text`, ignoring case
///
/// A blank filter keeps every issue.
pub fn filter_issues(issues: Vec<IssueView>, text: &str) -> Vec<IssueView> {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return issues;
    }

    issues
        .into_iter()
        .filter(|issue| {
            [
                &issue.key,
                &issue.summary,
                &issue.status,
                &issue.assignee,
                &issue.issuetype,
            ]
            .into_iter()
            .chain(issue.labels.iter())
            .any(|value| value.to_lowercase().contains(&needle))
        })
        .collect()
}
