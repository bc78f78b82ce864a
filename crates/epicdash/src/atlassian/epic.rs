use colored::Colorize;
use epicdash_core::atlassian::epic::{epic_jql, extract_epic_key, SEARCH_FIELDS, SEARCH_MAX_RESULTS};
use epicdash_core::atlassian::error::JiraError;
use epicdash_core::atlassian::jira::{
    filter_issues, sort_issues, transform_search_response, EpicIssuesOutput, IssueColumn,
    JiraSearchResponse, SortDirection,
};

use super::{create_jira_client, get_json, ConnectionOptions, Credentials, JiraConfig};
use crate::prelude::{eprintln, println, *};
use crate::style::{format_assignee, format_status};

/// Options for listing the issues of an Epic
#[derive(Debug, clap::Args, Clone)]
#[command(after_help = "EXAMPLES:
  # List the children of an Epic by key:
  epicdash epic CXCDC-30694

  # Paste the browse URL instead:
  epicdash epic https://jira.tools.sap/browse/CXCDC-30694

  # Sort by assignee, descending:
  epicdash epic CXCDC-30694 --sort assignee --desc

  # Only issues mentioning \"contrast\" in any column:
  epicdash epic CXCDC-30694 --filter contrast

NOTES:
  - Children are matched with: parent = <EPIC> OR \"Epic Link\" = <EPIC>
  - Up to 1000 issues are fetched in a single request
  - Set JIRA_TOKEN to a Personal Access Token, or pass --token")]
pub struct EpicOptions {
    /// Epic key (e.g., "CXCDC-30694") or browse URL
    #[clap(env = "JIRA_EPIC")]
    pub epic: String,

    #[clap(flatten)]
    pub connection: ConnectionOptions,

    /// Column to sort by: key, summary, status, labels, assignee, issuetype
    #[arg(long, default_value = "key")]
    pub sort: IssueColumn,

    /// Sort in descending order
    #[arg(long)]
    pub desc: bool,

    /// Only show issues where any column contains this text (case-insensitive)
    #[arg(long)]
    pub filter: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Public data function: resolve the Epic and fetch its children
///
/// The input is validated before any request is made.
pub async fn fetch_epic_issues_data(
    config: &JiraConfig,
    credentials: &Credentials,
    input: &str,
) -> std::result::Result<EpicIssuesOutput, JiraError> {
    let epic_key = extract_epic_key(input)?;
    let jql = epic_jql(&epic_key);

    log::debug!("Fetching issues with JQL: {}", jql);

    let client = create_jira_client(credentials).map_err(|e| JiraError::Network(e.to_string()))?;
    let max_results = SEARCH_MAX_RESULTS.to_string();

    let search_response: JiraSearchResponse = get_json(
        &client,
        &config.rest_url("api/2/search"),
        &[
            ("jql", jql.as_str()),
            ("fields", SEARCH_FIELDS),
            ("maxResults", max_results.as_str()),
        ],
    )
    .await?;

    Ok(transform_search_response(
        &config.base_url,
        &epic_key,
        &jql,
        search_response,
    ))
}

/// Apply the table filter and sort order chosen on the command line
fn arrange(mut data: EpicIssuesOutput, options: &EpicOptions) -> EpicIssuesOutput {
    if let Some(text) = &options.filter {
        data.issues = filter_issues(data.issues, text);
    }

    let direction = if options.desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    data.issues = sort_issues(data.issues, options.sort, direction);

    data
}

/// Handle the epic command
pub async fn handler(options: EpicOptions, global: crate::Global) -> Result<()> {
    if options.epic.trim().is_empty() {
        return Err(Error::EmptyEpicInput.into());
    }

    let (config, credentials) = options.connection.resolve();

    if global.verbose {
        eprintln!("Jira: {}", config.base_url);
        if !credentials.has_token() {
            eprintln!("No token provided, relying on anonymous access");
        }
    }

    let spinner = new_spinner("Fetching Epic issues...")?;
    let result = fetch_epic_issues_data(&config, &credentials, &options.epic).await;
    spinner.finish_and_clear();

    let data = arrange(result.map_err(Error::from)?, &options);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    display_issues(&data, options.filter.as_deref());

    Ok(())
}

/// Message shown instead of an empty table
///
/// An Epic that has children but none matching the filter is not reported as empty.
fn empty_message(data: &EpicIssuesOutput, filter: Option<&str>) -> String {
    match filter.map(str::trim).filter(|text| !text.is_empty()) {
        Some(text) if data.total > 0 => format!(
            "No issues match \"{}\" ({} issue(s) in Epic: {})",
            text, data.total, data.epic_key
        ),
        _ => format!("No issues found for Epic: {}", data.epic_key),
    }
}

/// Print the Epic's issues as a table
fn display_issues(data: &EpicIssuesOutput, filter: Option<&str>) {
    println!(
        "\n{} - {}\n",
        data.epic_key.bold().cyan(),
        data.epic_url().bright_black()
    );

    if data.issues.is_empty() {
        println!("{}", empty_message(data, filter));
        return;
    }

    let mut table = new_table();
    table.add_row(prettytable::row![
        "Key".bold().cyan(),
        "Summary".bold().cyan(),
        "Status".bold().cyan(),
        "Labels".bold().cyan(),
        "Assignee".bold().cyan(),
        "Type".bold().cyan()
    ]);

    for issue in &data.issues {
        table.add_row(prettytable::row![
            issue.key.bright_yellow(),
            issue.summary.bright_white(),
            format_status(&issue.status),
            issue.labels.join(", ").bright_green(),
            format_assignee(&issue.assignee),
            issue.issuetype.bright_blue()
        ]);
    }

    table.printstd();

    println!(
        "\nShowing {} of {} issue(s)",
        data.issues.len().to_string().bold(),
        data.total
    );
}
