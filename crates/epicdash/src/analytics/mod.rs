use std::collections::BTreeMap;

use colored::Colorize;
use epicdash_core::atlassian::epic::issue_browse_url;
use epicdash_core::wcag::{
    aggregate, filter_by_standard, standard_names, top_standards, AnalyticsOutput, OverallStats,
    StandardStats, WcagIssue, ALL_STANDARDS, TOP_STANDARDS,
};

use crate::atlassian::JiraConfig;
use crate::prelude::{eprintln, println, *};
use crate::style::{format_completion, format_status};

pub mod charts;

/// Options for the WCAG analytics view
#[derive(Debug, clap::Args, Clone)]
#[command(after_help = "EXAMPLES:
  # Summarise the export in the current directory:
  epicdash analytics

  # Read the export from a web server:
  epicdash analytics http://localhost:4200/assets/jiraIssues.json

  # List the issues of one standard:
  epicdash analytics --standard 1.4.3

  # Every issue, below the statistics:
  epicdash analytics --issues")]
pub struct AnalyticsOptions {
    /// Path or http(s) URL of the issue export
    #[clap(env = "EPICDASH_ISSUES_FILE", default_value = "jiraIssues.json")]
    pub source: String,

    /// Only list the issues of this standard ("all" lists every issue)
    #[arg(long)]
    pub standard: Option<String>,

    /// List the individual issues below the statistics
    #[arg(long)]
    pub issues: bool,

    /// Jira base URL used for issue links (defaults to JIRA_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn source_error(source: &str, reason: impl std::fmt::Display) -> Error {
    Error::IssuesSource {
        source_name: source.to_string(),
        reason: reason.to_string(),
    }
}

async fn read_source(source: &str) -> std::result::Result<String, Error> {
    if !is_remote(source) {
        return tokio::fs::read_to_string(source)
            .await
            .map_err(|e| source_error(source, e));
    }

    let response = reqwest::get(source)
        .await
        .map_err(|e| source_error(source, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(source_error(source, f!("HTTP {status}")));
    }

    response.text().await.map_err(|e| source_error(source, e))
}

/// Load the WCAG issue export from a local file or an http(s) URL
pub async fn load_issues(source: &str) -> std::result::Result<Vec<WcagIssue>, Error> {
    let content = read_source(source).await?;
    log::debug!("Loaded {} bytes from {}", content.len(), source);

    serde_json::from_str(&content).map_err(|e| source_error(source, e))
}

/// Resolve the `--standard` selector against the standards present
pub fn select_standard<'a>(
    analytics: &AnalyticsOutput,
    standard: Option<&'a str>,
) -> std::result::Result<&'a str, Error> {
    let Some(name) = standard else {
        return Ok(ALL_STANDARDS);
    };

    if name == ALL_STANDARDS || analytics.standards.iter().any(|s| s.standard == name) {
        return Ok(name);
    }

    Err(Error::UnknownStandard {
        name: name.to_string(),
        available: standard_names(&analytics.standards).join(", "),
    })
}

/// JSON document for the selection: everything, or one standard's statistics
fn selection_json(analytics: &AnalyticsOutput, selector: &str) -> serde_json::Result<String> {
    match analytics.standards.iter().find(|s| s.standard == selector) {
        Some(stats) if selector != ALL_STANDARDS => serde_json::to_string_pretty(stats),
        _ => serde_json::to_string_pretty(analytics),
    }
}

/// `Done: 2, To Do: 1` with each status coloured
fn status_breakdown(status_counts: &BTreeMap<String, usize>) -> String {
    status_counts
        .iter()
        .map(|(status, count)| f!("{}: {}", format_status(status), count))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Handle the analytics command
pub async fn handler(options: AnalyticsOptions, global: crate::Global) -> Result<()> {
    if global.verbose {
        eprintln!("Loading issues from {}", options.source);
    }

    let spinner = new_spinner("Loading issues...")?;
    let loaded = load_issues(&options.source).await;
    spinner.finish_and_clear();

    let issues = loaded?;
    let analytics = aggregate(&issues);
    let selector = select_standard(&analytics, options.standard.as_deref())?;

    if options.json {
        println!("{}", selection_json(&analytics, selector)?);
        return Ok(());
    }

    if issues.is_empty() {
        println!("No issues found in {}", options.source);
        return Ok(());
    }

    display_overall(&analytics.overall);
    display_standards(&analytics.standards);

    println!("\n{}\n", "Status distribution".bold().cyan());
    for line in charts::status_chart(&analytics.status_distribution) {
        println!("{line}");
    }

    println!(
        "\n{}\n",
        f!("Top {} standards (total / completed)", TOP_STANDARDS).bold().cyan()
    );
    for line in charts::standards_chart(&top_standards(&analytics.standards, TOP_STANDARDS)) {
        println!("{line}");
    }

    if options.issues || selector != ALL_STANDARDS {
        let config = JiraConfig::from_env().with_overrides(options.base_url.clone());
        display_issues(&filter_by_standard(&issues, selector), selector, &config.base_url);
    }

    Ok(())
}

fn display_overall(overall: &OverallStats) {
    println!("\n{}\n", "WCAG completion".bold().cyan());
    println!("{} {}", "Total issues:".bold(), overall.total_issues);
    println!(
        "{} {}",
        "Completed:".bold(),
        overall.completed_issues.to_string().bright_green()
    );
    println!(
        "{} {}",
        "In progress:".bold(),
        overall.in_progress_issues.to_string().bright_blue()
    );
    println!(
        "{} {}",
        "Overall completion:".bold(),
        format_completion(overall.overall_completion_percentage)
    );
}

fn display_standards(standards: &[StandardStats]) {
    println!();

    let mut table = new_table();
    table.add_row(prettytable::row![
        "Standard".bold().cyan(),
        "Total".bold().cyan(),
        "Completed".bold().cyan(),
        "Completion".bold().cyan(),
        "Statuses".bold().cyan()
    ]);

    for stats in standards {
        table.add_row(prettytable::row![
            stats.standard.bright_yellow(),
            stats.total_items,
            stats.completed_items(),
            format_completion(stats.completion_percentage),
            status_breakdown(&stats.status_counts)
        ]);
    }

    table.printstd();
}

fn display_issues(issues: &[WcagIssue], selector: &str, base_url: &str) {
    let heading = if selector == ALL_STANDARDS {
        "All issues".to_string()
    } else {
        f!("Issues for standard {selector}")
    };
    println!("\n{}\n", heading.bold().cyan());

    let mut table = new_table();
    table.add_row(prettytable::row![
        "Issue".bold().cyan(),
        "Standard".bold().cyan(),
        "Title".bold().cyan(),
        "Status".bold().cyan(),
        "Link".bold().cyan()
    ]);

    for issue in issues {
        table.add_row(prettytable::row![
            issue.issue_number.bright_yellow(),
            issue.standard,
            issue.title.bright_white(),
            format_status(&issue.status),
            issue_browse_url(base_url, &issue.issue_number).bright_black()
        ]);
    }

    table.printstd();
    println!("\nShowing {} issue(s)", issues.len().to_string().bold());
}
