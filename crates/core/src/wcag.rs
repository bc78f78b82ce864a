//! Completion statistics for the static WCAG issue export
//!
//! The export is a flat list of issues, each tagged with the accessibility
//! standard it violates. Issues are grouped by standard and summarised into
//! per-standard and overall completion percentages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::status::StatusCategory;

/// Selector that keeps every standard in [`filter_by_standard`]
pub const ALL_STANDARDS: &str = "all";

/// Number of standards shown in the standards chart
pub const TOP_STANDARDS: usize = 10;

/// A tracked accessibility issue, as found in the static export
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct WcagIssue {
    pub issue_number: String,
    pub standard: String,
    pub title: String,
    pub status: String,
}

/// Statistics for a single standard
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StandardStats {
    pub standard: String,
    pub total_items: usize,
    pub status_counts: BTreeMap<String, usize>,
    pub completion_percentage: f64,
    pub issues: Vec<WcagIssue>,
}

impl StandardStats {
    /// Number of issues in a completed status
    pub fn completed_items(&self) -> usize {
        self.status_counts
            .iter()
            .filter(|(status, _)| StatusCategory::of(status).is_completed())
            .map(|(_, count)| count)
            .sum()
    }
}

/// Totals across every standard
#[derive(Debug, Serialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub total_issues: usize,
    pub completed_issues: usize,
    pub in_progress_issues: usize,
    pub overall_completion_percentage: f64,
}

/// Number of issues in a given status
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

/// Total and completed counts of one standard, as drawn in the standards chart
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct StandardBar {
    pub standard: String,
    pub total: usize,
    pub completed: usize,
}

/// Output structure for the analytics command
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct AnalyticsOutput {
    pub overall: OverallStats,
    pub standards: Vec<StandardStats>,
    pub status_distribution: Vec<StatusCount>,
}

/// Colour band of a completion percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionBand {
    /// Exactly 100%
    Complete,
    /// 75% or more
    High,
    /// 50% or more
    Medium,
    /// 25% or more
    Low,
    /// Below 25%
    Critical,
}

/// `100 * completed / total`, or `0` for an empty set
pub fn completion_percentage(completed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64 * 100.0
    }
}

/// Band a completion percentage for display
pub fn completion_band(percentage: f64) -> CompletionBand {
    if percentage >= 100.0 {
        CompletionBand::Complete
    } else if percentage >= 75.0 {
        CompletionBand::High
    } else if percentage >= 50.0 {
        CompletionBand::Medium
    } else if percentage >= 25.0 {
        CompletionBand::Low
    } else {
        CompletionBand::Critical
    }
}

/// Group issues by standard and compute completion statistics
///
/// Standards are sorted by name (case-sensitive, byte order). Each group keeps
/// its issues in input order. Running this twice on the same input yields the
/// same output.
pub fn aggregate(issues: &[WcagIssue]) -> AnalyticsOutput {
    let mut groups: BTreeMap<&str, Vec<&WcagIssue>> = BTreeMap::new();
    for issue in issues {
        groups.entry(issue.standard.as_str()).or_default().push(issue);
    }

    let standards = groups
        .into_iter()
        .map(|(standard, group)| standard_stats(standard, &group))
        .collect();

    AnalyticsOutput {
        overall: overall_stats(issues),
        standards,
        status_distribution: status_distribution(issues),
    }
}

fn standard_stats(standard: &str, issues: &[&WcagIssue]) -> StandardStats {
    let mut status_counts: BTreeMap<String, usize> = BTreeMap::new();
    for issue in issues {
        *status_counts.entry(issue.status.clone()).or_default() += 1;
    }

    let total_items = issues.len();
    let completed = issues
        .iter()
        .filter(|i| StatusCategory::of(&i.status).is_completed())
        .count();

    StandardStats {
        standard: standard.to_string(),
        total_items,
        status_counts,
        completion_percentage: completion_percentage(completed, total_items),
        issues: issues.iter().map(|i| (*i).clone()).collect(),
    }
}

/// Totals across every issue
pub fn overall_stats(issues: &[WcagIssue]) -> OverallStats {
    let categories: Vec<StatusCategory> = issues
        .iter()
        .map(|i| StatusCategory::of(&i.status))
        .collect();

    let total_issues = issues.len();
    let completed_issues = categories.iter().filter(|c| c.is_completed()).count();
    let in_progress_issues = categories.iter().filter(|c| c.is_in_progress()).count();

    OverallStats {
        total_issues,
        completed_issues,
        in_progress_issues,
        overall_completion_percentage: completion_percentage(completed_issues, total_issues),
    }
}

/// Count issues per raw status, in order of first occurrence
pub fn status_distribution(issues: &[WcagIssue]) -> Vec<StatusCount> {
    let mut distribution: Vec<StatusCount> = Vec::new();

    for issue in issues {
        match distribution.iter_mut().find(|s| s.status == issue.status) {
            Some(entry) => entry.count += 1,
            None => distribution.push(StatusCount {
                status: issue.status.clone(),
                count: 1,
            }),
        }
    }

    distribution
}

/// The first `n` standards with their total and completed counts
pub fn top_standards(stats: &[StandardStats], n: usize) -> Vec<StandardBar> {
    stats
        .iter()
        .take(n)
        .map(|s| StandardBar {
            standard: s.standard.clone(),
            total: s.total_items,
            completed: s.completed_items(),
        })
        .collect()
}

/// Issues belonging to one standard, or every issue for [`ALL_STANDARDS`]
pub fn filter_by_standard(issues: &[WcagIssue], selector: &str) -> Vec<WcagIssue> {
    if selector == ALL_STANDARDS {
        return issues.to_vec();
    }

    issues
        .iter()
        .filter(|i| i.standard == selector)
        .cloned()
        .collect()
}

/// Names of every standard, in display order
pub fn standard_names(stats: &[StandardStats]) -> Vec<String> {
    stats.iter().map(|s| s.standard.clone()).collect()
}
