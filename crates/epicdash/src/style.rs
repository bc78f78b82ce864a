//! Terminal colours shared by the epic and analytics views

use colored::Colorize;
use epicdash_core::status::StatusCategory;
use epicdash_core::wcag::{completion_band, CompletionBand};

/// Colour a raw status by its category
pub fn format_status(status: &str) -> String {
    match StatusCategory::of(status) {
        StatusCategory::Done => status.bright_green().to_string(),
        StatusCategory::InProgress => status.bright_blue().to_string(),
        StatusCategory::ToDo => status.yellow().to_string(),
        StatusCategory::Blocked => status.bright_black().to_string(),
        StatusCategory::Cancelled => status.bright_red().to_string(),
        StatusCategory::Other => status.to_string(),
    }
}

/// Format a completion percentage with one decimal, coloured by band
pub fn format_completion(percentage: f64) -> String {
    let text = format!("{percentage:.1}%");
    match completion_band(percentage) {
        CompletionBand::Complete => text.bright_green().bold().to_string(),
        CompletionBand::High => text.green().to_string(),
        CompletionBand::Medium => text.yellow().to_string(),
        CompletionBand::Low => text.bright_red().to_string(),
        CompletionBand::Critical => text.red().to_string(),
    }
}

/// Colour an assignee, dimming unassigned issues
pub fn format_assignee(assignee: &str) -> String {
    if assignee == epicdash_core::atlassian::jira::UNASSIGNED {
        assignee.bright_black().to_string()
    } else {
        assignee.bright_magenta().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_status_keeps_text() {
        for status in ["Done", "In Progress", "To Do", "Blocked / On Hold", "Cancelled", "Review"] {
            assert!(format_status(status).contains(status));
        }
    }

    #[test]
    fn test_format_completion_one_decimal() {
        assert!(format_completion(66.6666).contains("66.7%"));
        assert!(format_completion(100.0).contains("100.0%"));
        assert!(format_completion(0.0).contains("0.0%"));
    }

    #[test]
    fn test_format_assignee_keeps_text() {
        assert!(format_assignee("Unassigned").contains("Unassigned"));
        assert!(format_assignee("Jane Smith").contains("Jane Smith"));
    }
}
