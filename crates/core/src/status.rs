//! Workflow status categories
//!
//! Raw status names are opaque strings configured per Jira project. The only
//! place that interprets them is [`StatusCategory::of`].

use serde::Serialize;

/// Category a raw workflow status belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatusCategory {
    Done,
    Cancelled,
    InProgress,
    ToDo,
    Blocked,
    Other,
}

/// Raw status names and the category each one maps to
const STATUS_TABLE: &[(&str, StatusCategory)] = &[
    ("Done", StatusCategory::Done),
    ("Cancelled", StatusCategory::Cancelled),
    ("In Progress", StatusCategory::InProgress),
    ("Development", StatusCategory::InProgress),
    ("To Do", StatusCategory::ToDo),
    ("Blocked / On Hold", StatusCategory::Blocked),
];

impl StatusCategory {
    /// Look up the category of a raw status name (exact, case-sensitive)
    pub fn of(status: &str) -> Self {
        STATUS_TABLE
            .iter()
            .find(|(name, _)| *name == status)
            .map(|(_, category)| *category)
            .unwrap_or(StatusCategory::Other)
    }

    /// Whether issues in this category count towards completion
    pub fn is_completed(self) -> bool {
        matches!(self, StatusCategory::Done | StatusCategory::Cancelled)
    }

    /// Whether issues in this category count as work in progress
    pub fn is_in_progress(self) -> bool {
        matches!(self, StatusCategory::InProgress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_category_lookup() {
        assert_eq!(StatusCategory::of("Done"), StatusCategory::Done);
        assert_eq!(StatusCategory::of("Cancelled"), StatusCategory::Cancelled);
        assert_eq!(StatusCategory::of("In Progress"), StatusCategory::InProgress);
        assert_eq!(StatusCategory::of("Development"), StatusCategory::InProgress);
        assert_eq!(StatusCategory::of("To Do"), StatusCategory::ToDo);
        assert_eq!(StatusCategory::of("Blocked / On Hold"), StatusCategory::Blocked);
        assert_eq!(StatusCategory::of("done"), StatusCategory::Other);
        assert_eq!(StatusCategory::of("Accepted Remedied"), StatusCategory::Other);
    }

    #[test]
    fn test_status_category_predicates() {
        assert!(StatusCategory::Done.is_completed());
        assert!(StatusCategory::Cancelled.is_completed());
        assert!(!StatusCategory::InProgress.is_completed());
        assert!(StatusCategory::InProgress.is_in_progress());
        assert!(!StatusCategory::Blocked.is_in_progress());
    }
}
