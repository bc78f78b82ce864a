/// Jira-related transformations
///
/// This module contains pure functions for resolving Epic keys, shaping Jira
/// search results and describing failed Jira calls.
/// All functions are free of I/O operations and testable with fixture data.
pub mod epic;
pub mod error;
pub mod jira;
