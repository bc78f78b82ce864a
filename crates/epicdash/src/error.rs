use epicdash_core::atlassian::error::JiraError;

#[derive(thiserror::Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    #[error(transparent)]
    Jira(#[from] JiraError),

    #[error("Please enter an Epic URL or key")]
    EmptyEpicInput,

    #[error("Please enter a Personal Access Token first")]
    MissingToken,

    #[error("Failed to load issues from {source_name}: {reason}")]
    IssuesSource { source_name: String, reason: String },

    #[error("Unknown standard: {name}. Available standards: {available}")]
    UnknownStandard { name: String, available: String },
}
