use thiserror::Error;

/// Errors from the Jira REST API.
///
/// Only the `try_*` methods of [`JiraClient`](super::JiraClient) return these.
#[derive(Debug, Error)]
pub enum JiraError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl JiraError {
    pub fn status(&self) -> Option<u16> {
        match self {
            JiraError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
