//! GitHub API error types.

use thiserror::Error;

/// Errors that can occur when talking to the GitHub REST API.
///
/// These only escape through the `try_*` methods of
/// [`GitHubClient`](super::GitHubClient); the
/// [`CodeHostSource`](crate::source::CodeHostSource) implementation logs them
/// and returns empty collections instead.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// The request never produced a response.
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned a non-2xx response.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl GitHubError {
    /// HTTP status of an API error response.
    pub fn status(&self) -> Option<u16> {
        match self {
            GitHubError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Bad or missing credentials, or a token without the needed scopes.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_are_401_and_403() {
        for status in [401, 403] {
            let err = GitHubError::Api {
                status,
                message: "Bad credentials".to_string(),
            };
            assert!(err.is_auth_error());
        }
        let not_found = GitHubError::Api {
            status: 404,
            message: "Not Found".to_string(),
        };
        assert!(!not_found.is_auth_error());
        assert!(!GitHubError::Http("timed out".to_string()).is_auth_error());
    }

    #[test]
    fn api_error_display_includes_status() {
        let err = GitHubError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error (500): boom");
        assert_eq!(err.status(), Some(500));
    }
}
