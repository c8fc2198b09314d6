//! Jira REST client: project listing and offset-paged JQL search.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use serde::de::DeserializeOwned;
use url::Url;

use super::error::JiraError;
use super::types::{ProjectSummary, SearchPage, SearchResponse};
use crate::http::reqwest_transport::{DEFAULT_TIMEOUT, ReqwestTransport};
use crate::http::{HttpRequest, HttpTransport, USER_AGENT};
use crate::source::{IssueTrackerSource, short_error_message};

/// Jira client using HTTP Basic auth (`username:api_token`).
#[derive(Clone)]
pub struct JiraClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    auth_header: String,
}

impl JiraClient {
    pub fn new(base_url: &str, username: &str, api_token: &str) -> Result<Self, JiraError> {
        let transport = ReqwestTransport::with_timeout(DEFAULT_TIMEOUT)
            .map_err(|e| JiraError::Config(e.to_string()))?;
        Self::new_with_transport(base_url, username, api_token, Arc::new(transport))
    }

    /// Build a client only when both credentials are present and non-blank.
    ///
    /// Returns `Ok(None)` otherwise, which callers treat as "Jira not
    /// configured".
    pub fn from_credentials(
        base_url: &str,
        username: Option<&str>,
        api_token: Option<&str>,
    ) -> Result<Option<Self>, JiraError> {
        fn present(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|v| !v.is_empty())
        }

        match (present(username), present(api_token)) {
            (Some(user), Some(token)) => Self::new(base_url, user, token).map(Some),
            _ => Ok(None),
        }
    }

    pub fn new_with_transport(
        base_url: &str,
        username: &str,
        api_token: &str,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, JiraError> {
        let base_url = base_url.trim().trim_end_matches('/');
        Url::parse(base_url).map_err(|e| JiraError::Config(format!("{base_url}: {e}")))?;

        let encoded =
            base64::engine::general_purpose::STANDARD.encode(format!("{username}:{api_token}"));

        Ok(Self {
            transport,
            base_url: base_url.to_string(),
            auth_header: format!("Basic {encoded}"),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search URL for one result window. Names are expanded so custom
    /// field ids can be resolved when inspecting responses.
    pub fn search_url(&self, jql: &str, start_at: u32, max_results: u32) -> Result<String, JiraError> {
        let url = Url::parse_with_params(
            &format!("{}/rest/api/2/search", self.base_url),
            &[
                ("jql", jql.to_string()),
                ("startAt", start_at.to_string()),
                ("maxResults", max_results.to_string()),
                ("expand", "names".to_string()),
            ],
        )
        .map_err(|e| JiraError::Config(e.to_string()))?;
        Ok(url.into())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, JiraError> {
        let request = HttpRequest::get(url)
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .header("Authorization", self.auth_header.clone());

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| JiraError::Http(e.to_string()))?;

        if !response.is_success() {
            return Err(JiraError::Api {
                status: response.status,
                message: response.text(),
            });
        }

        Ok(serde_json::from_slice(&response.body)?)
    }

    pub async fn try_project_keys(&self) -> Result<Vec<String>, JiraError> {
        let projects: Vec<ProjectSummary> = self
            .get_json(&format!("{}/rest/api/2/project", self.base_url))
            .await?;
        Ok(projects
            .into_iter()
            .map(|p| p.key)
            .filter(|k| !k.is_empty())
            .collect())
    }

    pub async fn try_search(
        &self,
        jql: &str,
        start_at: u32,
        max_results: u32,
    ) -> Result<SearchPage, JiraError> {
        let url = self.search_url(jql, start_at, max_results)?;
        let response: SearchResponse = self.get_json(&url).await?;
        tracing::debug!(
            start_at = response.start_at,
            total = response.total,
            count = response.issues.len(),
            "Fetched Jira search page"
        );
        Ok(SearchPage {
            issues: response.issues,
            total: response.total,
        })
    }
}

#[async_trait]
impl IssueTrackerSource for JiraClient {
    async fn project_keys(&self) -> Vec<String> {
        self.try_project_keys().await.unwrap_or_else(|e| {
            tracing::error!(
                status = ?e.status(),
                error = %short_error_message(&e),
                "Jira project listing failed"
            );
            Vec::new()
        })
    }

    async fn search(&self, jql: &str, start_at: u32, max_results: u32) -> SearchPage {
        self.try_search(jql, start_at, max_results)
            .await
            .unwrap_or_else(|e| {
                tracing::error!(
                    start_at,
                    status = ?e.status(),
                    error = %short_error_message(&e),
                    "Jira search failed"
                );
                SearchPage::empty()
            })
    }
}
