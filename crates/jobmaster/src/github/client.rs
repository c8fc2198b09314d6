//! GitHub REST client for organisations, repositories and Actions data.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::error::GitHubError;
use super::types::{
    Organisation, Repository, Workflow, WorkflowJob, WorkflowJobsEnvelope, WorkflowRun,
    WorkflowRunsEnvelope, WorkflowsEnvelope,
};
use crate::http::reqwest_transport::{DEFAULT_TIMEOUT, ReqwestTransport};
use crate::http::{HttpRequest, HttpResponse, HttpTransport, USER_AGENT};
use crate::source::{CodeHostSource, short_error_message};

/// Public GitHub API endpoint.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Largest page size GitHub accepts.
const PER_PAGE: u32 = 100;

/// Links extracted from GitHub's `Link` response header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPagination {
    /// URL of the next page (`rel="next"`).
    pub next: Option<String>,
    /// URL of the last page (`rel="last"`).
    pub last: Option<String>,
}

/// Parse the Link header.
///
/// GitHub Link headers look like:
/// `<https://api.github.com/organizations/123/repos?per_page=100&page=2>; rel="next", <...&page=3>; rel="last"`
pub fn parse_link_header(link_header: &str) -> LinkPagination {
    let mut info = LinkPagination::default();

    for part in link_header.split(',') {
        let mut url = None;
        let mut rel = None;

        for segment in part.split(';') {
            let segment = segment.trim();
            if let Some(inner) = segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
                url = Some(inner);
            } else if let Some(rel_value) = segment.strip_prefix("rel=") {
                rel = Some(rel_value.trim_matches('"'));
            }
        }

        match (url, rel) {
            (Some(url), Some("next")) => info.next = Some(url.to_string()),
            (Some(url), Some("last")) => info.last = Some(url.to_string()),
            _ => {}
        }
    }

    info
}

/// GitHub API client.
///
/// Authenticates with a bearer token when one is configured and falls back to
/// anonymous access otherwise (which only sees public data and has a much
/// lower rate limit).
#[derive(Clone)]
pub struct GitHubClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    token: Option<String>,
    max_pages: Option<u32>,
}

impl GitHubClient {
    /// Create a client for `base_url` (normally [`GITHUB_API_URL`]).
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self, GitHubError> {
        let transport = ReqwestTransport::with_timeout(DEFAULT_TIMEOUT)
            .map_err(|e| GitHubError::Config(e.to_string()))?;
        Ok(Self::new_with_transport(base_url, token, Arc::new(transport)))
    }

    pub fn new_with_transport(
        base_url: &str,
        token: Option<&str>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()).map(str::to_string),
            max_pages: None,
        }
    }

    /// Stop following `Link: rel="next"` after `max_pages` pages per collection.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = Some(max_pages.max(1));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn request(&self, url: &str) -> HttpRequest {
        let request = HttpRequest::get(url)
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", USER_AGENT);
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }

    async fn get(&self, url: &str) -> Result<HttpResponse, GitHubError> {
        let response = self
            .transport
            .send(self.request(url))
            .await
            .map_err(|e| GitHubError::Http(e.to_string()))?;

        if !response.is_success() {
            return Err(GitHubError::Api {
                status: response.status,
                message: response.text(),
            });
        }

        Ok(response)
    }

    /// Fetch every page of `path`, flattening each page body with `items`.
    async fn fetch_all<B, T>(&self, path: &str, items: fn(B) -> Vec<T>) -> Result<Vec<T>, GitHubError>
    where
        B: DeserializeOwned,
    {
        let mut url = format!("{}{}?per_page={}", self.base_url, path, PER_PAGE);
        let mut all = Vec::new();
        let mut pages = 0u32;

        loop {
            let response = self.get(&url).await?;
            let body: B = serde_json::from_slice(&response.body)?;
            all.extend(items(body));
            pages += 1;

            let next = response
                .header("link")
                .and_then(|header| parse_link_header(header).next);

            match next {
                Some(next) if self.max_pages.is_none_or(|max| pages < max) => url = next,
                _ => break,
            }
        }

        tracing::debug!(path, pages, count = all.len(), "Fetched GitHub collection");
        Ok(all)
    }

    pub async fn try_organisations(&self) -> Result<Vec<Organisation>, GitHubError> {
        self.fetch_all("/user/orgs", |orgs: Vec<Organisation>| orgs)
            .await
    }

    pub async fn try_repositories(&self, org: &str) -> Result<Vec<Repository>, GitHubError> {
        self.fetch_all(&format!("/orgs/{org}/repos"), |repos: Vec<Repository>| repos)
            .await
    }

    pub async fn try_workflows(&self, owner: &str, repo: &str) -> Result<Vec<Workflow>, GitHubError> {
        self.fetch_all(
            &format!("/repos/{owner}/{repo}/actions/workflows"),
            |page: WorkflowsEnvelope| page.workflows,
        )
        .await
    }

    pub async fn try_workflow_runs(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: i64,
    ) -> Result<Vec<WorkflowRun>, GitHubError> {
        self.fetch_all(
            &format!("/repos/{owner}/{repo}/actions/workflows/{workflow_id}/runs"),
            |page: WorkflowRunsEnvelope| page.workflow_runs,
        )
        .await
    }

    pub async fn try_run_jobs(
        &self,
        owner: &str,
        repo: &str,
        run_id: i64,
    ) -> Result<Vec<WorkflowJob>, GitHubError> {
        self.fetch_all(
            &format!("/repos/{owner}/{repo}/actions/runs/{run_id}/jobs"),
            |page: WorkflowJobsEnvelope| page.jobs,
        )
        .await
    }
}

/// Log a failed fetch and substitute an empty collection.
fn or_empty<T>(result: Result<Vec<T>, GitHubError>, what: &str, scope: &str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::error!(
            what,
            scope,
            status = ?e.status(),
            error = %short_error_message(&e),
            "GitHub fetch failed"
        );
        Vec::new()
    })
}

#[async_trait]
impl CodeHostSource for GitHubClient {
    async fn organisations(&self) -> Vec<Organisation> {
        or_empty(self.try_organisations().await, "organisations", "user")
    }

    async fn repositories(&self, org: &str) -> Vec<Repository> {
        or_empty(self.try_repositories(org).await, "repositories", org)
    }

    async fn workflows(&self, owner: &str, repo: &str) -> Vec<Workflow> {
        or_empty(
            self.try_workflows(owner, repo).await,
            "workflows",
            &format!("{owner}/{repo}"),
        )
    }

    async fn workflow_runs(&self, owner: &str, repo: &str, workflow_id: i64) -> Vec<WorkflowRun> {
        or_empty(
            self.try_workflow_runs(owner, repo, workflow_id).await,
            "workflow runs",
            &format!("{owner}/{repo} workflow {workflow_id}"),
        )
    }

    async fn run_jobs(&self, owner: &str, repo: &str, run_id: i64) -> Vec<WorkflowJob> {
        or_empty(
            self.try_run_jobs(owner, repo, run_id).await,
            "workflow jobs",
            &format!("{owner}/{repo} run {run_id}"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpMethod, MockTransport, header_get};
    use serde_json::json;

    const BASE: &str = "https://api.github.test";

    fn client(transport: &MockTransport, token: Option<&str>) -> GitHubClient {
        GitHubClient::new_with_transport(BASE, token, Arc::new(transport.clone()))
    }

    #[test]
    fn parse_link_header_extracts_next_and_last_urls() {
        let header = "<https://api.github.com/organizations/1/repos?per_page=100&page=2>; rel=\"next\", \
                      <https://api.github.com/organizations/1/repos?per_page=100&page=5>; rel=\"last\"";
        let links = parse_link_header(header);
        assert_eq!(
            links.next.as_deref(),
            Some("https://api.github.com/organizations/1/repos?per_page=100&page=2")
        );
        assert_eq!(
            links.last.as_deref(),
            Some("https://api.github.com/organizations/1/repos?per_page=100&page=5")
        );
    }

    #[test]
    fn parse_link_header_on_last_page_has_no_next() {
        let header = "<https://api.github.com/x?page=1>; rel=\"prev\", <https://api.github.com/x?page=1>; rel=\"first\"";
        assert_eq!(parse_link_header(header), LinkPagination::default());
    }

    #[tokio::test]
    async fn sends_bearer_token_and_github_headers() {
        let transport = MockTransport::new();
        transport.push_json(format!("{BASE}/user/orgs?per_page=100"), json!([]));

        let orgs = client(&transport, Some("ghp_secret")).organisations().await;
        assert!(orgs.is_empty());

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        let headers = &requests[0].headers;
        assert_eq!(header_get(headers, "authorization"), Some("Bearer ghp_secret"));
        assert_eq!(
            header_get(headers, "accept"),
            Some("application/vnd.github.v3+json")
        );
        assert_eq!(header_get(headers, "user-agent"), Some("JobMaster/1.0"));
    }

    #[tokio::test]
    async fn anonymous_client_sends_no_authorization_header() {
        let transport = MockTransport::new();
        transport.push_json(format!("{BASE}/orgs/acme/repos?per_page=100"), json!([]));

        let gh = client(&transport, Some("  "));
        assert!(!gh.is_authenticated());
        gh.repositories("acme").await;

        let requests = transport.requests();
        assert_eq!(header_get(&requests[0].headers, "authorization"), None);
    }

    #[tokio::test]
    async fn follows_link_header_until_exhausted() {
        let transport = MockTransport::new();
        let page2 = format!("{BASE}/orgs/acme/repos?per_page=100&page=2");
        transport.push_json_with_headers(
            format!("{BASE}/orgs/acme/repos?per_page=100"),
            json!([{"id": 1, "name": "a", "full_name": "acme/a"}]),
            vec![("Link".to_string(), format!("<{page2}>; rel=\"next\""))],
        );
        transport.push_json(&page2, json!([{"id": 2, "name": "b", "full_name": "acme/b"}]));

        let repos = client(&transport, None).repositories("acme").await;
        let names: Vec<_> = repos.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn max_pages_caps_link_following() {
        let transport = MockTransport::new();
        let page2 = format!("{BASE}/orgs/acme/repos?per_page=100&page=2");
        transport.push_json_with_headers(
            format!("{BASE}/orgs/acme/repos?per_page=100"),
            json!([{"id": 1, "name": "a", "full_name": "acme/a"}]),
            vec![("Link".to_string(), format!("<{page2}>; rel=\"next\""))],
        );

        let repos = client(&transport, None)
            .with_max_pages(1)
            .repositories("acme")
            .await;
        assert_eq!(repos.len(), 1);
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn unwraps_actions_envelopes() {
        let transport = MockTransport::new();
        transport.push_json(
            format!("{BASE}/repos/acme/a/actions/workflows?per_page=100"),
            json!({"total_count": 1, "workflows": [{"id": 10, "name": "CI", "path": ".github/workflows/ci.yml", "state": "active"}]}),
        );
        transport.push_json(
            format!("{BASE}/repos/acme/a/actions/workflows/10/runs?per_page=100"),
            json!({"total_count": 1, "workflow_runs": [{"id": 100, "run_number": 4, "event": "push", "status": "completed"}]}),
        );
        transport.push_json(
            format!("{BASE}/repos/acme/a/actions/runs/100/jobs?per_page=100"),
            json!({"total_count": 1, "jobs": [{"id": 1000, "name": "test", "status": "completed", "conclusion": "success"}]}),
        );

        let gh = client(&transport, None);
        let workflows = gh.workflows("acme", "a").await;
        let runs = gh.workflow_runs("acme", "a", 10).await;
        let jobs = gh.run_jobs("acme", "a", 100).await;

        assert_eq!(workflows[0].path, ".github/workflows/ci.yml");
        assert_eq!(runs[0].run_number, 4);
        assert_eq!(jobs[0].conclusion.as_deref(), Some("success"));
    }

    #[tokio::test]
    async fn error_status_becomes_empty_collection() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            format!("{BASE}/user/orgs?per_page=100"),
            HttpResponse {
                status: 401,
                headers: Vec::new(),
                body: br#"{"message":"Bad credentials"}"#.to_vec(),
            },
        );

        let gh = client(&transport, Some("expired"));
        assert!(gh.organisations().await.is_empty());
    }

    #[tokio::test]
    async fn try_variant_surfaces_status_errors() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            format!("{BASE}/orgs/ghost/repos?per_page=100"),
            HttpResponse {
                status: 404,
                headers: Vec::new(),
                body: b"Not Found".to_vec(),
            },
        );

        let err = client(&transport, None)
            .try_repositories("ghost")
            .await
            .expect_err("404 should be an error");
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn transport_and_decode_failures_become_empty_collections() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            format!("{BASE}/repos/acme/a/actions/workflows?per_page=100"),
            HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: b"not json".to_vec(),
            },
        );

        let gh = client(&transport, None);
        assert!(gh.workflows("acme", "a").await.is_empty());
        // Nothing registered for this URL: the mock returns a transport error.
        assert!(gh.run_jobs("acme", "a", 1).await.is_empty());
    }
}
