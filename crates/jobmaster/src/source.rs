//! Abstractions over the two external systems the pipelines read from.
//!
//! Both traits share one contract: fetches never fail. Transport, status and
//! decoding errors are logged by the implementation and surface as an empty
//! collection, so a flaky endpoint only prunes that branch of a sync.

use std::sync::Arc;

use async_trait::async_trait;

use crate::github::{Organisation, Repository, Workflow, WorkflowJob, WorkflowRun};
use crate::jira::SearchPage;

/// Code-hosting platform exposing organisations and their CI hierarchy.
///
/// Implementations exhaust pagination internally and return whole
/// collections in API order.
#[async_trait]
pub trait CodeHostSource: Send + Sync {
    /// Organisations visible to the configured credentials.
    async fn organisations(&self) -> Vec<Organisation>;

    async fn repositories(&self, org: &str) -> Vec<Repository>;

    async fn workflows(&self, owner: &str, repo: &str) -> Vec<Workflow>;

    async fn workflow_runs(&self, owner: &str, repo: &str, workflow_id: i64) -> Vec<WorkflowRun>;

    async fn run_jobs(&self, owner: &str, repo: &str, run_id: i64) -> Vec<WorkflowJob>;
}

/// Issue tracker queried with a filter expression and offset paging.
#[async_trait]
pub trait IssueTrackerSource: Send + Sync {
    /// Keys of every project visible to the credentials, in API order.
    async fn project_keys(&self) -> Vec<String>;

    /// One window of results starting at `start_at`.
    async fn search(&self, jql: &str, start_at: u32, max_results: u32) -> SearchPage;
}

#[async_trait]
impl<T: CodeHostSource + ?Sized> CodeHostSource for Arc<T> {
    async fn organisations(&self) -> Vec<Organisation> {
        (**self).organisations().await
    }

    async fn repositories(&self, org: &str) -> Vec<Repository> {
        (**self).repositories(org).await
    }

    async fn workflows(&self, owner: &str, repo: &str) -> Vec<Workflow> {
        (**self).workflows(owner, repo).await
    }

    async fn workflow_runs(&self, owner: &str, repo: &str, workflow_id: i64) -> Vec<WorkflowRun> {
        (**self).workflow_runs(owner, repo, workflow_id).await
    }

    async fn run_jobs(&self, owner: &str, repo: &str, run_id: i64) -> Vec<WorkflowJob> {
        (**self).run_jobs(owner, repo, run_id).await
    }
}

#[async_trait]
impl<T: IssueTrackerSource + ?Sized> IssueTrackerSource for Arc<T> {
    async fn project_keys(&self) -> Vec<String> {
        (**self).project_keys().await
    }

    async fn search(&self, jql: &str, start_at: u32, max_results: u32) -> SearchPage {
        (**self).search(jql, start_at, max_results).await
    }
}

/// First line of an error's display text, for compact log fields.
pub fn short_error_message(e: &impl std::error::Error) -> String {
    let full = e.to_string();
    full.lines().next().unwrap_or(&full).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct MultiLine;

    impl std::fmt::Display for MultiLine {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "API error (502): Bad Gateway\n<html>...</html>")
        }
    }

    impl std::error::Error for MultiLine {}

    #[test]
    fn short_error_message_keeps_only_the_first_line() {
        assert_eq!(short_error_message(&MultiLine), "API error (502): Bad Gateway");
    }
}
