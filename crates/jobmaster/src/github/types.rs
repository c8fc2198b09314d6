//! GitHub REST API payloads.
//!
//! Only the fields that are persisted are modelled; everything else in the
//! response is ignored by serde. Missing fields fall back to their defaults so
//! that the thinner `/user/orgs` payloads still parse.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Organisation {
    pub id: i64,
    pub login: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub company: Option<String>,
    pub blog: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub twitter_username: Option<String>,
    pub public_repos: i32,
    pub public_gists: i32,
    pub followers: i32,
    pub following: i32,
    pub html_url: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub private: bool,
    pub fork: bool,
    pub homepage: Option<String>,
    pub language: Option<String>,
    pub forks_count: i32,
    pub stargazers_count: i32,
    pub watchers_count: i32,
    pub size: i32,
    pub default_branch: Option<String>,
    pub open_issues_count: i32,
    pub has_issues: bool,
    pub has_projects: bool,
    pub has_wiki: bool,
    pub has_pages: bool,
    pub has_downloads: bool,
    pub archived: bool,
    pub disabled: bool,
    pub html_url: Option<String>,
    pub clone_url: Option<String>,
    pub ssh_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Workflow {
    pub id: i64,
    pub name: String,
    pub path: String,
    pub state: String,
    pub html_url: Option<String>,
    pub badge_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowRun {
    pub id: i64,
    pub name: Option<String>,
    pub display_title: Option<String>,
    pub run_number: i32,
    pub run_attempt: i32,
    pub event: String,
    pub status: Option<String>,
    pub conclusion: Option<String>,
    pub head_branch: Option<String>,
    pub head_sha: Option<String>,
    pub html_url: Option<String>,
    pub jobs_url: Option<String>,
    pub logs_url: Option<String>,
    pub check_suite_url: Option<String>,
    pub artifacts_url: Option<String>,
    pub cancel_url: Option<String>,
    pub rerun_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub run_started_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowJob {
    pub id: i64,
    pub name: String,
    pub status: Option<String>,
    pub conclusion: Option<String>,
    pub head_sha: Option<String>,
    pub html_url: Option<String>,
    pub runner_name: Option<String>,
    pub runner_group_name: Option<String>,
    pub check_run_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// `{"total_count": n, "workflows": [...]}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WorkflowsEnvelope {
    pub workflows: Vec<Workflow>,
}

/// `{"total_count": n, "workflow_runs": [...]}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WorkflowRunsEnvelope {
    pub workflow_runs: Vec<WorkflowRun>,
}

/// `{"total_count": n, "jobs": [...]}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WorkflowJobsEnvelope {
    pub jobs: Vec<WorkflowJob>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn organisation_parses_thin_user_orgs_payload() {
        let json = r#"{
            "login": "acme",
            "id": 101,
            "url": "https://api.github.com/orgs/acme",
            "avatar_url": "https://avatars.githubusercontent.com/u/101",
            "description": null
        }"#;
        let org: Organisation = serde_json::from_str(json).expect("org should parse");
        assert_eq!(org.id, 101);
        assert_eq!(org.login, "acme");
        assert_eq!(org.public_repos, 0);
        assert!(org.created_at.is_none());
    }

    #[test]
    fn workflow_run_parses_timestamps_and_nullable_conclusion() {
        let json = r#"{
            "id": 30433642,
            "name": "Build",
            "display_title": "Update README.md",
            "run_number": 562,
            "run_attempt": 1,
            "event": "push",
            "status": "queued",
            "conclusion": null,
            "head_branch": "main",
            "head_sha": "acb5820ced9479c074f688cc328bf03f341a511d",
            "created_at": "2020-01-22T19:33:08Z",
            "updated_at": "2020-01-22T19:33:08Z",
            "run_started_at": "2020-01-22T19:33:08Z"
        }"#;
        let run: WorkflowRun = serde_json::from_str(json).expect("run should parse");
        assert_eq!(run.run_number, 562);
        assert_eq!(run.status.as_deref(), Some("queued"));
        assert!(run.conclusion.is_none());
        assert_eq!(
            run.run_started_at.map(|t| t.to_rfc3339()),
            Some("2020-01-22T19:33:08+00:00".to_string())
        );
    }

    #[test]
    fn jobs_envelope_defaults_to_empty_when_key_is_missing() {
        let envelope: WorkflowJobsEnvelope =
            serde_json::from_str(r#"{"total_count": 0}"#).expect("envelope should parse");
        assert!(envelope.jobs.is_empty());
    }
}
