use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::entity::prelude::*;

use super::errors::Result;

/// Row counts per synced table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub organisations: u64,
    pub repositories: u64,
    pub workflows: u64,
    pub workflow_runs: u64,
    pub workflow_jobs: u64,
    pub jira_issues: u64,
}

/// Count the rows of every synced table.
pub async fn count_rows<C: ConnectionTrait>(conn: &C) -> Result<StoreCounts> {
    Ok(StoreCounts {
        organisations: GitHubOrganisation::find().count(conn).await?,
        repositories: GitHubRepository::find().count(conn).await?,
        workflows: GitHubWorkflow::find().count(conn).await?,
        workflow_runs: GitHubWorkflowRun::find().count(conn).await?,
        workflow_jobs: GitHubWorkflowJob::find().count(conn).await?,
        jira_issues: JiraIssue::find().count(conn).await?,
    })
}

pub async fn find_organisation_by_github_id<C: ConnectionTrait>(
    conn: &C,
    github_id: i64,
) -> Result<Option<GitHubOrganisationModel>> {
    Ok(GitHubOrganisation::find()
        .filter(GitHubOrganisationColumn::GithubId.eq(github_id))
        .one(conn)
        .await?)
}

pub async fn find_repository_by_github_id<C: ConnectionTrait>(
    conn: &C,
    github_id: i64,
) -> Result<Option<GitHubRepositoryModel>> {
    Ok(GitHubRepository::find()
        .filter(GitHubRepositoryColumn::GithubId.eq(github_id))
        .one(conn)
        .await?)
}

pub async fn find_issue_by_key<C: ConnectionTrait>(
    conn: &C,
    issue_key: &str,
) -> Result<Option<JiraIssueModel>> {
    Ok(JiraIssue::find()
        .filter(JiraIssueColumn::IssueKey.eq(issue_key))
        .one(conn)
        .await?)
}
