//! Mapping of GitHub payloads onto local entities.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::DateTimeWithTimeZone;
use sea_orm::{Set, Value};

use super::types::{Organisation, Repository, Workflow, WorkflowJob, WorkflowRun};
use crate::entity::{
    github_organisation, github_repository, github_workflow, github_workflow_job,
    github_workflow_run,
};
use crate::store::RemoteRecord;

fn ts(value: Option<DateTime<Utc>>) -> Option<DateTimeWithTimeZone> {
    value.map(|t| t.fixed_offset())
}

/// GitHub reports in-flight runs and jobs without a status in some payloads.
fn status_or_unknown(status: &Option<String>) -> String {
    status.clone().unwrap_or_else(|| "unknown".to_string())
}

impl RemoteRecord for Organisation {
    type Entity = github_organisation::Entity;
    type ActiveModel = github_organisation::ActiveModel;

    const KIND: &'static str = "organisation";

    fn external_key(&self) -> Value {
        self.id.into()
    }

    fn key_column() -> github_organisation::Column {
        github_organisation::Column::GithubId
    }

    fn timestamp_columns() -> (github_organisation::Column, github_organisation::Column) {
        (
            github_organisation::Column::CreatedAt,
            github_organisation::Column::UpdatedAt,
        )
    }

    fn apply(&self, model: &mut github_organisation::ActiveModel) {
        model.login = Set(self.login.clone());
        model.name = Set(self.name.clone());
        model.description = Set(self.description.clone());
        model.company = Set(self.company.clone());
        model.blog = Set(self.blog.clone());
        model.location = Set(self.location.clone());
        model.email = Set(self.email.clone());
        model.twitter_username = Set(self.twitter_username.clone());
        model.public_repos = Set(self.public_repos);
        model.public_gists = Set(self.public_gists);
        model.followers = Set(self.followers);
        model.following = Set(self.following);
        model.html_url = Set(self.html_url.clone());
        model.avatar_url = Set(self.avatar_url.clone());
        model.github_created_at = Set(ts(self.created_at));
        model.github_updated_at = Set(ts(self.updated_at));
    }
}

impl RemoteRecord for Repository {
    type Entity = github_repository::Entity;
    type ActiveModel = github_repository::ActiveModel;

    const KIND: &'static str = "repository";

    fn external_key(&self) -> Value {
        self.id.into()
    }

    fn key_column() -> github_repository::Column {
        github_repository::Column::GithubId
    }

    fn parent_column() -> Option<github_repository::Column> {
        Some(github_repository::Column::OrganisationId)
    }

    fn timestamp_columns() -> (github_repository::Column, github_repository::Column) {
        (
            github_repository::Column::CreatedAt,
            github_repository::Column::UpdatedAt,
        )
    }

    fn apply(&self, model: &mut github_repository::ActiveModel) {
        model.name = Set(self.name.clone());
        model.full_name = Set(self.full_name.clone());
        model.description = Set(self.description.clone());
        model.homepage = Set(self.homepage.clone());
        model.language = Set(self.language.clone());
        model.default_branch = Set(self.default_branch.clone());
        model.private = Set(self.private);
        model.fork = Set(self.fork);
        model.has_issues = Set(self.has_issues);
        model.has_projects = Set(self.has_projects);
        model.has_wiki = Set(self.has_wiki);
        model.has_pages = Set(self.has_pages);
        model.has_downloads = Set(self.has_downloads);
        model.archived = Set(self.archived);
        model.disabled = Set(self.disabled);
        model.forks_count = Set(self.forks_count);
        model.stargazers_count = Set(self.stargazers_count);
        model.watchers_count = Set(self.watchers_count);
        model.size = Set(self.size);
        model.open_issues_count = Set(self.open_issues_count);
        model.html_url = Set(self.html_url.clone());
        model.clone_url = Set(self.clone_url.clone());
        model.ssh_url = Set(self.ssh_url.clone());
        model.github_created_at = Set(ts(self.created_at));
        model.github_updated_at = Set(ts(self.updated_at));
        model.github_pushed_at = Set(ts(self.pushed_at));
    }
}

impl RemoteRecord for Workflow {
    type Entity = github_workflow::Entity;
    type ActiveModel = github_workflow::ActiveModel;

    const KIND: &'static str = "workflow";

    fn external_key(&self) -> Value {
        self.id.into()
    }

    fn key_column() -> github_workflow::Column {
        github_workflow::Column::GithubId
    }

    fn parent_column() -> Option<github_workflow::Column> {
        Some(github_workflow::Column::RepositoryId)
    }

    fn timestamp_columns() -> (github_workflow::Column, github_workflow::Column) {
        (
            github_workflow::Column::CreatedAt,
            github_workflow::Column::UpdatedAt,
        )
    }

    fn apply(&self, model: &mut github_workflow::ActiveModel) {
        model.name = Set(self.name.clone());
        model.path = Set(self.path.clone());
        model.state = Set(self.state.clone());
        model.html_url = Set(self.html_url.clone());
        model.badge_url = Set(self.badge_url.clone());
        model.github_created_at = Set(ts(self.created_at));
        model.github_updated_at = Set(ts(self.updated_at));
    }
}

impl RemoteRecord for WorkflowRun {
    type Entity = github_workflow_run::Entity;
    type ActiveModel = github_workflow_run::ActiveModel;

    const KIND: &'static str = "workflow run";

    fn external_key(&self) -> Value {
        self.id.into()
    }

    fn key_column() -> github_workflow_run::Column {
        github_workflow_run::Column::GithubId
    }

    fn parent_column() -> Option<github_workflow_run::Column> {
        Some(github_workflow_run::Column::WorkflowId)
    }

    fn timestamp_columns() -> (github_workflow_run::Column, github_workflow_run::Column) {
        (
            github_workflow_run::Column::CreatedAt,
            github_workflow_run::Column::UpdatedAt,
        )
    }

    fn apply(&self, model: &mut github_workflow_run::ActiveModel) {
        model.name = Set(self.name.clone());
        model.display_title = Set(self.display_title.clone());
        model.run_number = Set(self.run_number);
        model.run_attempt = Set(self.run_attempt);
        model.event = Set(self.event.clone());
        model.status = Set(status_or_unknown(&self.status));
        model.conclusion = Set(self.conclusion.clone());
        model.head_branch = Set(self.head_branch.clone());
        model.head_sha = Set(self.head_sha.clone());
        model.html_url = Set(self.html_url.clone());
        model.jobs_url = Set(self.jobs_url.clone());
        model.logs_url = Set(self.logs_url.clone());
        model.check_suite_url = Set(self.check_suite_url.clone());
        model.artifacts_url = Set(self.artifacts_url.clone());
        model.cancel_url = Set(self.cancel_url.clone());
        model.rerun_url = Set(self.rerun_url.clone());
        model.github_created_at = Set(ts(self.created_at));
        model.github_updated_at = Set(ts(self.updated_at));
        model.run_started_at = Set(ts(self.run_started_at));
    }
}

impl RemoteRecord for WorkflowJob {
    type Entity = github_workflow_job::Entity;
    type ActiveModel = github_workflow_job::ActiveModel;

    const KIND: &'static str = "workflow job";

    fn external_key(&self) -> Value {
        self.id.into()
    }

    fn key_column() -> github_workflow_job::Column {
        github_workflow_job::Column::GithubId
    }

    fn parent_column() -> Option<github_workflow_job::Column> {
        Some(github_workflow_job::Column::WorkflowRunId)
    }

    fn timestamp_columns() -> (github_workflow_job::Column, github_workflow_job::Column) {
        (
            github_workflow_job::Column::CreatedAt,
            github_workflow_job::Column::UpdatedAt,
        )
    }

    fn apply(&self, model: &mut github_workflow_job::ActiveModel) {
        model.name = Set(self.name.clone());
        model.status = Set(status_or_unknown(&self.status));
        model.conclusion = Set(self.conclusion.clone());
        model.head_sha = Set(self.head_sha.clone());
        model.html_url = Set(self.html_url.clone());
        model.runner_name = Set(self.runner_name.clone());
        model.runner_group_name = Set(self.runner_group_name.clone());
        model.check_run_id = Set(self.check_run_id);
        model.github_created_at = Set(ts(self.created_at));
        model.github_started_at = Set(ts(self.started_at));
        model.github_completed_at = Set(ts(self.completed_at));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ActiveModelBehavior, ActiveValue};

    #[test]
    fn apply_leaves_key_parent_and_tracking_columns_untouched() {
        let run = WorkflowRun {
            id: 7,
            run_number: 3,
            event: "push".to_string(),
            status: Some("completed".to_string()),
            conclusion: Some("success".to_string()),
            ..Default::default()
        };
        let mut active = github_workflow_run::ActiveModel::new();
        run.apply(&mut active);

        assert_eq!(active.run_number, ActiveValue::Set(3));
        assert_eq!(active.conclusion, ActiveValue::Set(Some("success".to_string())));
        assert!(matches!(active.github_id, ActiveValue::NotSet));
        assert!(matches!(active.workflow_id, ActiveValue::NotSet));
        assert!(matches!(active.created_at, ActiveValue::NotSet));
        assert!(matches!(active.updated_at, ActiveValue::NotSet));
    }

    #[test]
    fn missing_status_is_stored_as_unknown() {
        let job = WorkflowJob {
            id: 1,
            name: "build".to_string(),
            ..Default::default()
        };
        let mut active = github_workflow_job::ActiveModel::new();
        job.apply(&mut active);
        assert_eq!(active.status, ActiveValue::Set("unknown".to_string()));
    }

    #[test]
    fn repositories_link_to_their_organisation() {
        assert!(matches!(
            Repository::parent_column(),
            Some(github_repository::Column::OrganisationId)
        ));
        assert!(Organisation::parent_column().is_none());
        let org = Organisation {
            id: 9,
            ..Default::default()
        };
        assert_eq!(org.external_key(), Value::from(9i64));
    }
}
