//! Common re-exports for convenient entity usage.

pub use super::github_organisation::{
    ActiveModel as GitHubOrganisationActiveModel, Column as GitHubOrganisationColumn,
    Entity as GitHubOrganisation, Model as GitHubOrganisationModel,
};
pub use super::github_repository::{
    ActiveModel as GitHubRepositoryActiveModel, Column as GitHubRepositoryColumn,
    Entity as GitHubRepository, Model as GitHubRepositoryModel,
};
pub use super::github_workflow::{
    ActiveModel as GitHubWorkflowActiveModel, Column as GitHubWorkflowColumn,
    Entity as GitHubWorkflow, Model as GitHubWorkflowModel,
};
pub use super::github_workflow_job::{
    ActiveModel as GitHubWorkflowJobActiveModel, Column as GitHubWorkflowJobColumn,
    Entity as GitHubWorkflowJob, Model as GitHubWorkflowJobModel,
};
pub use super::github_workflow_run::{
    ActiveModel as GitHubWorkflowRunActiveModel, Column as GitHubWorkflowRunColumn,
    Entity as GitHubWorkflowRun, Model as GitHubWorkflowRunModel,
};
pub use super::jira_issue::{
    ActiveModel as JiraIssueActiveModel, Column as JiraIssueColumn, Entity as JiraIssue,
    Model as JiraIssueModel,
};
