//! SeaORM entity definitions for the jobmaster database schema.

pub mod github_organisation;
pub mod github_repository;
pub mod github_workflow;
pub mod github_workflow_job;
pub mod github_workflow_run;
pub mod jira_issue;
pub mod prelude;
