//! Pipeline and orchestrator construction shared by `sync` and `serve`.

use std::sync::Arc;

use console::style;
use jobmaster::github::GitHubClient;
use jobmaster::jira::JiraClient;
use jobmaster::retry::RetryConfig;
use jobmaster::scheduler::{Orchestrator, RunOutcome, SyncReport};
use jobmaster::sync::{GitHubSync, JiraSync};
use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::progress::ProgressReporter;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub(crate) fn github_source(config: &Config) -> CliResult<GitHubClient> {
    let token = present(&config.github.token);
    if token.is_none() {
        tracing::warn!("No GitHub token configured, only public data will be visible");
    }

    let mut client = GitHubClient::new(&config.github.base_url, token)?;
    if let Some(max_pages) = config.github.max_pages {
        client = client.with_max_pages(max_pages);
    }
    Ok(client)
}

/// `None` when no Jira credentials are configured.
pub(crate) fn jira_source(config: &Config) -> CliResult<Option<JiraClient>> {
    let username = present(&config.jira.username);
    let token = present(&config.jira.token);
    if username.is_none() || token.is_none() {
        return Ok(None);
    }

    let base_url = present(&config.jira.base_url)
        .ok_or("jira.base_url must be set when Jira credentials are configured")?;
    Ok(JiraClient::from_credentials(base_url, username, token)?)
}

/// An orchestrator with both pipelines registered.
pub(crate) async fn build_orchestrator(
    config: &Config,
    db: DatabaseConnection,
) -> CliResult<Orchestrator> {
    let github = GitHubSync::new(db.clone(), github_source(config)?)
        .with_progress(ProgressReporter::callback());
    let jira = JiraSync::new(db, jira_source(config)?, config.issue_sync_options())
        .with_progress(ProgressReporter::callback());

    let mut orchestrator = Orchestrator::new(RetryConfig::default())
        .await?
        .with_progress(ProgressReporter::callback());
    orchestrator.register(Arc::new(github));
    orchestrator.register(Arc::new(jira));
    Ok(orchestrator)
}

/// One-line summary of a finished run.
pub(crate) fn describe_outcome(pipeline: &str, outcome: &RunOutcome) -> String {
    match outcome {
        RunOutcome::Completed(SyncReport::Hierarchy(stats)) => format!(
            "{} {pipeline}: {} organisations, {} repositories, {} workflows, {} runs, {} jobs ({} new, {} updated)",
            style("✓").green(),
            stats.organisations.total(),
            stats.repositories.total(),
            stats.workflows.total(),
            stats.workflow_runs.total(),
            stats.workflow_jobs.total(),
            stats.created(),
            stats.updated()
        ),
        RunOutcome::Completed(SyncReport::Issues(stats)) => format!(
            "{} {pipeline}: {} issues ({} new, {} updated, {} failed)",
            style("✓").green(),
            stats.total,
            stats.created,
            stats.updated,
            stats.failed
        ),
        RunOutcome::Failed(error) => format!("{} {pipeline} failed: {error}", style("✗").red()),
        RunOutcome::Skipped => format!(
            "{} {pipeline} skipped, already running",
            style("-").yellow()
        ),
    }
}
