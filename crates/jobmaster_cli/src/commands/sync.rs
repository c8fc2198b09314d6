use jobmaster::connect_and_migrate;
use jobmaster::scheduler::{GITHUB_PIPELINE, JIRA_PIPELINE, RunOutcome};

use super::shared::{CliResult, build_orchestrator, describe_outcome};
use crate::SyncTarget;
use crate::config::Config;

/// Run one or both pipelines once and wait for them.
pub(crate) async fn handle_sync(
    target: SyncTarget,
    config: &Config,
    database_url: &str,
) -> CliResult<()> {
    let db = connect_and_migrate(database_url).await?;
    let mut orchestrator = build_orchestrator(config, db).await?;

    let pipelines: &[&str] = match target {
        SyncTarget::Github => &[GITHUB_PIPELINE],
        SyncTarget::Jira => &[JIRA_PIPELINE],
        SyncTarget::All => &[GITHUB_PIPELINE, JIRA_PIPELINE],
    };

    let handles = pipelines
        .iter()
        .map(|name| orchestrator.trigger_now(name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut failed = 0usize;
    for handle in handles {
        let pipeline = handle.pipeline.clone();
        let outcome = handle.wait().await;
        if matches!(outcome, RunOutcome::Failed(_)) {
            failed += 1;
        }
        println!("{}", describe_outcome(&pipeline, &outcome));
    }

    orchestrator.shutdown().await?;

    if failed > 0 {
        return Err(format!("{failed} pipeline(s) failed").into());
    }
    Ok(())
}
