use jobmaster::connect_and_migrate;
use jobmaster::scheduler::{GITHUB_PIPELINE, JIRA_PIPELINE};

use super::shared::{CliResult, build_orchestrator};
use crate::config::Config;
use crate::shutdown::wait_for_shutdown;

/// Run the scheduler until Ctrl+C.
pub(crate) async fn handle_serve(config: &Config, database_url: &str, run_now: bool) -> CliResult<()> {
    let db = connect_and_migrate(database_url).await?;
    let mut orchestrator = build_orchestrator(config, db).await?;

    for (pipeline, cron) in [
        (GITHUB_PIPELINE, config.schedule.github.trim()),
        (JIRA_PIPELINE, config.schedule.jira.trim()),
    ] {
        if cron.is_empty() {
            tracing::info!(pipeline, "Schedule disabled");
            orchestrator.unschedule(pipeline).await?;
        } else {
            orchestrator.schedule(pipeline, cron).await?;
        }
    }

    orchestrator.start().await?;
    for schedule in orchestrator.schedules().await {
        tracing::info!(pipeline = %schedule.name, cron = %schedule.cron, "Schedule active");
    }

    if run_now {
        for pipeline in orchestrator.pipeline_names() {
            let handle = orchestrator.trigger_now(&pipeline)?;
            tracing::info!(pipeline = %handle.pipeline, job_id = %handle.id, "Started initial run");
        }
    }

    tracing::info!("Scheduler running, press Ctrl+C to stop");
    wait_for_shutdown().await?;

    orchestrator.shutdown().await?;
    orchestrator.wait_idle().await;
    tracing::info!("Scheduler stopped");
    Ok(())
}
