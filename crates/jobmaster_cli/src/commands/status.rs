use console::style;
use jobmaster::connect_and_migrate;
use jobmaster::store::count_rows;

use super::shared::CliResult;
use crate::config::Config;

/// Print row counts and what is configured.
pub(crate) async fn handle_status(config: &Config, database_url: &str) -> CliResult<()> {
    let db = connect_and_migrate(database_url).await?;
    let counts = count_rows(&db).await?;

    println!("{}", style("Store").bold());
    for (label, count) in [
        ("organisations", counts.organisations),
        ("repositories", counts.repositories),
        ("workflows", counts.workflows),
        ("workflow runs", counts.workflow_runs),
        ("workflow jobs", counts.workflow_jobs),
        ("jira issues", counts.jira_issues),
    ] {
        println!("  {label:<14} {count:>8}");
    }

    let configured = |set: bool| {
        if set {
            style("configured").green()
        } else {
            style("not configured").yellow()
        }
    };
    let jira_ready = config.jira.base_url.is_some()
        && config.jira.username.is_some()
        && config.jira.token.is_some();

    println!();
    println!("{}", style("Sources").bold());
    println!("  github token   {}", configured(config.github.token.is_some()));
    println!("  jira           {}", configured(jira_ready));

    println!();
    println!("{}", style("Schedules").bold());
    for (name, cron) in [
        ("github-sync", &config.schedule.github),
        ("jira-sync", &config.schedule.jira),
    ] {
        let cron = if cron.trim().is_empty() { "disabled" } else { cron.as_str() };
        println!("  {name:<14} {cron}");
    }

    Ok(())
}
