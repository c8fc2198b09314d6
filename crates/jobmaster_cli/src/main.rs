//! jobmaster CLI - syncs GitHub Actions and Jira data into a local store.

mod commands;
mod config;
mod progress;
mod shutdown;

use clap::{Parser, Subcommand, ValueEnum};
use console::Term;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jobmaster")]
#[command(version)]
#[command(about = "Mirror GitHub Actions and Jira issues into a relational store")]
#[command(
    long_about = "jobmaster walks the GitHub hierarchy (organisations, repositories, \
workflows, runs and jobs) and the Jira issues of the configured projects, and \
reconciles both into a local database. It can run once or as a scheduler daemon."
)]
#[command(after_long_help = r#"EXAMPLES
    Sync everything once:
        $ jobmaster sync all

    Sync only Jira issues:
        $ jobmaster sync jira

    Run the nightly schedules until Ctrl+C:
        $ jobmaster serve

CONFIGURATION
    jobmaster reads configuration from:
      1. ~/.config/jobmaster/config.toml (or $XDG_CONFIG_HOME/jobmaster/config.toml)
      2. ./jobmaster.toml
      3. Environment variables (JOBMASTER_* prefix, `__` between sections)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    JOBMASTER_DATABASE__URL       Database connection string (default: ~/.local/state/jobmaster/jobmaster.db)
    JOBMASTER_GITHUB__TOKEN       GitHub personal access token
    JOBMASTER_JIRA__BASE_URL      Jira site, e.g. https://example.atlassian.net
    JOBMASTER_JIRA__USERNAME      Jira account email
    JOBMASTER_JIRA__TOKEN         Jira API token
    JOBMASTER_JIRA__CUSTOM_JQL    Replaces the default issue query
    JOBMASTER_SCHEDULE__GITHUB    Cron expression (seconds first) for github-sync
    JOBMASTER_SCHEDULE__JIRA      Cron expression (seconds first) for jira-sync
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one or both pipelines once
    Sync {
        /// Which pipeline to run
        #[arg(value_enum, default_value_t = SyncTarget::All)]
        target: SyncTarget,
    },
    /// Run the pipelines on their cron schedules until Ctrl+C
    Serve {
        /// Also trigger every pipeline immediately on startup
        #[arg(long)]
        run_now: bool,
    },
    /// Show row counts and configured sources
    Status,
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SyncTarget {
    /// GitHub organisations down to workflow jobs
    Github,
    /// Jira issues
    Jira,
    /// Both pipelines concurrently
    All,
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// Rollback the last migration
    Down,
    /// Show migration status
    Status,
    /// Fresh install - drop all tables and reapply migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("jobmaster=info,jobmaster_cli=info"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(Term::stderr().is_term())
        .with_target(false)
        .init();

    let config = config::Config::load();
    let cli = Cli::parse();

    let database_url = config
        .database_url()
        .ok_or("could not determine a database URL, set JOBMASTER_DATABASE__URL")?;

    if database_url.starts_with("sqlite://") {
        let db_path = database_url.trim_start_matches("sqlite://");
        let db_path = db_path.split('?').next().unwrap_or(db_path);
        let db_path = std::path::Path::new(db_path);

        if db_path.is_relative() && !db_path.as_os_str().is_empty() {
            tracing::warn!(
                "Database path '{}' is relative - behavior depends on current directory.",
                db_path.display()
            );
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
    }

    match cli.command {
        Commands::Sync { target } => {
            commands::sync::handle_sync(target, &config, &database_url).await?;
        }
        Commands::Serve { run_now } => {
            commands::serve::handle_serve(&config, &database_url, run_now).await?;
        }
        Commands::Status => {
            commands::status::handle_status(&config, &database_url).await?;
        }
        Commands::Migrate { action } => {
            commands::migrate::handle_migrate(action, &database_url).await?;
        }
    }

    Ok(())
}
