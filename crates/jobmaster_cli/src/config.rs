//! Configuration file support for jobmaster.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. Environment variables (prefixed with `JOBMASTER_`, `__` between nested
//!    keys, e.g. `JOBMASTER_JIRA__BASE_URL`)
//! 2. Local config file (./jobmaster.toml)
//! 3. XDG config file (~/.config/jobmaster/config.toml)
//! 4. Built-in defaults
//!
//! Example config file:
//! ```toml
//! [database]
//! url = "postgres://jobmaster@localhost/jobmaster"  # default: SQLite in the XDG state dir
//!
//! [github]
//! token = "ghp_..."
//!
//! [jira]
//! base_url = "https://example.atlassian.net"
//! username = "bot@example.com"
//! token = "..."
//! page_size = 100
//! batch_size = 50
//!
//! [schedule]
//! github = "0 0 2 * * *"
//! jira = "0 0 3 * * *"   # empty string disables the schedule
//! ```

use std::path::PathBuf;

use config::builder::{ConfigBuilder as Builder, DefaultState};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use jobmaster::github::GITHUB_API_URL;
use jobmaster::scheduler::{DEFAULT_GITHUB_SCHEDULE, DEFAULT_JIRA_SCHEDULE};
use jobmaster::sync::{DEFAULT_BATCH_SIZE, DEFAULT_PAGE_SIZE, IssueSyncOptions};
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub github: GitHubConfig,
    pub jira: JiraConfig,
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database connection URL (`sqlite://`, `postgres://` or `mysql://`).
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Personal access token. Without it only public data is visible.
    pub token: Option<String>,
    pub base_url: String,
    /// Cap on pages followed per collection.
    pub max_pages: Option<u32>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: GITHUB_API_URL.to_string(),
            max_pages: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct JiraConfig {
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub token: Option<String>,
    /// Replaces the generated filter when set.
    pub custom_jql: Option<String>,
    pub page_size: u32,
    pub batch_size: usize,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            username: None,
            token: None,
            custom_jql: None,
            page_size: DEFAULT_PAGE_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Cron expressions (seconds first) for `serve`.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub github: String,
    pub jira: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            github: DEFAULT_GITHUB_SCHEDULE.to_string(),
            jira: DEFAULT_JIRA_SCHEDULE.to_string(),
        }
    }
}

fn environment() -> Environment {
    Environment::with_prefix("JOBMASTER")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl Config {
    /// Load configuration from files and the environment.
    ///
    /// A file or environment that fails to parse is logged and replaced by
    /// the defaults.
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(xdg_config) = Self::default_config_path()
            && xdg_config.exists()
        {
            tracing::debug!(path = %xdg_config.display(), "Loading config file");
            builder = builder.add_source(
                File::from(xdg_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let local_config = PathBuf::from("jobmaster.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./jobmaster.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        Self::from_builder(builder.add_source(environment()))
    }

    fn from_builder(builder: Builder<DefaultState>) -> Self {
        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to deserialize config");
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Failed to build config");
                Config::default()
            }
        }
    }

    /// Configured database URL, else a SQLite file in the state directory.
    ///
    /// `mode=rwc` creates the file on first use.
    pub fn database_url(&self) -> Option<String> {
        self.database.url.clone().or_else(|| {
            Self::default_state_dir().map(|state_dir| {
                let db_path = state_dir.join("jobmaster.db");
                format!("sqlite://{}?mode=rwc", db_path.display())
            })
        })
    }

    pub fn issue_sync_options(&self) -> IssueSyncOptions {
        IssueSyncOptions {
            custom_jql: self
                .jira
                .custom_jql
                .clone()
                .filter(|jql| !jql.trim().is_empty()),
            page_size: self.jira.page_size,
            batch_size: self.jira.batch_size,
        }
    }

    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "jobmaster").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// `$XDG_STATE_HOME/jobmaster` on Linux, the data directory elsewhere.
    pub fn default_state_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "jobmaster").map(|dirs| {
            dirs.state_dir()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| dirs.data_dir().to_path_buf())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_toml(toml: &str) -> Config {
        let settings = ConfigBuilder::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .expect("valid toml");
        settings.try_deserialize().expect("deserializes")
    }

    #[test]
    fn defaults_match_the_library() {
        let config = Config::default();
        assert_eq!(config.github.base_url, "https://api.github.com");
        assert_eq!(config.jira.page_size, 100);
        assert_eq!(config.jira.batch_size, 50);
        assert_eq!(config.schedule.github, "0 0 2 * * *");
        assert_eq!(config.schedule.jira, "0 0 3 * * *");
        assert!(config.database.url.is_none());
    }

    #[test]
    fn full_file_is_parsed() {
        let config = from_toml(
            r#"
            [database]
            url = "sqlite:///tmp/jm.db"

            [github]
            token = "ghp_test"
            max_pages = 3

            [jira]
            base_url = "https://example.atlassian.net"
            username = "bot@example.com"
            token = "secret"
            custom_jql = "project = CORE"
            page_size = 25

            [schedule]
            jira = ""
            "#,
        );

        assert_eq!(config.database.url.as_deref(), Some("sqlite:///tmp/jm.db"));
        assert_eq!(config.github.token.as_deref(), Some("ghp_test"));
        assert_eq!(config.github.max_pages, Some(3));
        assert_eq!(config.github.base_url, GITHUB_API_URL);
        assert_eq!(config.jira.username.as_deref(), Some("bot@example.com"));
        assert_eq!(config.jira.page_size, 25);
        assert_eq!(config.jira.batch_size, 50);
        assert_eq!(config.schedule.github, DEFAULT_GITHUB_SCHEDULE);
        assert!(config.schedule.jira.is_empty());
    }

    #[test]
    fn environment_overrides_file_values() {
        let env: HashMap<String, String> = [
            ("JOBMASTER_JIRA__BASE_URL", "https://env.atlassian.net"),
            ("JOBMASTER_JIRA__BATCH_SIZE", "10"),
            ("JOBMASTER_DATABASE__URL", "postgres://localhost/jm"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let builder = ConfigBuilder::builder()
            .add_source(File::from_str(
                "[jira]\nbase_url = \"https://file.atlassian.net\"\npage_size = 20\n",
                FileFormat::Toml,
            ))
            .add_source(environment().source(Some(env)));
        let config = Config::from_builder(builder);

        assert_eq!(
            config.jira.base_url.as_deref(),
            Some("https://env.atlassian.net")
        );
        assert_eq!(config.jira.batch_size, 10);
        assert_eq!(config.jira.page_size, 20);
        assert_eq!(config.database.url.as_deref(), Some("postgres://localhost/jm"));
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let builder = ConfigBuilder::builder()
            .add_source(File::from_str("[jira\npage_size = 1", FileFormat::Toml));
        let config = Config::from_builder(builder);
        assert_eq!(config.jira.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn issue_options_drop_blank_custom_jql() {
        let mut config = Config::default();
        config.jira.custom_jql = Some("  ".to_string());
        assert!(config.issue_sync_options().custom_jql.is_none());

        config.jira.custom_jql = Some("project = CORE".to_string());
        config.jira.batch_size = 5;
        let options = config.issue_sync_options();
        assert_eq!(options.custom_jql.as_deref(), Some("project = CORE"));
        assert_eq!(options.batch_size, 5);
    }

    #[test]
    fn database_url_defaults_to_state_dir() {
        let config = Config::default();
        if let Some(url) = config.database_url() {
            assert!(url.starts_with("sqlite://"));
            assert!(url.ends_with("jobmaster.db?mode=rwc"));
        }
    }

    #[test]
    fn database_url_respects_configured_value() {
        let mut config = Config::default();
        config.database.url = Some("postgres://localhost/jm".to_string());
        assert_eq!(
            config.database_url().as_deref(),
            Some("postgres://localhost/jm")
        );
    }
}
