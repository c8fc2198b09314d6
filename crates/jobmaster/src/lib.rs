//! JobMaster: syncs GitHub organisations and Actions history plus Jira issues
//! into a local relational store.
//!
//! Two pipelines feed the store:
//!
//! - [`sync::GitHubSync`] walks organisation → repository → workflow → run →
//!   job depth-first, linking every row to its parent.
//! - [`sync::JiraSync`] scans a JQL search page by page and commits in
//!   batches, isolating failures per issue.
//!
//! Both reconcile through [`store::reconcile`], which matches rows on their
//! external key and never deletes. [`scheduler::Orchestrator`] runs them on
//! demand or on cron schedules with bounded retries.
//!
//! # Features
//!
//! - `sqlite` (default), `postgres`, `mysql` - database driver.
//! - `migrate` (default) - schema migrations and [`connect_and_migrate`].
//!
//! # Example
//!
//! ```ignore
//! use jobmaster::{connect_and_migrate, github::GitHubClient, sync::GitHubSync};
//!
//! let db = connect_and_migrate("sqlite://jobmaster.db?mode=rwc").await?;
//! let client = GitHubClient::new(jobmaster::github::GITHUB_API_URL, Some(&token))?;
//! let stats = GitHubSync::new(db, client).run().await?;
//! println!("{} rows created", stats.created());
//! ```

pub mod db;
pub mod entity;
pub mod github;
pub mod http;
pub mod jira;
pub mod retry;
pub mod scheduler;
pub mod source;
pub mod store;
pub mod sync;

#[cfg(feature = "migrate")]
pub mod migration;

pub use db::connect;
#[cfg(feature = "migrate")]
pub use db::connect_and_migrate;
pub use entity::prelude::*;
pub use store::StoreError;
