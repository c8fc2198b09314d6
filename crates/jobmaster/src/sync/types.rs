//! Pipeline statistics, options and errors.

use std::ops::AddAssign;

use sea_orm::DbErr;
use thiserror::Error;

use crate::store::StoreError;

/// Default number of issues requested per search page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Default number of successfully stored issues per commit.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Default lookback of the generated JQL filter.
pub const DEFAULT_LOOKBACK: &str = "-30d";

/// Failures that abort a whole pipeline run (and trigger its retry).
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Created/updated counts for one entity kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelCounts {
    pub created: usize,
    pub updated: usize,
}

impl LevelCounts {
    pub fn record(&mut self, created: bool) {
        if created {
            self.created += 1;
        } else {
            self.updated += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.created + self.updated
    }
}

impl AddAssign for LevelCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.created += rhs.created;
        self.updated += rhs.updated;
    }
}

/// Result of one GitHub hierarchy run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HierarchySyncStats {
    pub organisations: LevelCounts,
    pub repositories: LevelCounts,
    pub workflows: LevelCounts,
    pub workflow_runs: LevelCounts,
    pub workflow_jobs: LevelCounts,
}

impl HierarchySyncStats {
    /// Rows inserted across all levels.
    pub fn created(&self) -> usize {
        self.levels().iter().map(|l| l.created).sum()
    }

    /// Rows merged across all levels.
    pub fn updated(&self) -> usize {
        self.levels().iter().map(|l| l.updated).sum()
    }

    fn levels(&self) -> [LevelCounts; 5] {
        [
            self.organisations,
            self.repositories,
            self.workflows,
            self.workflow_runs,
            self.workflow_jobs,
        ]
    }
}

impl AddAssign for HierarchySyncStats {
    fn add_assign(&mut self, rhs: Self) {
        self.organisations += rhs.organisations;
        self.repositories += rhs.repositories;
        self.workflows += rhs.workflows;
        self.workflow_runs += rhs.workflow_runs;
        self.workflow_jobs += rhs.workflow_jobs;
    }
}

/// Result of one Jira run. Informational only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssueSyncStats {
    /// Issues seen across all pages.
    pub total: usize,
    pub created: usize,
    pub updated: usize,
    /// Issues that could not be stored and were skipped.
    pub failed: usize,
    /// Batch commits that wrote at least one issue.
    pub commits: usize,
}

/// Tuning for the Jira pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueSyncOptions {
    /// Used verbatim instead of the generated filter when set.
    pub custom_jql: Option<String>,
    pub page_size: u32,
    pub batch_size: usize,
}

impl Default for IssueSyncOptions {
    fn default() -> Self {
        Self {
            custom_jql: None,
            page_size: DEFAULT_PAGE_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hierarchy_stats_sum_per_level() {
        let mut total = HierarchySyncStats::default();
        let mut branch = HierarchySyncStats::default();
        branch.repositories.record(true);
        branch.workflows.record(false);
        branch.workflow_jobs.record(true);

        total += branch;
        total += branch;

        assert_eq!(total.repositories.created, 2);
        assert_eq!(total.workflows.updated, 2);
        assert_eq!(total.created(), 4);
        assert_eq!(total.updated(), 2);
    }

    #[test]
    fn issue_options_defaults() {
        let options = IssueSyncOptions::default();
        assert_eq!(options.page_size, 100);
        assert_eq!(options.batch_size, 50);
        assert!(options.custom_jql.is_none());
    }
}
