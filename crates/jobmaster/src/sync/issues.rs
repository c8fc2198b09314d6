//! Paginated Jira sync with per-issue isolation and batched commits.

use std::time::Instant;

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use super::progress::{ProgressCallback, SyncProgress, emit};
use super::types::{DEFAULT_LOOKBACK, IssueSyncOptions, IssueSyncStats, SyncError};
use crate::jira::IssueRecord;
use crate::source::IssueTrackerSource;
use crate::store::{StoreError, reconcile};

/// Build the search filter for a run.
///
/// A non-blank `custom` filter is used verbatim. Otherwise the filter selects
/// issues updated within the lookback window, restricted to `project_keys`
/// when any were discovered, most recently updated first.
pub fn build_jql(project_keys: &[String], custom: Option<&str>) -> String {
    if let Some(custom) = custom.filter(|c| !c.trim().is_empty()) {
        return custom.to_string();
    }
    if project_keys.is_empty() {
        format!("updated >= {DEFAULT_LOOKBACK} ORDER BY updated DESC")
    } else {
        format!(
            "project IN ({}) AND updated >= {DEFAULT_LOOKBACK} ORDER BY updated DESC",
            project_keys.join(",")
        )
    }
}

/// The Jira issue pipeline.
///
/// `source` is `None` when no credentials are configured, in which case
/// [`run`](Self::run) logs a warning and does nothing.
pub struct JiraSync<S> {
    db: DatabaseConnection,
    source: Option<S>,
    options: IssueSyncOptions,
    on_progress: Option<ProgressCallback>,
}

impl<S: IssueTrackerSource> JiraSync<S> {
    pub fn new(db: DatabaseConnection, source: Option<S>, options: IssueSyncOptions) -> Self {
        Self {
            db,
            source,
            options,
            on_progress: None,
        }
    }

    #[must_use]
    pub fn with_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    pub fn options(&self) -> &IssueSyncOptions {
        &self.options
    }

    /// Scan every matching issue and store it.
    ///
    /// Issues that fail to store are rolled back individually, logged and
    /// counted in `failed`. Committed batches stay committed if a later
    /// commit fails.
    ///
    /// # Errors
    /// Returns an error when a transaction cannot be opened or committed.
    pub async fn run(&self) -> Result<IssueSyncStats, SyncError> {
        let Some(source) = &self.source else {
            tracing::warn!("Jira credentials not configured, skipping Jira sync");
            emit(
                self.on_progress.as_ref(),
                SyncProgress::Warning {
                    message: "Jira credentials not configured".to_string(),
                },
            );
            return Ok(IssueSyncStats::default());
        };

        let started = Instant::now();
        let project_keys = source.project_keys().await;
        tracing::info!(
            projects = project_keys.len(),
            keys = %project_keys.join(", "),
            "Discovered Jira projects"
        );

        let jql = build_jql(&project_keys, self.options.custom_jql.as_deref());
        tracing::info!(jql = %jql, "Using JQL query");

        let page_size = self.options.page_size.max(1);
        let batch_size = self.options.batch_size.max(1);

        let mut stats = IssueSyncStats::default();
        let mut txn = self.db.begin().await?;
        let mut pending = 0usize;
        let mut committed = 0usize;
        let mut start_at = 0u32;

        loop {
            let page = source.search(&jql, start_at, page_size).await;
            emit(
                self.on_progress.as_ref(),
                SyncProgress::PageFetched {
                    start_at,
                    count: page.issues.len(),
                    total: page.total,
                },
            );
            if page.issues.is_empty() {
                break;
            }

            for issue in &page.issues {
                stats.total += 1;
                let record = IssueRecord::from(issue);

                match store_isolated(&txn, &record).await {
                    Ok(created) => {
                        if created {
                            stats.created += 1;
                        } else {
                            stats.updated += 1;
                        }
                        pending += 1;
                        emit(
                            self.on_progress.as_ref(),
                            SyncProgress::RecordReconciled {
                                level: "issue",
                                key: record.issue_key.clone(),
                                created,
                            },
                        );
                    }
                    Err(e) => {
                        stats.failed += 1;
                        tracing::error!(
                            issue_key = %record.issue_key,
                            error = %e,
                            "Failed to sync Jira issue"
                        );
                        emit(
                            self.on_progress.as_ref(),
                            SyncProgress::RecordFailed {
                                level: "issue",
                                key: record.issue_key.clone(),
                                error: e.to_string(),
                            },
                        );
                    }
                }

                if pending >= batch_size {
                    txn.commit().await?;
                    committed += pending;
                    stats.commits += 1;
                    self.committed(pending, committed);
                    pending = 0;
                    txn = self.db.begin().await?;
                }
            }

            start_at = start_at.saturating_add(page.issues.len() as u32);
            if start_at >= page.total {
                break;
            }
        }

        txn.commit().await?;
        if pending > 0 {
            committed += pending;
            stats.commits += 1;
            self.committed(pending, committed);
        }

        tracing::info!(
            total = stats.total,
            created = stats.created,
            updated = stats.updated,
            failed = stats.failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Jira sync completed"
        );
        Ok(stats)
    }

    fn committed(&self, count: usize, committed_so_far: usize) {
        tracing::info!(count, committed_so_far, "Committed Jira issue batch");
        emit(
            self.on_progress.as_ref(),
            SyncProgress::BatchCommitted {
                count,
                committed_so_far,
            },
        );
    }
}

/// Reconcile one issue inside its own savepoint. Returns whether it was new.
async fn store_isolated(txn: &DatabaseTransaction, record: &IssueRecord) -> Result<bool, StoreError> {
    let savepoint = txn.begin().await?;
    match reconcile(&savepoint, record, None).await {
        Ok(reconciled) => {
            savepoint.commit().await?;
            Ok(reconciled.created)
        }
        Err(e) => {
            savepoint.rollback().await?;
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn default_jql_without_projects() {
        assert_eq!(build_jql(&[], None), "updated >= -30d ORDER BY updated DESC");
    }

    #[test]
    fn default_jql_restricts_to_discovered_projects() {
        assert_eq!(
            build_jql(&keys(&["CORE", "WEB"]), None),
            "project IN (CORE,WEB) AND updated >= -30d ORDER BY updated DESC"
        );
    }

    #[test]
    fn custom_jql_is_used_verbatim() {
        let custom = "assignee = currentUser() ORDER BY created ASC";
        assert_eq!(build_jql(&keys(&["CORE"]), Some(custom)), custom);
    }

    #[test]
    fn blank_custom_jql_falls_back_to_default() {
        assert_eq!(
            build_jql(&keys(&["CORE"]), Some("   ")),
            "project IN (CORE) AND updated >= -30d ORDER BY updated DESC"
        );
    }
}
