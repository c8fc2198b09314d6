//! Depth-first GitHub sync: organisation → repository → workflow → run → job.
//!
//! Each level fetches the children of one parent, reconciles them one at a
//! time (each write commits on its own) and descends into every child before
//! moving on to the next sibling. The parent's local id is passed down by
//! value, so nothing about the traversal is shared between branches.

use std::time::Instant;

use sea_orm::{DatabaseConnection, EntityTrait, IntoActiveModel};

use super::progress::{ProgressCallback, SyncProgress, emit};
use super::types::{HierarchySyncStats, LevelCounts, SyncError};
use crate::github::{Organisation, Repository, Workflow, WorkflowRun};
use crate::source::CodeHostSource;
use crate::store::{Reconciled, RemoteRecord, reconcile};

/// The GitHub hierarchy pipeline.
pub struct GitHubSync<S> {
    db: DatabaseConnection,
    source: S,
    on_progress: Option<ProgressCallback>,
}

impl<S: CodeHostSource> GitHubSync<S> {
    pub fn new(db: DatabaseConnection, source: S) -> Self {
        Self {
            db,
            source,
            on_progress: None,
        }
    }

    #[must_use]
    pub fn with_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    /// Walk every organisation visible to the source.
    ///
    /// # Errors
    /// Any store failure aborts the run. Fetch failures never do: the source
    /// reports them as empty collections and that branch simply ends.
    pub async fn run(&self) -> Result<HierarchySyncStats, SyncError> {
        let started = Instant::now();
        let organisations = self.source.organisations().await;
        self.fetched("organisation", "user", organisations.len());

        let mut stats = HierarchySyncStats::default();
        for org in &organisations {
            stats += self.sync_organisation(org).await?;
        }

        tracing::info!(
            organisations = stats.organisations.total(),
            repositories = stats.repositories.total(),
            workflows = stats.workflows.total(),
            workflow_runs = stats.workflow_runs.total(),
            workflow_jobs = stats.workflow_jobs.total(),
            created = stats.created(),
            updated = stats.updated(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "GitHub sync completed"
        );
        Ok(stats)
    }

    async fn sync_organisation(&self, org: &Organisation) -> Result<HierarchySyncStats, SyncError> {
        let mut stats = HierarchySyncStats::default();
        let stored = self
            .store(org, None, &org.login, &mut stats.organisations)
            .await?;
        let org_id = stored.model.id;

        let repositories = self.source.repositories(&org.login).await;
        self.fetched("repository", &org.login, repositories.len());

        for repo in &repositories {
            stats += self.sync_repository(&org.login, repo, org_id).await?;
        }
        Ok(stats)
    }

    async fn sync_repository(
        &self,
        owner: &str,
        repo: &Repository,
        organisation_id: i32,
    ) -> Result<HierarchySyncStats, SyncError> {
        let mut stats = HierarchySyncStats::default();
        let stored = self
            .store(repo, Some(organisation_id), &repo.full_name, &mut stats.repositories)
            .await?;
        let repo_id = stored.model.id;

        let workflows = self.source.workflows(owner, &repo.name).await;
        self.fetched("workflow", &format!("{owner}/{}", repo.name), workflows.len());

        for workflow in &workflows {
            stats += self.sync_workflow(owner, &repo.name, workflow, repo_id).await?;
        }
        Ok(stats)
    }

    async fn sync_workflow(
        &self,
        owner: &str,
        repo: &str,
        workflow: &Workflow,
        repository_id: i32,
    ) -> Result<HierarchySyncStats, SyncError> {
        let mut stats = HierarchySyncStats::default();
        let key = workflow.id.to_string();
        let stored = self
            .store(workflow, Some(repository_id), &key, &mut stats.workflows)
            .await?;
        let workflow_id = stored.model.id;

        let runs = self.source.workflow_runs(owner, repo, workflow.id).await;
        self.fetched("workflow run", &format!("{owner}/{repo} workflow {key}"), runs.len());

        for run in &runs {
            stats += self.sync_run(owner, repo, run, workflow_id).await?;
        }
        Ok(stats)
    }

    async fn sync_run(
        &self,
        owner: &str,
        repo: &str,
        run: &WorkflowRun,
        workflow_id: i32,
    ) -> Result<HierarchySyncStats, SyncError> {
        let mut stats = HierarchySyncStats::default();
        let key = run.id.to_string();
        let stored = self
            .store(run, Some(workflow_id), &key, &mut stats.workflow_runs)
            .await?;
        let run_id = stored.model.id;

        let jobs = self.source.run_jobs(owner, repo, run.id).await;
        self.fetched("workflow job", &format!("{owner}/{repo} run {key}"), jobs.len());

        for job in &jobs {
            let _stored = self
                .store(job, Some(run_id), &job.id.to_string(), &mut stats.workflow_jobs)
                .await?;
        }
        Ok(stats)
    }

    /// Reconcile one record and count it.
    async fn store<R>(
        &self,
        record: &R,
        parent: Option<i32>,
        key: &str,
        counts: &mut LevelCounts,
    ) -> Result<Reconciled<<R::Entity as EntityTrait>::Model>, SyncError>
    where
        R: RemoteRecord,
        <R::Entity as EntityTrait>::Model: IntoActiveModel<R::ActiveModel>,
    {
        match reconcile(&self.db, record, parent).await {
            Ok(reconciled) => {
                counts.record(reconciled.created);
                tracing::debug!(
                    level = R::KIND,
                    key,
                    created = reconciled.created,
                    "Reconciled GitHub record"
                );
                emit(
                    self.on_progress.as_ref(),
                    SyncProgress::RecordReconciled {
                        level: R::KIND,
                        key: key.to_string(),
                        created: reconciled.created,
                    },
                );
                Ok(reconciled)
            }
            Err(e) => {
                tracing::error!(level = R::KIND, key, error = %e, "Failed to store GitHub record");
                emit(
                    self.on_progress.as_ref(),
                    SyncProgress::RecordFailed {
                        level: R::KIND,
                        key: key.to_string(),
                        error: e.to_string(),
                    },
                );
                Err(e.into())
            }
        }
    }

    fn fetched(&self, level: &'static str, scope: &str, count: usize) {
        tracing::debug!(level, scope, count, "Fetched GitHub collection");
        emit(
            self.on_progress.as_ref(),
            SyncProgress::LevelFetched {
                level,
                scope: scope.to_string(),
                count,
            },
        );
    }
}
