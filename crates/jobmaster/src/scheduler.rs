//! Named pipelines, on-demand triggers and cron schedules.
//!
//! Every invocation, triggered or scheduled, goes through the same guard:
//! at most one run per pipeline name is in flight, and each run is wrapped
//! in [`retry_pipeline`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_cron_scheduler::{Job, JobScheduler};
use uuid::Uuid;

use crate::retry::{RetryConfig, retry_pipeline};
use crate::source::{CodeHostSource, IssueTrackerSource};
use crate::sync::{
    GitHubSync, HierarchySyncStats, IssueSyncStats, JiraSync, ProgressCallback, SyncError,
    SyncProgress, emit,
};

/// Name of the GitHub hierarchy pipeline.
pub const GITHUB_PIPELINE: &str = "github-sync";
/// Name of the Jira issue pipeline.
pub const JIRA_PIPELINE: &str = "jira-sync";

/// Daily at 02:00 (seconds-first cron).
pub const DEFAULT_GITHUB_SCHEDULE: &str = "0 0 2 * * *";
/// Daily at 03:00.
pub const DEFAULT_JIRA_SCHEDULE: &str = "0 0 3 * * *";

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("unknown pipeline: {0}")]
    UnknownPipeline(String),

    #[error("invalid cron expression {expression:?}: {message}")]
    InvalidCron { expression: String, message: String },

    #[error("scheduler error: {0}")]
    Scheduler(String),
}

/// What a successful pipeline run reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncReport {
    Hierarchy(HierarchySyncStats),
    Issues(IssueSyncStats),
}

/// A sync procedure the orchestrator can run by name.
#[async_trait]
pub trait SyncPipeline: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self) -> Result<SyncReport, SyncError>;
}

#[async_trait]
impl<S: CodeHostSource> SyncPipeline for GitHubSync<S> {
    fn name(&self) -> &str {
        GITHUB_PIPELINE
    }

    async fn run(&self) -> Result<SyncReport, SyncError> {
        GitHubSync::run(self).await.map(SyncReport::Hierarchy)
    }
}

#[async_trait]
impl<S: IssueTrackerSource> SyncPipeline for JiraSync<S> {
    fn name(&self) -> &str {
        JIRA_PIPELINE
    }

    async fn run(&self) -> Result<SyncReport, SyncError> {
        JiraSync::run(self).await.map(SyncReport::Issues)
    }
}

/// How one invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(SyncReport),
    /// Every attempt failed; carries the last error.
    Failed(String),
    /// The same pipeline was already running.
    Skipped,
}

/// Handle to a triggered run.
#[derive(Debug)]
pub struct JobHandle {
    pub id: Uuid,
    pub pipeline: String,
    join: JoinHandle<RunOutcome>,
}

impl JobHandle {
    /// Wait for the run to finish.
    pub async fn wait(self) -> RunOutcome {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(e) => RunOutcome::Failed(format!("pipeline task aborted: {e}")),
        }
    }
}

/// A named recurring schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleInfo {
    pub name: String,
    pub cron: String,
}

struct ScheduleEntry {
    cron: String,
    job_id: Uuid,
}

struct PipelineSlot {
    pipeline: Arc<dyn SyncPipeline>,
    running: Arc<Mutex<()>>,
}

/// Registry of pipelines plus the cron scheduler driving them.
pub struct Orchestrator {
    pipelines: HashMap<String, Arc<PipelineSlot>>,
    scheduler: JobScheduler,
    schedules: Mutex<HashMap<String, ScheduleEntry>>,
    retry: RetryConfig,
    on_progress: Option<Arc<ProgressCallback>>,
}

impl Orchestrator {
    pub async fn new(retry: RetryConfig) -> Result<Self, SchedulerError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| SchedulerError::Scheduler(e.to_string()))?;
        Ok(Self {
            pipelines: HashMap::new(),
            scheduler,
            schedules: Mutex::new(HashMap::new()),
            retry,
            on_progress: None,
        })
    }

    /// Receive pipeline start/finish and retry events.
    #[must_use]
    pub fn with_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.on_progress = Some(Arc::new(on_progress));
        self
    }

    /// Register a pipeline under its own name, replacing any previous one.
    pub fn register(&mut self, pipeline: Arc<dyn SyncPipeline>) {
        let name = pipeline.name().to_string();
        tracing::debug!(pipeline = %name, "Registered pipeline");
        self.pipelines.insert(
            name,
            Arc::new(PipelineSlot {
                pipeline,
                running: Arc::new(Mutex::new(())),
            }),
        );
    }

    pub fn pipeline_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.pipelines.keys().cloned().collect();
        names.sort();
        names
    }

    fn slot(&self, name: &str) -> Result<Arc<PipelineSlot>, SchedulerError> {
        self.pipelines
            .get(name)
            .cloned()
            .ok_or_else(|| SchedulerError::UnknownPipeline(name.to_string()))
    }

    /// Run a pipeline now in the background.
    pub fn trigger_now(&self, name: &str) -> Result<JobHandle, SchedulerError> {
        let slot = self.slot(name)?;
        let id = Uuid::new_v4();
        tracing::info!(pipeline = name, job_id = %id, "Triggered pipeline");

        let join = tokio::spawn(run_guarded(slot, self.retry.clone(), self.on_progress.clone()));
        Ok(JobHandle {
            id,
            pipeline: name.to_string(),
            join,
        })
    }

    /// Create or replace the recurring schedule for `name`.
    pub async fn schedule(&self, name: &str, cron: &str) -> Result<(), SchedulerError> {
        let slot = self.slot(name)?;
        let retry = self.retry.clone();
        let on_progress = self.on_progress.clone();

        let job = Job::new_async(cron, move |_id, _scheduler| {
            let slot = Arc::clone(&slot);
            let retry = retry.clone();
            let on_progress = on_progress.clone();
            Box::pin(async move {
                run_guarded(slot, retry, on_progress).await;
            })
        })
        .map_err(|e| SchedulerError::InvalidCron {
            expression: cron.to_string(),
            message: e.to_string(),
        })?;

        let mut schedules = self.schedules.lock().await;
        let job_id = self
            .scheduler
            .add(job)
            .await
            .map_err(|e| SchedulerError::Scheduler(e.to_string()))?;
        let previous = schedules.insert(
            name.to_string(),
            ScheduleEntry {
                cron: cron.to_string(),
                job_id,
            },
        );
        // The new job is live before the old one goes away.
        if let Some(previous) = previous {
            self.scheduler
                .remove(&previous.job_id)
                .await
                .map_err(|e| SchedulerError::Scheduler(e.to_string()))?;
        }

        tracing::info!(pipeline = name, cron, "Scheduled pipeline");
        Ok(())
    }

    /// Remove the schedule for `name`. Absent schedules are not an error.
    pub async fn unschedule(&self, name: &str) -> Result<(), SchedulerError> {
        let mut schedules = self.schedules.lock().await;
        if let Some(entry) = schedules.remove(name) {
            self.scheduler
                .remove(&entry.job_id)
                .await
                .map_err(|e| SchedulerError::Scheduler(e.to_string()))?;
            tracing::info!(pipeline = name, "Unscheduled pipeline");
        }
        Ok(())
    }

    pub async fn schedules(&self) -> Vec<ScheduleInfo> {
        let schedules = self.schedules.lock().await;
        let mut list: Vec<_> = schedules
            .iter()
            .map(|(name, entry)| ScheduleInfo {
                name: name.clone(),
                cron: entry.cron.clone(),
            })
            .collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }

    /// Start firing schedules.
    pub async fn start(&self) -> Result<(), SchedulerError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| SchedulerError::Scheduler(e.to_string()))
    }

    /// Wait until no registered pipeline is running.
    pub async fn wait_idle(&self) {
        for slot in self.pipelines.values() {
            let _idle = slot.running.lock().await;
        }
    }

    /// Stop firing schedules. Runs already in flight are not interrupted.
    pub async fn shutdown(&mut self) -> Result<(), SchedulerError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| SchedulerError::Scheduler(e.to_string()))
    }
}

async fn run_guarded(
    slot: Arc<PipelineSlot>,
    retry: RetryConfig,
    on_progress: Option<Arc<ProgressCallback>>,
) -> RunOutcome {
    let name = slot.pipeline.name().to_string();
    let progress = on_progress.as_deref();

    let Ok(_guard) = Arc::clone(&slot.running).try_lock_owned() else {
        tracing::warn!(pipeline = %name, "Pipeline already running, skipping");
        return RunOutcome::Skipped;
    };

    tracing::info!(pipeline = %name, "Pipeline started");
    emit(
        progress,
        SyncProgress::PipelineStarted {
            pipeline: name.clone(),
        },
    );
    let started = Instant::now();

    let result = retry_pipeline(|| slot.pipeline.run(), &retry, &name, progress).await;
    let duration_ms = started.elapsed().as_millis() as u64;
    emit(
        progress,
        SyncProgress::PipelineCompleted {
            pipeline: name.clone(),
            success: result.is_ok(),
            duration_ms,
        },
    );

    match result {
        Ok(report) => {
            tracing::info!(pipeline = %name, duration_ms, "Pipeline completed");
            RunOutcome::Completed(report)
        }
        Err(e) => {
            tracing::error!(pipeline = %name, duration_ms, error = %e, "Pipeline failed");
            RunOutcome::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use sea_orm::DbErr;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    struct FakePipeline {
        name: &'static str,
        calls: AtomicU32,
        failures: u32,
        started: Arc<Notify>,
        gate: Option<Arc<Notify>>,
    }

    impl FakePipeline {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                calls: AtomicU32::new(0),
                failures: 0,
                started: Arc::new(Notify::new()),
                gate: None,
            }
        }
    }

    #[async_trait]
    impl SyncPipeline for FakePipeline {
        fn name(&self) -> &str {
            self.name
        }

        async fn run(&self) -> Result<SyncReport, SyncError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            self.started.notify_one();
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if call < self.failures {
                return Err(SyncError::Store(StoreError::Database(DbErr::Custom(
                    "disk I/O error".to_string(),
                ))));
            }
            Ok(SyncReport::Issues(IssueSyncStats::default()))
        }
    }

    fn fast_retry() -> RetryConfig {
        RetryConfig::new(Duration::from_millis(1), Duration::from_millis(2), 2).with_jitter(false)
    }

    async fn orchestrator() -> Orchestrator {
        Orchestrator::new(fast_retry())
            .await
            .expect("scheduler should start")
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn trigger_runs_registered_pipeline() {
        let mut orch = orchestrator().await;
        let pipeline = Arc::new(FakePipeline::new(JIRA_PIPELINE));
        orch.register(pipeline.clone());

        let handle = orch.trigger_now(JIRA_PIPELINE).expect("known pipeline");
        assert_eq!(handle.pipeline, JIRA_PIPELINE);
        assert_eq!(
            handle.wait().await,
            RunOutcome::Completed(SyncReport::Issues(IssueSyncStats::default()))
        );
        assert_eq!(pipeline.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unknown_pipeline_is_rejected() {
        let orch = orchestrator().await;
        assert!(matches!(
            orch.trigger_now("nope"),
            Err(SchedulerError::UnknownPipeline(name)) if name == "nope"
        ));
        assert!(matches!(
            orch.schedule("nope", DEFAULT_GITHUB_SCHEDULE).await,
            Err(SchedulerError::UnknownPipeline(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn failing_pipeline_is_retried_then_reported() {
        let mut orch = orchestrator().await;
        let mut pipeline = FakePipeline::new(GITHUB_PIPELINE);
        pipeline.failures = u32::MAX;
        let pipeline = Arc::new(pipeline);
        orch.register(pipeline.clone());

        let outcome = orch
            .trigger_now(GITHUB_PIPELINE)
            .expect("known pipeline")
            .wait()
            .await;

        assert!(matches!(outcome, RunOutcome::Failed(ref msg) if msg.contains("disk I/O error")));
        assert_eq!(pipeline.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn transient_failure_recovers_within_retry_budget() {
        let mut orch = orchestrator().await;
        let mut pipeline = FakePipeline::new(GITHUB_PIPELINE);
        pipeline.failures = 1;
        let pipeline = Arc::new(pipeline);
        orch.register(pipeline.clone());

        let outcome = orch
            .trigger_now(GITHUB_PIPELINE)
            .expect("known pipeline")
            .wait()
            .await;

        assert!(matches!(outcome, RunOutcome::Completed(_)));
        assert_eq!(pipeline.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn second_trigger_is_skipped_while_first_is_running() {
        let mut orch = orchestrator().await;
        let gate = Arc::new(Notify::new());
        let mut pipeline = FakePipeline::new(GITHUB_PIPELINE);
        pipeline.gate = Some(Arc::clone(&gate));
        let started = Arc::clone(&pipeline.started);
        orch.register(Arc::new(pipeline));

        let first = orch.trigger_now(GITHUB_PIPELINE).expect("first trigger");
        started.notified().await;

        let second = orch.trigger_now(GITHUB_PIPELINE).expect("second trigger");
        assert_ne!(first.id, second.id);
        assert_eq!(second.wait().await, RunOutcome::Skipped);

        gate.notify_one();
        orch.wait_idle().await;
        assert!(matches!(first.wait().await, RunOutcome::Completed(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn schedule_is_an_idempotent_upsert() {
        let mut orch = orchestrator().await;
        orch.register(Arc::new(FakePipeline::new(GITHUB_PIPELINE)));
        orch.register(Arc::new(FakePipeline::new(JIRA_PIPELINE)));

        orch.schedule(GITHUB_PIPELINE, DEFAULT_GITHUB_SCHEDULE)
            .await
            .expect("schedule");
        orch.schedule(JIRA_PIPELINE, DEFAULT_JIRA_SCHEDULE)
            .await
            .expect("schedule");
        orch.schedule(GITHUB_PIPELINE, "0 30 1 * * *")
            .await
            .expect("reschedule");

        assert_eq!(
            orch.schedules().await,
            vec![
                ScheduleInfo {
                    name: GITHUB_PIPELINE.to_string(),
                    cron: "0 30 1 * * *".to_string(),
                },
                ScheduleInfo {
                    name: JIRA_PIPELINE.to_string(),
                    cron: DEFAULT_JIRA_SCHEDULE.to_string(),
                },
            ]
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn rescheduled_pipeline_fires_on_the_new_expression() {
        let mut orch = orchestrator().await;
        let pipeline = FakePipeline::new(GITHUB_PIPELINE);
        let started = Arc::clone(&pipeline.started);
        orch.register(Arc::new(pipeline));

        orch.schedule(GITHUB_PIPELINE, "0 0 0 1 1 *")
            .await
            .expect("yearly schedule");
        orch.schedule(GITHUB_PIPELINE, "* * * * * *")
            .await
            .expect("every second");
        orch.start().await.expect("start");

        tokio::time::timeout(Duration::from_secs(5), started.notified())
            .await
            .expect("replacement job should fire");
        assert_eq!(orch.schedules().await.len(), 1);
        orch.shutdown().await.expect("shutdown");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unschedule_removes_and_tolerates_absent_names() {
        let mut orch = orchestrator().await;
        orch.register(Arc::new(FakePipeline::new(JIRA_PIPELINE)));
        orch.schedule(JIRA_PIPELINE, DEFAULT_JIRA_SCHEDULE)
            .await
            .expect("schedule");

        orch.unschedule(JIRA_PIPELINE).await.expect("unschedule");
        orch.unschedule(JIRA_PIPELINE).await.expect("second unschedule");
        orch.unschedule("never-scheduled")
            .await
            .expect("absent name");
        assert!(orch.schedules().await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn invalid_cron_is_rejected_without_touching_existing_schedule() {
        let mut orch = orchestrator().await;
        orch.register(Arc::new(FakePipeline::new(JIRA_PIPELINE)));
        orch.schedule(JIRA_PIPELINE, DEFAULT_JIRA_SCHEDULE)
            .await
            .expect("schedule");

        let err = orch
            .schedule(JIRA_PIPELINE, "every tuesday")
            .await
            .expect_err("invalid cron");
        assert!(matches!(err, SchedulerError::InvalidCron { ref expression, .. } if expression == "every tuesday"));
        assert_eq!(orch.schedules().await.len(), 1);
    }
}
