//! Bounded retry around whole pipeline runs.
//!
//! Fetch failures never reach this layer (the sources absorb them), so the
//! only errors retried here are store and transaction failures.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};

use crate::sync::{ProgressCallback, SyncError, SyncProgress, emit};

/// Total attempts per pipeline invocation, including the first.
pub const PIPELINE_MAX_ATTEMPTS: u32 = 3;

/// Delay before the first retry.
pub const INITIAL_BACKOFF: Duration = Duration::from_secs(10);

/// Upper bound for any single retry delay.
pub const MAX_BACKOFF: Duration = Duration::from_secs(120);

/// Configuration for retry operations.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Minimum delay between retries.
    pub min_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Retries after the first attempt.
    pub max_retries: usize,
    /// Whether to add jitter to delays.
    pub with_jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            min_delay: INITIAL_BACKOFF,
            max_delay: MAX_BACKOFF,
            max_retries: (PIPELINE_MAX_ATTEMPTS - 1) as usize,
            with_jitter: true,
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub fn new(min_delay: Duration, max_delay: Duration, max_retries: usize) -> Self {
        Self {
            min_delay,
            max_delay,
            max_retries,
            with_jitter: true,
        }
    }

    #[must_use]
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.with_jitter = jitter;
        self
    }

    /// Build an exponential backoff strategy from this configuration.
    #[must_use]
    pub fn into_backoff(self) -> ExponentialBuilder {
        let mut builder = ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries);

        if self.with_jitter {
            builder = builder.with_jitter();
        }

        builder
    }
}

/// Run `operation`, retrying failed attempts with exponential backoff.
///
/// Every retry is logged at warn level and reported as
/// [`SyncProgress::RetryScheduled`]. The error of the last attempt is
/// returned once the retries are exhausted.
pub async fn retry_pipeline<T, F, Fut>(
    operation: F,
    config: &RetryConfig,
    pipeline: &str,
    on_progress: Option<&ProgressCallback>,
) -> Result<T, SyncError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SyncError>>,
{
    let attempt = AtomicU32::new(0);
    let mut operation = operation;

    let counted = || {
        attempt.fetch_add(1, Ordering::SeqCst);
        operation()
    };

    counted
        .retry(config.clone().into_backoff())
        .notify(|err, dur| {
            let current = attempt.load(Ordering::SeqCst);
            tracing::warn!(
                pipeline,
                attempt = current,
                max_attempts = config.max_retries + 1,
                retry_in_ms = dur.as_millis() as u64,
                error = %err,
                "Pipeline run failed, retrying"
            );
            emit(
                on_progress,
                SyncProgress::RetryScheduled {
                    pipeline: pipeline.to_string(),
                    attempt: current,
                    retry_after_ms: dur.as_millis() as u64,
                    error: err.to_string(),
                },
            );
        })
        .await
}
