use jobmaster::sync::SyncProgress;

/// Logging reporter using tracing for structured output.
#[derive(Debug, Default)]
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, event: SyncProgress) {
        match event {
            SyncProgress::PipelineStarted { pipeline } => {
                tracing::info!(pipeline = %pipeline, "Pipeline started");
            }

            SyncProgress::PipelineCompleted {
                pipeline,
                success,
                duration_ms,
            } => {
                if success {
                    tracing::info!(pipeline = %pipeline, duration_ms, "Pipeline finished");
                } else {
                    tracing::error!(pipeline = %pipeline, duration_ms, "Pipeline failed");
                }
            }

            SyncProgress::LevelFetched {
                level,
                scope,
                count,
            } => {
                tracing::debug!(level, scope = %scope, count, "Fetched");
            }

            SyncProgress::RecordReconciled {
                level,
                key,
                created,
            } => {
                tracing::trace!(level, key = %key, created, "Stored");
            }

            SyncProgress::RecordFailed { level, key, error } => {
                tracing::warn!(level, key = %key, error = %error, "Failed to store record");
            }

            SyncProgress::PageFetched {
                start_at,
                count,
                total,
            } => {
                tracing::debug!(start_at, count, total, "Fetched search page");
            }

            SyncProgress::BatchCommitted {
                count,
                committed_so_far,
            } => {
                tracing::debug!(count, committed_so_far, "Committed batch");
            }

            SyncProgress::RetryScheduled {
                pipeline,
                attempt,
                retry_after_ms,
                error,
            } => {
                tracing::warn!(
                    pipeline = %pipeline,
                    attempt,
                    retry_after_ms,
                    error = %error,
                    "Retrying pipeline"
                );
            }

            SyncProgress::Warning { message } => {
                tracing::warn!(message = %message, "Warning");
            }

            _ => {}
        }
    }
}
