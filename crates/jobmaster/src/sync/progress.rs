//! Progress events emitted while pipelines run.

/// Progress events emitted during a sync.
///
/// Hierarchy levels are named `organisation`, `repository`, `workflow`,
/// `workflow run` and `workflow job`; Jira records use `issue`.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum SyncProgress {
    /// A pipeline run is starting.
    PipelineStarted {
        pipeline: String,
    },

    /// A pipeline run finished, successfully or not.
    PipelineCompleted {
        pipeline: String,
        success: bool,
        duration_ms: u64,
    },

    /// The children of one parent were fetched.
    LevelFetched {
        level: &'static str,
        /// Parent scope, e.g. `acme/api` for the workflows of that repository.
        scope: String,
        count: usize,
    },

    /// A record was inserted or updated.
    RecordReconciled {
        level: &'static str,
        key: String,
        created: bool,
    },

    /// A record could not be stored; the rest of the run continues.
    RecordFailed {
        level: &'static str,
        key: String,
        error: String,
    },

    /// A search page was fetched.
    PageFetched {
        start_at: u32,
        count: usize,
        total: u32,
    },

    /// A batch of issue writes was committed.
    BatchCommitted {
        /// Records in this batch.
        count: usize,
        /// Records committed so far in this run.
        committed_so_far: usize,
    },

    /// A failed pipeline run will be retried.
    RetryScheduled {
        pipeline: String,
        attempt: u32,
        retry_after_ms: u64,
        error: String,
    },

    /// Non-fatal warning.
    Warning {
        message: String,
    },
}

/// Callback for progress updates during sync operations.
pub type ProgressCallback = Box<dyn Fn(SyncProgress) + Send + Sync>;

/// Emit a progress event if a callback is provided.
#[inline]
pub fn emit(callback: Option<&ProgressCallback>, event: SyncProgress) {
    if let Some(cb) = callback {
        cb(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn emit_without_callback_is_a_no_op() {
        emit(
            None,
            SyncProgress::Warning {
                message: "ignored".to_string(),
            },
        );
    }

    #[test]
    fn emit_forwards_events_to_callback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: ProgressCallback = Box::new(move |event| {
            sink.lock().unwrap_or_else(|e| e.into_inner()).push(event);
        });

        emit(
            Some(&callback),
            SyncProgress::PageFetched {
                start_at: 0,
                count: 2,
                total: 2,
            },
        );

        let seen = seen.lock().unwrap_or_else(|e| e.into_inner());
        assert!(matches!(
            seen.as_slice(),
            [SyncProgress::PageFetched { count: 2, .. }]
        ));
    }
}
