use console::{Term, style};
use jobmaster::sync::SyncProgress;

/// Compact, coloured status lines on stderr for terminal sessions.
#[derive(Debug)]
pub struct InteractiveReporter {
    term: Term,
}

impl InteractiveReporter {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    pub fn handle(&self, event: SyncProgress) {
        let line = match event {
            SyncProgress::PipelineStarted { pipeline } => {
                Some(format!("{} {}", style("▶").cyan(), style(pipeline).bold()))
            }
            SyncProgress::PipelineCompleted {
                pipeline,
                success,
                duration_ms,
            } => {
                let mark = if success {
                    style("✓").green()
                } else {
                    style("✗").red()
                };
                Some(format!(
                    "{mark} {} in {:.1}s",
                    style(pipeline).bold(),
                    duration_ms as f64 / 1000.0
                ))
            }
            SyncProgress::LevelFetched {
                level,
                scope,
                count,
            } if count > 0 => Some(format!("  {count} {level}(s) in {}", style(scope).dim())),
            SyncProgress::RecordFailed { level, key, error } => Some(format!(
                "  {} {level} {key}: {error}",
                style("!").yellow()
            )),
            SyncProgress::PageFetched {
                start_at,
                count,
                total,
            } if count > 0 => Some(format!(
                "  issues {}-{} of {total}",
                start_at + 1,
                start_at as usize + count
            )),
            SyncProgress::BatchCommitted {
                committed_so_far, ..
            } => Some(format!("  {} {committed_so_far} issues saved", style("·").dim())),
            SyncProgress::RetryScheduled {
                pipeline,
                attempt,
                retry_after_ms,
                error,
            } => Some(format!(
                "{} {pipeline} attempt {attempt} failed ({error}), retrying in {}s",
                style("↻").yellow(),
                retry_after_ms / 1000
            )),
            SyncProgress::Warning { message } => {
                Some(format!("{} {message}", style("warning:").yellow()))
            }
            _ => None,
        };

        if let Some(line) = line {
            let _ = self.term.write_line(&line);
        }
    }
}

impl Default for InteractiveReporter {
    fn default() -> Self {
        Self::new()
    }
}
