//! Progress reporting for sync runs.
//!
//! - Interactive mode (TTY): short coloured lines on stderr
//! - Logging mode (non-TTY): structured events through tracing

mod interactive;
mod logging;

use console::Term;
use jobmaster::sync::{ProgressCallback, SyncProgress};

pub use interactive::InteractiveReporter;
pub use logging::LoggingReporter;

/// Progress reporter that handles both interactive and logging modes.
pub enum ProgressReporter {
    Interactive(InteractiveReporter),
    Logging(LoggingReporter),
}

impl ProgressReporter {
    /// Pick the mode from whether stderr is a terminal.
    pub fn new() -> Self {
        if Term::stderr().is_term() {
            Self::Interactive(InteractiveReporter::new())
        } else {
            Self::Logging(LoggingReporter::new())
        }
    }

    pub fn handle(&self, event: SyncProgress) {
        match self {
            Self::Interactive(reporter) => reporter.handle(event),
            Self::Logging(reporter) => reporter.handle(event),
        }
    }

    /// Box a fresh reporter as a library progress callback.
    pub fn callback() -> ProgressCallback {
        let reporter = Self::new();
        Box::new(move |event| reporter.handle(event))
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}
