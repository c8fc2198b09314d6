//! The two sync pipelines and their shared progress and result types.
//!
//! - [`hierarchy`]: GitHub organisation → repository → workflow → run → job
//! - [`issues`]: offset-paged Jira search with batched commits

pub mod hierarchy;
pub mod issues;
mod progress;
mod types;

pub use hierarchy::GitHubSync;
pub use issues::{JiraSync, build_jql};
pub use progress::{ProgressCallback, SyncProgress, emit};
pub use types::{
    DEFAULT_BATCH_SIZE, DEFAULT_LOOKBACK, DEFAULT_PAGE_SIZE, HierarchySyncStats, IssueSyncOptions,
    IssueSyncStats, LevelCounts, SyncError,
};
