//! Local store access: the upsert reconciler and read-side helpers.
//!
//! Every synced table is matched on an immutable external key (GitHub's
//! numeric ID, Jira's issue key). [`reconcile`] is the single place that
//! decides between creating a row and merging into an existing one.

mod errors;
mod query;
mod reconcile;

pub use errors::{Result, StoreError};
pub use query::{
    StoreCounts, count_rows, find_issue_by_key, find_organisation_by_github_id,
    find_repository_by_github_id,
};
pub use reconcile::{Reconciled, RemoteRecord, reconcile};
