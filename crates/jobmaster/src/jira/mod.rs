//! Jira integration: client, API payloads and row conversion.

mod client;
mod convert;
pub mod error;
pub mod types;

pub use client::JiraClient;
pub use convert::{IssueRecord, parse_timestamp};
pub use error::JiraError;
pub use types::{Issue, IssueFields, SearchPage};
