//! GitHub client for the organisation → repository → workflow → run → job
//! hierarchy.
//!
//! # Module Structure
//!
//! - [`error`] - Error types for GitHub API operations
//! - [`types`] - Response payloads
//! - [`client`] - HTTP client with `Link`-header pagination
//! - `convert` - [`RemoteRecord`](crate::store::RemoteRecord) mappings onto entities
//!
//! ```ignore
//! use jobmaster::github::{GITHUB_API_URL, GitHubClient};
//! use jobmaster::source::CodeHostSource;
//!
//! let client = GitHubClient::new(GITHUB_API_URL, Some(&token))?;
//! for org in client.organisations().await {
//!     println!("{}", org.login);
//! }
//! ```

mod client;
mod convert;
pub mod error;
pub mod types;

pub use client::{GITHUB_API_URL, GitHubClient, LinkPagination, parse_link_header};
pub use error::GitHubError;
pub use types::{Organisation, Repository, Workflow, WorkflowJob, WorkflowRun};
