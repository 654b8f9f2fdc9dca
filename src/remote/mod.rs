//! Access to the remote project board.
//!
//! The TUI only talks to [`ProjectClient`]; [`gh::GhClient`] drives the
//! GitHub CLI and [`stub::StubClient`] serves an in-memory sample project.

pub mod gh;
pub mod stub;

use crate::model::{Item, Project};
use crate::ops::validate::ValidationError;

pub use gh::GhClient;
pub use stub::StubClient;

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("{command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },
    #[error("could not decode {what}: {source}")]
    Decode {
        what: &'static str,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Unsupported(String),
}

/// Remote operations the board needs. Every mutation returns the item as the
/// remote reports it afterwards; fields the remote did not report stay empty.
pub trait ProjectClient: Send + Sync {
    /// Project header, field schema, and up to `limit` items
    fn fetch_project(
        &self,
        project_id: &str,
        owner: &str,
        limit: usize,
    ) -> Result<(Project, Vec<Item>), RemoteError>;

    /// Move an item to another Status option
    fn update_status(
        &self,
        project: &Project,
        item_id: &str,
        field_id: &str,
        option_id: &str,
    ) -> Result<Item, RemoteError>;

    /// Set any single-select field (Priority, Milestone, Labels as a select)
    fn update_field(
        &self,
        project: &Project,
        item_id: &str,
        field_id: &str,
        option_id: &str,
    ) -> Result<Item, RemoteError>;

    /// Replace the label set of the issue behind an item
    fn update_labels(&self, repository: &str, number: u64, labels: &[String]) -> Result<Item, RemoteError>;

    /// Set the free-form milestone text of a board item
    fn update_milestone(&self, project: &Project, item_id: &str, milestone: &str) -> Result<Item, RemoteError>;

    /// Replace the assignees of an issue or pull request
    fn update_assignees(&self, item: &Item, logins: &[String]) -> Result<Item, RemoteError>;

    /// Edit title and body, on the underlying content when its id is known
    fn update_item(
        &self,
        project: &Project,
        item: &Item,
        title: &str,
        description: &str,
    ) -> Result<Item, RemoteError>;

    /// Long-form body of an issue or pull request
    fn fetch_issue_body(&self, repository: &str, number: u64) -> Result<String, RemoteError>;
}
