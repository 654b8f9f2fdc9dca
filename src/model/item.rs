use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Placeholder status assigned when a payload carries no status at all
pub const UNKNOWN_STATUS: &str = "Unknown";

/// What kind of content a board item wraps
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ItemKind {
    Issue,
    PullRequest,
    DraftIssue,
    #[default]
    Unknown,
    Other(String),
}

impl ItemKind {
    /// Map the remote content type name onto a kind
    pub fn from_type_name(name: &str) -> Self {
        match name.trim() {
            "" => ItemKind::Unknown,
            "Issue" | "ISSUE" => ItemKind::Issue,
            "PullRequest" | "PULL_REQUEST" => ItemKind::PullRequest,
            "DraftIssue" | "DRAFT_ISSUE" => ItemKind::DraftIssue,
            other => ItemKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ItemKind::Issue => "Issue",
            ItemKind::PullRequest => "PullRequest",
            ItemKind::DraftIssue => "DraftIssue",
            ItemKind::Unknown => "",
            ItemKind::Other(name) => name,
        }
    }

    /// Only real trackable work (issues and pull requests) can carry
    /// assignees and labels
    pub fn is_assignable(&self) -> bool {
        matches!(self, ItemKind::Issue | ItemKind::PullRequest)
    }
}

/// Iteration (sprint) metadata attached to an item
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Iteration {
    pub id: String,
    pub name: String,
    pub start: Option<NaiveDate>,
    pub duration_days: u32,
}

impl Iteration {
    /// Start of the iteration as a UTC instant (midnight)
    pub fn start_at(&self) -> Option<DateTime<Utc>> {
        self.start
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    /// Exclusive end of the iteration, if it has a start
    pub fn end_at(&self) -> Option<DateTime<Utc>> {
        self.start_at()
            .map(|s| s + chrono::Duration::days(i64::from(self.duration_days)))
    }
}

/// A single trackable entry on the project board
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Item {
    /// Board-item identity; never changes once assigned
    pub id: String,
    /// Identity of the underlying issue / pull request / draft
    #[serde(default)]
    pub content_id: String,
    #[serde(default)]
    pub kind: ItemKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: String,
    #[serde(default)]
    pub repository: String,
    #[serde(default)]
    pub number: u64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub assignees: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub milestone: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub iteration: Option<Iteration>,
    #[serde(default)]
    pub sub_issue_progress: String,
    #[serde(default)]
    pub parent_issue: String,
    /// Raw values of every project field, keyed by field name as stored remotely
    #[serde(default)]
    pub field_values: IndexMap<String, Vec<String>>,
    /// Manual ordering hint within a status column
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Item {
    /// Convenience constructor used by the sample provider and tests
    pub fn new(id: impl Into<String>, title: impl Into<String>, status: impl Into<String>) -> Self {
        Item {
            id: id.into(),
            title: title.into(),
            status: status.into(),
            ..Default::default()
        }
    }

    /// Whether the item has a concrete repository locator
    pub fn locator(&self) -> Option<(&str, u64)> {
        if self.repository.is_empty() || self.number == 0 {
            None
        } else {
            Some((self.repository.as_str(), self.number))
        }
    }

    /// Display reference like `owner/repo#12`
    pub fn reference(&self) -> String {
        match self.locator() {
            Some((repo, number)) => format!("{}#{}", repo, number),
            None => String::new(),
        }
    }

    pub fn iteration_name(&self) -> &str {
        self.iteration.as_ref().map(|it| it.name.as_str()).unwrap_or("")
    }

    /// Record a single-select choice under `field`. The built-in attribute
    /// the field backs (priority, milestone, labels) is set when still empty.
    pub fn fill_select_value(&mut self, field: &str, value: &str) {
        self.field_values
            .entry(field.to_string())
            .or_insert_with(|| vec![value.to_string()]);
        match field.trim().to_lowercase().as_str() {
            "priority" if self.priority.is_empty() => self.priority = value.to_string(),
            "milestone" if self.milestone.is_empty() => self.milestone = value.to_string(),
            "labels" | "label" if self.labels.is_empty() => self.labels = vec![value.to_string()],
            _ => {}
        }
    }

    /// Priority, falling back to a priority-looking label
    pub fn effective_priority(&self) -> &str {
        if !self.priority.is_empty() {
            return &self.priority;
        }
        self.labels
            .iter()
            .find(|l| matches!(l.to_lowercase().as_str(), "high" | "medium" | "low"))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Insert `value` unless it is empty or already present, preserving order
pub fn push_unique(list: &mut Vec<String>, value: &str) {
    if value.is_empty() || list.iter().any(|v| v == value) {
        return;
    }
    list.push(value.to_string());
}

/// Merge `src` into `dst` keeping first-seen order and dropping duplicates
pub fn merge_unique(dst: &mut Vec<String>, src: impl IntoIterator<Item = String>) {
    for value in src {
        push_unique(dst, &value);
    }
}

/// Whether a status string is a variant of "done"
pub fn is_done_status(status: &str) -> bool {
    status.trim().eq_ignore_ascii_case("done")
}
