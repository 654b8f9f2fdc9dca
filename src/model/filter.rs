use indexmap::IndexMap;

/// Structured form of a filter query
///
/// Predicates combine with AND; values within one predicate combine with OR.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSpec {
    /// The query text exactly as typed
    pub raw: String,
    /// Free-text term matched against titles
    pub query: String,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
    pub statuses: Vec<String>,
    /// Literal iteration names/ids or relative keywords (`@current`, `next`, ...)
    pub iterations: Vec<String>,
    /// Arbitrary field predicates keyed by the field name as typed
    pub field_filters: IndexMap<String, Vec<String>>,
    /// Grouping directive (`status`, `assignee`, `iteration`)
    pub group_by: Option<String>,
}

impl FilterSpec {
    /// True when the spec would not filter anything out
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
            && self.labels.is_empty()
            && self.assignees.is_empty()
            && self.statuses.is_empty()
            && self.iterations.is_empty()
            && self.field_filters.is_empty()
    }
}

/// How the grouped table buckets items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Status,
    Assignee,
    Iteration,
}

impl GroupBy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "status" => Some(GroupBy::Status),
            "assignee" | "assignees" => Some(GroupBy::Assignee),
            "iteration" | "sprint" => Some(GroupBy::Iteration),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GroupBy::Status => "status",
            GroupBy::Assignee => "assignee",
            GroupBy::Iteration => "iteration",
        }
    }

    /// Cycle used by the group toggle key: none → status → assignee → iteration → none
    pub fn cycle(current: Option<GroupBy>) -> Option<GroupBy> {
        match current {
            None => Some(GroupBy::Status),
            Some(GroupBy::Status) => Some(GroupBy::Assignee),
            Some(GroupBy::Assignee) => Some(GroupBy::Iteration),
            Some(GroupBy::Iteration) => None,
        }
    }
}
