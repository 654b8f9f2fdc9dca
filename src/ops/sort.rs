use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::model::Item;

/// A sortable table field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    Status,
    Repository,
    Labels,
    Milestone,
    SubIssues,
    Priority,
    Assignees,
    Number,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Key pressed in sort mode
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            't' => Some(SortField::Title),
            'S' => Some(SortField::Status),
            'r' => Some(SortField::Repository),
            'L' => Some(SortField::Labels),
            'm' => Some(SortField::Milestone),
            's' => Some(SortField::SubIssues),
            'p' => Some(SortField::Priority),
            'a' => Some(SortField::Assignees),
            'n' => Some(SortField::Number),
            'c' => Some(SortField::CreatedAt),
            'u' => Some(SortField::UpdatedAt),
            _ => None,
        }
    }

    /// Field by name, as given on the command line (`priority`, `updated`, ...)
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "title" => Some(SortField::Title),
            "status" => Some(SortField::Status),
            "repo" | "repository" => Some(SortField::Repository),
            "label" | "labels" => Some(SortField::Labels),
            "milestone" => Some(SortField::Milestone),
            "sub-issues" | "sub_issues" | "subissues" => Some(SortField::SubIssues),
            "priority" => Some(SortField::Priority),
            "assignee" | "assignees" => Some(SortField::Assignees),
            "number" => Some(SortField::Number),
            "created" | "created_at" => Some(SortField::CreatedAt),
            "updated" | "updated_at" => Some(SortField::UpdatedAt),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortField::Title => "Title",
            SortField::Status => "Status",
            SortField::Repository => "Repository",
            SortField::Labels => "Labels",
            SortField::Milestone => "Milestone",
            SortField::SubIssues => "Sub-issues",
            SortField::Priority => "Priority",
            SortField::Assignees => "Assignees",
            SortField::Number => "Number",
            SortField::CreatedAt => "Created",
            SortField::UpdatedAt => "Updated",
        }
    }
}

/// Active table sort; `field == None` leaves the order untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: Option<SortField>,
    pub ascending: bool,
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey {
            field: None,
            ascending: true,
        }
    }
}

impl SortKey {
    /// Same field flips direction; a different field starts ascending
    pub fn toggle(self, field: SortField) -> SortKey {
        if self.field == Some(field) {
            SortKey {
                field: Some(field),
                ascending: !self.ascending,
            }
        } else {
            SortKey {
                field: Some(field),
                ascending: true,
            }
        }
    }

    /// Short description like `Title ↑`
    pub fn describe(&self) -> Option<String> {
        self.field
            .map(|f| format!("{} {}", f.label(), if self.ascending { "↑" } else { "↓" }))
    }
}

/// Stable sort of an already filtered sequence
pub fn apply(items: &mut [&Item], key: SortKey) {
    let Some(field) = key.field else {
        return;
    };
    items.sort_by(|a, b| compare(a, b, field, key.ascending));
}

/// Numeric rank of a priority value: high=3, medium=2, low=1, else 0
pub fn priority_rank(priority: &str) -> u8 {
    match priority.trim().to_lowercase().as_str() {
        "high" => 3,
        "medium" => 2,
        "low" => 1,
        _ => 0,
    }
}

/// Completed share of a `done/total` progress string; anything else,
/// including a zero total, counts as 0
pub fn progress_ratio(progress: &str) -> f64 {
    let Some((done, total)) = progress.split_once('/') else {
        return 0.0;
    };
    match (done.trim().parse::<f64>(), total.trim().parse::<f64>()) {
        (Ok(done), Ok(total)) if total != 0.0 => done / total,
        _ => 0.0,
    }
}

fn compare(a: &Item, b: &Item, field: SortField, ascending: bool) -> Ordering {
    let directed = |ord: Ordering| if ascending { ord } else { ord.reverse() };
    match field {
        SortField::Title => directed(a.title.cmp(&b.title)),
        SortField::Status => directed(a.status.cmp(&b.status)),
        SortField::Repository => directed(a.repository.cmp(&b.repository)),
        SortField::Milestone => directed(a.milestone.cmp(&b.milestone)),
        SortField::SubIssues => directed(
            progress_ratio(&a.sub_issue_progress).total_cmp(&progress_ratio(&b.sub_issue_progress)),
        ),
        SortField::Labels => directed(a.labels.join(",").cmp(&b.labels.join(","))),
        SortField::Assignees => directed(a.assignees.join(",").cmp(&b.assignees.join(","))),
        SortField::Priority => directed(priority_rank(&a.priority).cmp(&priority_rank(&b.priority))),
        SortField::Number => directed(a.number.cmp(&b.number)),
        SortField::CreatedAt => compare_timestamps(a.created_at, b.created_at, ascending),
        SortField::UpdatedAt => compare_timestamps(a.updated_at, b.updated_at, ascending),
    }
}

/// Missing timestamps always sort first, whichever the direction
fn compare_timestamps(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>, ascending: bool) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => {
            if ascending {
                x.cmp(&y)
            } else {
                y.cmp(&x)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn item(id: &str, title: &str, priority: &str) -> Item {
        let mut it = Item::new(id, title, "Todo");
        it.priority = priority.into();
        it
    }

    fn ids(items: &[&Item]) -> Vec<String> {
        items.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn empty_key_is_noop() {
        let items = vec![item("b", "B", ""), item("a", "A", "")];
        let mut refs: Vec<&Item> = items.iter().collect();
        apply(&mut refs, SortKey::default());
        assert_eq!(ids(&refs), vec!["b", "a"]);
    }

    #[test]
    fn priority_rank_order() {
        let items = vec![
            item("1", "x", "low"),
            item("2", "x", "High"),
            item("3", "x", "urgent"),
            item("4", "x", "medium"),
        ];
        let mut refs: Vec<&Item> = items.iter().collect();
        apply(&mut refs, SortKey { field: Some(SortField::Priority), ascending: false });
        assert_eq!(ids(&refs), vec!["2", "4", "1", "3"]);
    }

    #[test]
    fn toggle_twice_reverses_with_stable_ties() {
        let items = vec![
            item("1", "b", ""),
            item("2", "a", ""),
            item("3", "b", ""),
            item("4", "c", ""),
            item("5", "a", ""),
        ];
        let key = SortKey::default().toggle(SortField::Title);
        assert!(key.ascending);
        let mut first: Vec<&Item> = items.iter().collect();
        apply(&mut first, key);
        assert_eq!(ids(&first), vec!["2", "5", "1", "3", "4"]);

        let key = key.toggle(SortField::Title);
        assert!(!key.ascending);
        let mut second: Vec<&Item> = items.iter().collect();
        apply(&mut second, key);
        // groups reversed, members of each tie group keep source order
        assert_eq!(ids(&second), vec!["4", "1", "3", "2", "5"]);
    }

    #[test]
    fn different_field_resets_to_ascending() {
        let key = SortKey::default()
            .toggle(SortField::Title)
            .toggle(SortField::Title)
            .toggle(SortField::Number);
        assert_eq!(key, SortKey { field: Some(SortField::Number), ascending: true });
    }

    #[test]
    fn missing_timestamps_first_in_both_directions() {
        let mut a = item("a", "", "");
        a.created_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let b = item("b", "", "");
        let mut c = item("c", "", "");
        c.created_at = Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        let items = vec![a, b, c];

        let mut asc: Vec<&Item> = items.iter().collect();
        apply(&mut asc, SortKey { field: Some(SortField::CreatedAt), ascending: true });
        assert_eq!(ids(&asc), vec!["b", "a", "c"]);

        let mut desc: Vec<&Item> = items.iter().collect();
        apply(&mut desc, SortKey { field: Some(SortField::CreatedAt), ascending: false });
        assert_eq!(ids(&desc), vec!["b", "c", "a"]);
    }

    #[test]
    fn lists_compare_by_joined_form() {
        let mut a = item("a", "", "");
        a.labels = vec!["bug".into(), "ui".into()];
        let mut b = item("b", "", "");
        b.labels = vec!["bug".into()];
        let items = vec![a, b];
        let mut refs: Vec<&Item> = items.iter().collect();
        apply(&mut refs, SortKey { field: Some(SortField::Labels), ascending: true });
        assert_eq!(ids(&refs), vec!["b", "a"]);
    }

    #[test]
    fn numbers_compare_numerically() {
        let mut a = item("a", "", "");
        a.number = 10;
        let mut b = item("b", "", "");
        b.number = 9;
        let items = vec![a, b];
        let mut refs: Vec<&Item> = items.iter().collect();
        apply(&mut refs, SortKey { field: Some(SortField::Number), ascending: true });
        assert_eq!(ids(&refs), vec!["b", "a"]);
    }

    #[test]
    fn describe_shows_direction() {
        let key = SortKey::default().toggle(SortField::Priority);
        assert_eq!(key.describe().as_deref(), Some("Priority ↑"));
        assert_eq!(key.toggle(SortField::Priority).describe().as_deref(), Some("Priority ↓"));
        assert_eq!(SortKey::default().describe(), None);
    }

    #[test]
    fn sort_keys() {
        assert_eq!(SortField::from_key('S'), Some(SortField::Status));
        assert_eq!(SortField::from_key('s'), Some(SortField::SubIssues));
        assert_eq!(SortField::from_key('x'), None);
        assert_eq!(SortField::from_key('u'), Some(SortField::UpdatedAt));
    }

    #[test]
    fn sort_names() {
        assert_eq!(SortField::parse("Priority"), Some(SortField::Priority));
        assert_eq!(SortField::parse("repo"), Some(SortField::Repository));
        assert_eq!(SortField::parse("sub-issues"), Some(SortField::SubIssues));
        assert_eq!(SortField::parse("size"), None);
    }

    #[test]
    fn sub_issues_compare_by_completed_share() {
        let progress = [("a", "1/4"), ("b", "3/3"), ("c", ""), ("d", "2/0"), ("e", "1/2"), ("f", "5")];
        let items: Vec<Item> = progress
            .iter()
            .map(|(id, p)| {
                let mut it = item(id, "", "");
                it.sub_issue_progress = p.to_string();
                it
            })
            .collect();
        let mut refs: Vec<&Item> = items.iter().collect();
        apply(&mut refs, SortKey { field: Some(SortField::SubIssues), ascending: true });
        assert_eq!(ids(&refs), vec!["c", "d", "f", "a", "e", "b"]);

        let mut refs: Vec<&Item> = items.iter().collect();
        apply(&mut refs, SortKey { field: Some(SortField::SubIssues), ascending: false });
        assert_eq!(ids(&refs), vec!["b", "e", "a", "c", "d", "f"]);
    }

    #[test]
    fn progress_ratio_parsing() {
        assert_eq!(progress_ratio("3/4"), 0.75);
        assert_eq!(progress_ratio(" 1 / 2 "), 0.5);
        assert_eq!(progress_ratio("2/0"), 0.0);
        assert_eq!(progress_ratio("n/a"), 0.0);
        assert_eq!(progress_ratio("7"), 0.0);
    }
}
