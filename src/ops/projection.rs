//! Derived arrangements of the item collection.
//!
//! Nothing here is stored: board columns, buckets, and table rows are rebuilt
//! from the filtered (and sorted) item sequence whenever anything changes.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use crate::model::{GroupBy, Item, is_done_status};

/// Name of the synthetic column holding every "done" variant
pub const DONE_COLUMN: &str = "Done";
pub const UNASSIGNED_BUCKET: &str = "Unassigned";
pub const NO_ITERATION_BUCKET: &str = "No Iteration";
pub const UNSCHEDULED_TIMELINE: &str = "Unscheduled";
/// Column order used when the project has no Status options
pub const FALLBACK_STATUS_ORDER: [&str; 4] = ["Todo", "Draft", "In Progress", "In_Review"];

/// Lightweight view of an item for board rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub status: String,
    pub assignee: String,
    pub labels: Vec<String>,
    pub priority: String,
    pub milestone: String,
    pub repository: String,
    pub number: u64,
    pub sub_issue_progress: String,
    pub parent_issue: String,
}

impl Card {
    pub fn from_item(item: &Item) -> Self {
        Card {
            id: item.id.clone(),
            title: item.title.clone(),
            status: item.status.clone(),
            assignee: item.assignees.first().cloned().unwrap_or_default(),
            labels: item.labels.clone(),
            priority: item.effective_priority().to_string(),
            milestone: item.milestone.clone(),
            repository: item.repository.clone(),
            number: item.number,
            sub_issue_progress: item.sub_issue_progress.clone(),
            parent_issue: item.parent_issue.clone(),
        }
    }
}

/// A board column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cards: Vec<Card>,
}

/// A named group of items in the grouped table
#[derive(Debug, Clone)]
pub struct Bucket<'a> {
    pub name: String,
    pub items: Vec<&'a Item>,
}

/// One row of the grouped table: a header or an item
#[derive(Debug, Clone, Copy)]
pub enum TableRow<'a> {
    Header { name: &'a str, count: usize },
    Item(&'a Item),
}

impl<'a> TableRow<'a> {
    pub fn item(&self) -> Option<&'a Item> {
        match *self {
            TableRow::Item(item) => Some(item),
            TableRow::Header { .. } => None,
        }
    }

    pub fn is_header(&self) -> bool {
        matches!(self, TableRow::Header { .. })
    }
}

// ---------------------------------------------------------------------------
// Status ordering (shared by the board and status buckets)

/// Group items by status in board order: canonical options first (or
/// [`FALLBACK_STATUS_ORDER`] when there are none), then unknown statuses
/// lexicographically, then every "done" variant merged into one trailing
/// group. Within a group items are ordered by `position`.
fn status_groups<'a>(items: &[&'a Item], canonical: &[&str]) -> Vec<(String, Vec<&'a Item>)> {
    let canonical = if canonical.is_empty() {
        &FALLBACK_STATUS_ORDER[..]
    } else {
        canonical
    };
    let mut by_status: BTreeMap<&str, Vec<&'a Item>> = BTreeMap::new();
    let mut done: Vec<&'a Item> = Vec::new();
    for &item in items {
        if is_done_status(&item.status) {
            done.push(item);
        } else {
            by_status.entry(item.status.as_str()).or_default().push(item);
        }
    }

    let mut groups: Vec<(String, Vec<&'a Item>)> = Vec::new();
    for status in canonical {
        if let Some(members) = by_status.remove(status) {
            groups.push((status.to_string(), members));
        }
    }
    // BTreeMap iteration is already lexicographic
    for (status, members) in by_status {
        groups.push((status.to_string(), members));
    }
    if !done.is_empty() {
        groups.push((DONE_COLUMN.to_string(), done));
    }

    for (_, members) in &mut groups {
        members.sort_by_key(|item| item.position);
    }
    groups
}

/// Board columns for the filtered sequence
pub fn board_columns(items: &[&Item], canonical: &[&str]) -> Vec<Column> {
    status_groups(items, canonical)
        .into_iter()
        .map(|(name, members)| Column {
            name,
            cards: members.into_iter().map(Card::from_item).collect(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Buckets

/// Group the filtered (and sorted) sequence into named buckets
pub fn buckets<'a>(items: &[&'a Item], group_by: GroupBy, canonical: &[&str]) -> Vec<Bucket<'a>> {
    match group_by {
        GroupBy::Status => status_groups(items, canonical)
            .into_iter()
            .map(|(name, items)| Bucket { name, items })
            .collect(),
        GroupBy::Assignee => named_buckets(items, UNASSIGNED_BUCKET, |item| {
            item.assignees
                .iter()
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect()
        }),
        GroupBy::Iteration => named_buckets(items, NO_ITERATION_BUCKET, |item| {
            let name = item.iteration_name().trim();
            if name.is_empty() {
                Vec::new()
            } else {
                vec![name.to_string()]
            }
        }),
    }
}

/// Bucket by the names `keys` returns; items with no names fall into the
/// trailing catch-all bucket. An item appears once per distinct name.
fn named_buckets<'a>(
    items: &[&'a Item],
    catch_all: &str,
    keys: impl Fn(&Item) -> Vec<String>,
) -> Vec<Bucket<'a>> {
    let mut named: BTreeMap<String, Vec<&'a Item>> = BTreeMap::new();
    let mut rest: Vec<&'a Item> = Vec::new();
    for &item in items {
        let mut names = keys(item);
        names.dedup();
        if names.is_empty() {
            rest.push(item);
            continue;
        }
        for name in names {
            let slot = named.entry(name).or_default();
            if !slot.iter().any(|i| std::ptr::eq(*i, item)) {
                slot.push(item);
            }
        }
    }

    let mut out: Vec<Bucket<'a>> = named
        .into_iter()
        .map(|(name, items)| Bucket { name, items })
        .collect();
    if !rest.is_empty() {
        out.push(Bucket {
            name: catch_all.to_string(),
            items: rest,
        });
    }
    out
}

// ---------------------------------------------------------------------------
// Roadmap

/// Items sharing one iteration on the roadmap
#[derive(Debug, Clone)]
pub struct Timeline<'a> {
    /// Iteration id, or its name when the id is missing; empty when unscheduled
    pub id: String,
    pub name: String,
    pub start: Option<NaiveDate>,
    /// Last day of the iteration
    pub end: Option<NaiveDate>,
    pub items: Vec<&'a Item>,
}

impl Timeline<'_> {
    /// Mean completion of the timeline's items, 0-100
    pub fn progress(&self) -> u8 {
        if self.items.is_empty() {
            return 0;
        }
        let sum: usize = self.items.iter().map(|item| status_progress(&item.status) as usize).sum();
        (sum / self.items.len()) as u8
    }
}

/// Rough completion implied by a status name
pub fn status_progress(status: &str) -> u8 {
    if is_done_status(status) {
        return 100;
    }
    match status.trim().to_lowercase().as_str() {
        "completed" | "closed" => 100,
        "review" | "in review" | "in_review" => 80,
        "in progress" | "doing" => 60,
        "todo" | "backlog" | "open" | "blocked" | "draft" => 20,
        _ => 40,
    }
}

/// Roadmap sections for the filtered sequence: iterations ordered by start
/// date (undated ones after, by name), then one trailing section for items
/// with no iteration. Items keep their incoming order within a section.
pub fn roadmap<'a>(items: &[&'a Item]) -> Vec<Timeline<'a>> {
    let mut timelines: Vec<Timeline<'a>> = Vec::new();
    let mut unscheduled: Vec<&'a Item> = Vec::new();
    for &item in items {
        let Some(iteration) = &item.iteration else {
            unscheduled.push(item);
            continue;
        };
        let id = if iteration.id.is_empty() {
            iteration.name.trim()
        } else {
            iteration.id.as_str()
        };
        if id.is_empty() {
            unscheduled.push(item);
            continue;
        }
        match timelines.iter_mut().find(|t| t.id == id) {
            Some(timeline) => timeline.items.push(item),
            None => timelines.push(Timeline {
                id: id.to_string(),
                name: if iteration.name.trim().is_empty() {
                    id.to_string()
                } else {
                    iteration.name.clone()
                },
                start: iteration.start,
                end: iteration
                    .start
                    .map(|s| s + Duration::days(i64::from(iteration.duration_days.max(1)) - 1)),
                items: vec![item],
            }),
        }
    }

    timelines.sort_by(|a, b| match (a.start, b.start) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.name.cmp(&b.name)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.name.cmp(&b.name),
    });
    if !unscheduled.is_empty() {
        timelines.push(Timeline {
            id: String::new(),
            name: UNSCHEDULED_TIMELINE.to_string(),
            start: None,
            end: None,
            items: unscheduled,
        });
    }
    timelines
}

/// Items in roadmap reading order
pub fn roadmap_order<'a>(timelines: &[Timeline<'a>]) -> Vec<&'a Item> {
    timelines.iter().flat_map(|t| t.items.iter().copied()).collect()
}

/// Flatten buckets into header + item rows
pub fn flatten<'a>(buckets: &'a [Bucket<'a>]) -> Vec<TableRow<'a>> {
    let mut rows = Vec::new();
    for bucket in buckets {
        rows.push(TableRow::Header {
            name: &bucket.name,
            count: bucket.items.len(),
        });
        rows.extend(bucket.items.iter().map(|item| TableRow::Item(*item)));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Iteration;
    use pretty_assertions::assert_eq;

    fn item(id: &str, status: &str, position: i64) -> Item {
        let mut it = Item::new(id, id, status);
        it.position = position;
        it
    }

    fn scheduled(id: &str, iteration: &str, start: Option<NaiveDate>) -> Item {
        let mut it = item(id, "Todo", 0);
        it.iteration = Some(Iteration {
            id: format!("it-{}", iteration),
            name: iteration.to_string(),
            start,
            duration_days: 14,
        });
        it
    }

    #[test]
    fn roadmap_orders_iterations_by_start_then_unscheduled() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 5, d);
        let items = vec![
            item("1", "Todo", 0),
            scheduled("2", "Sprint 9", day(20)),
            scheduled("3", "Sprint 8", day(6)),
            scheduled("4", "Someday", None),
            scheduled("5", "Sprint 9", day(20)),
        ];
        let refs: Vec<&Item> = items.iter().collect();
        let timelines = roadmap(&refs);
        let names: Vec<&str> = timelines.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Sprint 8", "Sprint 9", "Someday", UNSCHEDULED_TIMELINE]);
        assert_eq!(timelines[0].end, day(19));

        let order: Vec<&str> = roadmap_order(&timelines).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(order, vec!["3", "2", "5", "4", "1"]);
    }

    #[test]
    fn timeline_progress_averages_statuses() {
        let mut done = scheduled("1", "S", None);
        done.status = "Done".into();
        let mut review = scheduled("2", "S", None);
        review.status = "Review".into();
        let refs: Vec<&Item> = vec![&done, &review];
        let timelines = roadmap(&refs);
        assert_eq!(timelines[0].progress(), 90);
        assert_eq!(status_progress("In Progress"), 60);
        assert_eq!(status_progress("Backlog"), 20);
        assert_eq!(status_progress("Whatever"), 40);
    }

    fn names(columns: &[Column]) -> Vec<&str> {
        columns.iter().map(|c| c.name.as_str()).collect()
    }

    fn card_ids(column: &Column) -> Vec<&str> {
        column.cards.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn canonical_order_then_unknown_then_done() {
        let items = vec![
            item("1", "Zeta", 0),
            item("2", "done", 0),
            item("3", "In Progress", 0),
            item("4", "Alpha", 0),
            item("5", "Todo", 0),
        ];
        let refs: Vec<&Item> = items.iter().collect();
        let cols = board_columns(&refs, &["Todo", "Done", "In Progress", "Review"]);
        assert_eq!(names(&cols), vec!["Todo", "In Progress", "Alpha", "Zeta", "Done"]);
    }

    #[test]
    fn without_status_options_fallback_order_applies() {
        let items = vec![
            item("1", "Blocked", 0),
            item("2", "In_Review", 0),
            item("3", "In Progress", 0),
            item("4", "Draft", 0),
            item("5", "Todo", 0),
            item("6", "Done", 0),
        ];
        let refs: Vec<&Item> = items.iter().collect();
        let cols = board_columns(&refs, &[]);
        assert_eq!(
            names(&cols),
            vec!["Todo", "Draft", "In Progress", "In_Review", "Blocked", "Done"]
        );
    }

    #[test]
    fn canonical_columns_without_items_are_omitted() {
        let items = vec![item("1", "Review", 0)];
        let refs: Vec<&Item> = items.iter().collect();
        let cols = board_columns(&refs, &["Todo", "Review"]);
        assert_eq!(names(&cols), vec!["Review"]);
    }

    #[test]
    fn done_variants_merge_into_one_last_column() {
        let items = vec![
            item("1", " Done ", 2),
            item("2", "Blocked", 0),
            item("3", "DONE", 1),
        ];
        let refs: Vec<&Item> = items.iter().collect();
        let cols = board_columns(&refs, &[]);
        assert_eq!(names(&cols), vec!["Blocked", "Done"]);
        assert_eq!(card_ids(&cols[1]), vec!["3", "1"]);
    }

    #[test]
    fn cards_ordered_by_position_within_status() {
        let items = vec![item("a", "Todo", 3), item("b", "Todo", 1), item("c", "Todo", 2)];
        let refs: Vec<&Item> = items.iter().collect();
        let cols = board_columns(&refs, &["Todo"]);
        assert_eq!(card_ids(&cols[0]), vec!["b", "c", "a"]);
    }

    #[test]
    fn no_item_lost_or_duplicated_on_board() {
        let items: Vec<Item> = (0..20)
            .map(|i| item(&i.to_string(), ["Todo", "x", "done", "Done", "y"][i % 5], i as i64))
            .collect();
        let refs: Vec<&Item> = items.iter().collect();
        let cols = board_columns(&refs, &["Todo"]);
        let mut seen: Vec<String> = cols.iter().flat_map(|c| c.cards.iter().map(|k| k.id.clone())).collect();
        seen.sort();
        let mut expected: Vec<String> = items.iter().map(|i| i.id.clone()).collect();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn assignee_buckets_duplicate_multi_assigned_items() {
        let mut a = item("a", "Todo", 0);
        a.assignees = vec!["zoe".into(), "amy".into()];
        let b = item("b", "Todo", 0);
        let mut c = item("c", "Todo", 0);
        c.assignees = vec!["  ".into()];
        let mut d = item("d", "Todo", 0);
        d.assignees = vec!["amy".into()];
        let items = vec![a, b, c, d];
        let refs: Vec<&Item> = items.iter().collect();

        let out = buckets(&refs, GroupBy::Assignee, &[]);
        let summary: Vec<(String, Vec<String>)> = out
            .iter()
            .map(|b| (b.name.clone(), b.items.iter().map(|i| i.id.clone()).collect()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("amy".to_string(), vec!["a".to_string(), "d".to_string()]),
                ("zoe".to_string(), vec!["a".to_string()]),
                ("Unassigned".to_string(), vec!["b".to_string(), "c".to_string()]),
            ]
        );
    }

    #[test]
    fn iteration_buckets_trail_with_no_iteration() {
        let mut a = item("a", "Todo", 0);
        a.iteration = Some(Iteration { id: "2".into(), name: "Sprint 2".into(), ..Default::default() });
        let b = item("b", "Todo", 0);
        let mut c = item("c", "Todo", 0);
        c.iteration = Some(Iteration { id: "1".into(), name: "Sprint 1".into(), ..Default::default() });
        let items = vec![a, b, c];
        let refs: Vec<&Item> = items.iter().collect();
        let out = buckets(&refs, GroupBy::Iteration, &[]);
        let names: Vec<&str> = out.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Sprint 1", "Sprint 2", "No Iteration"]);
    }

    #[test]
    fn status_buckets_match_board_order() {
        let items = vec![item("1", "Done", 0), item("2", "Later", 0), item("3", "Todo", 0)];
        let refs: Vec<&Item> = items.iter().collect();
        let out = buckets(&refs, GroupBy::Status, &["Todo"]);
        let names: Vec<&str> = out.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Todo", "Later", "Done"]);
    }

    #[test]
    fn flatten_interleaves_headers() {
        let items = vec![item("1", "A", 0), item("2", "B", 0), item("3", "B", 1)];
        let refs: Vec<&Item> = items.iter().collect();
        let out = buckets(&refs, GroupBy::Status, &[]);
        let rows = flatten(&out);
        let shape: Vec<String> = rows
            .iter()
            .map(|r| match r {
                TableRow::Header { name, count } => format!("# {} ({})", name, count),
                TableRow::Item(item) => item.id.clone(),
            })
            .collect();
        assert_eq!(shape, vec!["# A (1)", "1", "# B (2)", "2", "3"]);
    }
}
