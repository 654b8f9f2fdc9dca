use chrono::{DateTime, Utc};

use crate::model::{Field, FilterSpec, Item};

/// Select the items that satisfy `spec`, preserving their relative order.
///
/// An empty spec selects everything, including items that lack every
/// filterable field.
pub fn apply<'a>(
    items: &'a [Item],
    fields: &[Field],
    spec: &FilterSpec,
    now: DateTime<Utc>,
) -> Vec<&'a Item> {
    if spec.is_empty() {
        return items.iter().collect();
    }
    let term = spec.query.to_lowercase();
    items
        .iter()
        .filter(|item| matches(item, fields, spec, &term, now))
        .collect()
}

fn matches(item: &Item, fields: &[Field], spec: &FilterSpec, term: &str, now: DateTime<Utc>) -> bool {
    if !term.is_empty() && !item.title.to_lowercase().contains(term) {
        return false;
    }
    if !spec.labels.is_empty() && !spec.labels.iter().any(|l| item.labels.contains(l)) {
        return false;
    }
    if !spec.assignees.is_empty()
        && !spec
            .assignees
            .iter()
            .any(|a| item.assignees.iter().any(|b| b.eq_ignore_ascii_case(a)))
    {
        return false;
    }
    if !spec.statuses.is_empty() && !spec.statuses.iter().any(|s| *s == item.status) {
        return false;
    }
    if !spec.iterations.is_empty() && !matches_iteration_filters(item, &spec.iterations, now) {
        return false;
    }
    spec.field_filters
        .iter()
        .all(|(name, wanted)| field_matches(item, fields, name, wanted, now))
}

// ---------------------------------------------------------------------------
// Iteration matching

/// A relative iteration keyword, with or without the leading `@`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeIteration {
    Current,
    Next,
    Previous,
}

impl RelativeIteration {
    pub fn parse(value: &str) -> Option<Self> {
        let v = value.trim();
        let v = v.strip_prefix('@').unwrap_or(v);
        match v.to_lowercase().as_str() {
            "current" => Some(RelativeIteration::Current),
            "next" => Some(RelativeIteration::Next),
            "previous" => Some(RelativeIteration::Previous),
            _ => None,
        }
    }
}

/// True if any of `filters` matches the item's iteration. Items without
/// iteration metadata never match.
pub fn matches_iteration_filters(item: &Item, filters: &[String], now: DateTime<Utc>) -> bool {
    let Some(iteration) = &item.iteration else {
        return false;
    };
    filters.iter().any(|filter| {
        let filter = filter.trim();
        if filter.is_empty() {
            return false;
        }
        match RelativeIteration::parse(filter) {
            Some(rel) => {
                let (Some(start), Some(end)) = (iteration.start_at(), iteration.end_at()) else {
                    return false;
                };
                match rel {
                    RelativeIteration::Current => {
                        iteration.duration_days > 0 && start <= now && now < end
                    }
                    RelativeIteration::Next => start > now,
                    RelativeIteration::Previous => end <= now,
                }
            }
            None => {
                iteration.name.eq_ignore_ascii_case(filter) || iteration.id.eq_ignore_ascii_case(filter)
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Arbitrary field matching

fn field_matches(item: &Item, fields: &[Field], name: &str, wanted: &[String], now: DateTime<Utc>) -> bool {
    if name.trim().eq_ignore_ascii_case("iteration") {
        return matches_iteration_filters(item, wanted, now);
    }
    let Some(values) = resolve_field_values(item, fields, name) else {
        return false;
    };
    wanted.iter().any(|w| {
        let w = w.trim();
        values.iter().any(|v| v.trim().eq_ignore_ascii_case(w))
    })
}

/// Resolve a field name to the item's values for it, trying built-in
/// synonyms, then the exact stored key, then a case-insensitive match
/// against the project's field list. None means the field is unknown.
pub fn resolve_field_values(item: &Item, fields: &[Field], name: &str) -> Option<Vec<String>> {
    let lowered = name.trim().to_lowercase();
    let builtin = match lowered.as_str() {
        "title" => Some(vec![item.title.clone()]),
        "status" => Some(vec![item.status.clone()]),
        "priority" => Some(vec![item.priority.clone()]),
        "milestone" => Some(vec![item.milestone.clone()]),
        "labels" | "label" => Some(item.labels.clone()),
        "assignees" | "assignee" => Some(item.assignees.clone()),
        "iteration" => Some(
            item.iteration
                .iter()
                .flat_map(|it| [it.name.clone(), it.id.clone()])
                .collect(),
        ),
        _ => None,
    };
    if builtin.is_some() {
        return builtin;
    }

    if let Some(values) = item.field_values.get(name) {
        return Some(values.clone());
    }

    let field = fields.iter().find(|f| f.name.eq_ignore_ascii_case(name.trim()))?;
    let stored = compact_key(&field.name);
    item.field_values
        .iter()
        .find(|(key, _)| compact_key(key) == stored)
        .map(|(_, values)| values.clone())
        .or_else(|| Some(Vec::new()))
}

/// Lowercased key with spaces, dashes, and underscores removed, so that
/// `Iteration Name` and `iterationName` compare equal
fn compact_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}
