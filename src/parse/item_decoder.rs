//! Tolerant decoding of remote project payloads.
//!
//! The project API hands back loosely shaped JSON: the same logical field can
//! arrive as a plain string, a `{name}` object, a single-select option, or a
//! `{text}` wrapper, depending on the field type and API version. Everything
//! here walks an untyped [`serde_json::Value`] tree and falls back through
//! those shapes explicitly. Missing or oddly typed fields default instead of
//! failing the whole decode.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

use crate::model::{
    Field, FieldOption, Item, ItemKind, Iteration, Project, UNKNOWN_STATUS, merge_unique,
};

// ---------------------------------------------------------------------------
// Entry points

/// Decode an item list payload: either a bare array or `{ "items": [...] }`
pub fn decode_item_list(text: &str) -> Result<Vec<Item>, serde_json::Error> {
    let root: Value = serde_json::from_str(text)?;
    let entries: &[Value] = match &root {
        Value::Array(list) => list.as_slice(),
        Value::Object(map) => match map.get("items") {
            Some(Value::Array(list)) => list.as_slice(),
            _ => &[],
        },
        _ => &[],
    };
    Ok(entries.iter().filter_map(decode_item).collect())
}

/// Decode a single project item. Returns None only when `value` is not an object.
pub fn decode_item(value: &Value) -> Option<Item> {
    let m = value.as_object()?;
    let mut item = Item {
        id: string_at(m, "id").unwrap_or_default().to_string(),
        title: string_at(m, "title").unwrap_or_default().to_string(),
        ..Default::default()
    };

    if let Some(content) = m.get("content").and_then(Value::as_object) {
        apply_content(&mut item, content);
    }
    if item.description.is_empty()
        && let Some(body) = string_at(m, "body")
    {
        item.description = body.to_string();
    }
    if item.repository.is_empty() {
        item.repository = repository_value(m.get("repository"));
    }
    if item.milestone.is_empty() {
        item.milestone = milestone_value(m.get("milestone"));
    }
    if let Some(status) = m.get("status").and_then(named_value) {
        item.status = status;
    }

    if let Some(values) = m.get("fieldValues").and_then(field_value_list) {
        for entry in values.iter().filter_map(Value::as_object) {
            apply_field_value(&mut item, entry);
        }
    }

    if item.parent_issue.is_empty() {
        item.parent_issue = content_or_root(m, &["parent", "parentIssue"])
            .map(parent_issue_value)
            .unwrap_or_default();
    }
    if item.sub_issue_progress.is_empty() {
        item.sub_issue_progress = content_or_root(m, &["subIssues", "subIssue"])
            .map(sub_issue_count)
            .unwrap_or_default();
    }

    if let Some(priority) = m.get("priority").and_then(named_value) {
        item.priority = priority;
    }
    merge_unique(&mut item.assignees, logins(m.get("assignees")));
    merge_unique(&mut item.labels, label_names(m.get("labels")));

    if item.iteration.is_none() {
        item.iteration = m
            .values()
            .filter_map(Value::as_object)
            .find_map(iteration_metadata);
    }

    // `gh project item-list` flattens custom fields onto the item as
    // lower-camel keys; keep them searchable by name.
    for (key, val) in m {
        if is_known_key(key) || item.field_values.contains_key(key.as_str()) {
            continue;
        }
        let collected = scalar_values(val);
        if !collected.is_empty() {
            item.field_values.insert(key.clone(), collected);
        }
    }

    item.updated_at = timestamp_at(m, "updatedAt");
    item.created_at = timestamp_at(m, "createdAt").or_else(|| {
        m.get("content")
            .and_then(Value::as_object)
            .and_then(|c| timestamp_at(c, "createdAt"))
    });
    if let Some(pos) = m.get("position").and_then(Value::as_i64) {
        item.position = pos;
    }

    if item.status.trim().is_empty() {
        item.status = UNKNOWN_STATUS.to_string();
    }
    Some(item)
}

/// Decode the header of `gh project view --format json`
pub fn decode_project_view(text: &str, requested_id: &str) -> Result<Project, serde_json::Error> {
    let root: Value = serde_json::from_str(text)?;
    let mut project = Project {
        id: requested_id.to_string(),
        ..Default::default()
    };
    if let Some(m) = root.as_object() {
        project.node_id = string_at(m, "id").unwrap_or_default().to_string();
        project.name = string_at(m, "title").unwrap_or_default().to_string();
        project.owner = m
            .get("owner")
            .and_then(Value::as_object)
            .and_then(|o| string_at(o, "login"))
            .unwrap_or_default()
            .to_string();
    }
    Ok(project)
}

/// Decode `gh project field-list --format json`: `{ "fields": [...] }` or a bare array
pub fn decode_fields(text: &str) -> Result<Vec<Field>, serde_json::Error> {
    let root: Value = serde_json::from_str(text)?;
    let entries: &[Value] = match &root {
        Value::Array(list) => list.as_slice(),
        Value::Object(map) => match map.get("fields") {
            Some(Value::Array(list)) => list.as_slice(),
            _ => &[],
        },
        _ => &[],
    };
    let fields = entries
        .iter()
        .filter_map(Value::as_object)
        .map(|f| Field {
            id: string_at(f, "id").unwrap_or_default().to_string(),
            name: string_at(f, "name").unwrap_or_default().to_string(),
            options: f
                .get("options")
                .and_then(Value::as_array)
                .map(|opts| {
                    opts.iter()
                        .filter_map(Value::as_object)
                        .map(|o| FieldOption {
                            id: string_at(o, "id").unwrap_or_default().to_string(),
                            name: string_at(o, "name").unwrap_or_default().to_string(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        })
        .filter(|f| !f.name.is_empty())
        .collect();
    Ok(fields)
}

/// Decode a REST issue payload (`{title, body, labels, assignees, ...}`) into a
/// partial item carrying only what the payload states.
pub fn decode_issue(value: &Value) -> Item {
    let mut item = Item::default();
    let Some(m) = value.as_object() else {
        return item;
    };
    item.content_id = string_at(m, "node_id").unwrap_or_default().to_string();
    item.title = string_at(m, "title").unwrap_or_default().to_string();
    item.description = string_at(m, "body").unwrap_or_default().to_string();
    item.url = string_at(m, "html_url")
        .or_else(|| string_at(m, "url"))
        .unwrap_or_default()
        .to_string();
    item.number = number_at(m, "number").unwrap_or(0);
    item.milestone = milestone_value(m.get("milestone"));
    merge_unique(&mut item.assignees, logins(m.get("assignees")));
    merge_unique(&mut item.labels, label_names(m.get("labels")));
    item
}

// ---------------------------------------------------------------------------
// Shape helpers

fn apply_content(item: &mut Item, content: &Map<String, Value>) {
    if let Some(id) = string_at(content, "id") {
        item.content_id = id.to_string();
    }
    if let Some(kind) = string_at(content, "type") {
        item.kind = ItemKind::from_type_name(kind);
    }
    if item.title.is_empty()
        && let Some(title) = string_at(content, "title")
    {
        item.title = title.to_string();
    }
    if let Some(body) = string_at(content, "body") {
        item.description = body.to_string();
    }
    if let Some(number) = number_at(content, "number") {
        item.number = number;
    }
    if let Some(url) = string_at(content, "url") {
        item.url = url.to_string();
    }
    if item.repository.is_empty() {
        item.repository = repository_value(content.get("repository"));
    }
    if item.milestone.is_empty() {
        item.milestone = milestone_value(content.get("milestone"));
    }
    merge_unique(&mut item.assignees, logins(content.get("assignees")));
    merge_unique(&mut item.labels, label_names(content.get("labels")));
}

fn apply_field_value(item: &mut Item, fm: &Map<String, Value>) {
    if let Some(it) = fm
        .values()
        .filter_map(Value::as_object)
        .find_map(iteration_metadata)
        .or_else(|| iteration_metadata(fm))
    {
        item.iteration = Some(it);
    }

    let field_name = string_at(fm, "fieldName")
        .or_else(|| {
            fm.get("field")
                .and_then(Value::as_object)
                .and_then(|f| string_at(f, "name"))
        })
        .unwrap_or_default()
        .trim()
        .to_string();
    if field_name.is_empty() {
        return;
    }

    let normalized = field_name.to_lowercase();
    let compact: String = normalized.chars().filter(|c| *c != ' ' && *c != '-').collect();
    match normalized.as_str() {
        "status" if item.status.is_empty() => {
            if let Some(status) = fm.get("singleSelectOption").and_then(named_value) {
                item.status = status;
            }
        }
        "priority" if item.priority.is_empty() => {
            item.priority = fm
                .get("singleSelectOption")
                .and_then(named_value)
                .or_else(|| string_at(fm, "text").map(String::from))
                .unwrap_or_default();
        }
        "assignees" if item.assignees.is_empty() => {
            let found = match fm.get("users") {
                Some(users) => logins(Some(users)),
                None => string_at(fm, "text").map(split_list_field).unwrap_or_default(),
            };
            merge_unique(&mut item.assignees, found);
        }
        "labels" if item.labels.is_empty() => {
            let found = match fm.get("labels") {
                Some(labels) => label_names(Some(labels)),
                None => string_at(fm, "text").map(split_list_field).unwrap_or_default(),
            };
            merge_unique(&mut item.labels, found);
        }
        "milestone" if item.milestone.is_empty() => {
            item.milestone = if let Some(val) = fm.get("milestone") {
                milestone_value(Some(val))
            } else if let Some(text) = string_at(fm, "text") {
                text.to_string()
            } else {
                milestone_value(fm.get("singleSelectOption"))
            };
        }
        _ if is_sub_issue_field(&compact) && item.sub_issue_progress.is_empty() => {
            item.sub_issue_progress = match fm.get("number") {
                Some(n) => sub_issue_count(n),
                None => string_at(fm, "text").unwrap_or_default().to_string(),
            };
        }
        _ if is_parent_issue_field(&compact) && item.parent_issue.is_empty() => {
            item.parent_issue = string_at(fm, "text")
                .or_else(|| string_at(fm, "title"))
                .unwrap_or_default()
                .to_string();
        }
        _ => {}
    }

    let collected = field_value_strings(fm);
    if !collected.is_empty() {
        let slot = item.field_values.entry(field_name).or_default();
        merge_unique(slot, collected);
    }
}

/// Every string a field-value entry carries, in a fixed order
fn field_value_strings(fm: &Map<String, Value>) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(id) = string_at(fm, "iterationId") {
        out.push(id.to_string());
    }
    if let Some(title) = string_at(fm, "title") {
        out.push(title.to_string());
    }
    if let Some(opt) = fm.get("singleSelectOption").and_then(Value::as_object) {
        if let Some(name) = string_at(opt, "name") {
            out.push(name.to_string());
        }
        if let Some(id) = string_at(opt, "id") {
            out.push(id.to_string());
        }
    }
    if let Some(text) = string_at(fm, "text") {
        out.extend(split_list_field(text));
    }
    if let Some(n) = fm.get("number").and_then(number_string) {
        out.push(n);
    }
    out.extend(label_names(fm.get("labels")));
    out.extend(logins(fm.get("users")));
    let milestone = milestone_value(fm.get("milestone"));
    if !milestone.is_empty() {
        out.push(milestone);
    }
    out
}

fn field_value_list(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(list) => Some(list),
        Value::Object(map) => map.get("nodes").and_then(Value::as_array),
        _ => None,
    }
}

fn iteration_metadata(data: &Map<String, Value>) -> Option<Iteration> {
    let id = string_at(data, "iterationId")?;
    Some(Iteration {
        id: id.to_string(),
        name: string_at(data, "title").unwrap_or_default().to_string(),
        start: string_at(data, "startDate")
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()),
        duration_days: number_at(data, "duration")
            .and_then(|d| u32::try_from(d).ok())
            .unwrap_or(0),
    })
}

/// A string, or an object's `name` (falling back to `id`)
fn named_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(m) => string_at(m, "name")
            .or_else(|| string_at(m, "id"))
            .map(String::from),
        _ => None,
    }
}

fn repository_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Object(m)) => string_at(m, "nameWithOwner")
            .or_else(|| string_at(m, "full_name"))
            .or_else(|| string_at(m, "name"))
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

fn milestone_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Object(m)) => string_at(m, "title")
            .or_else(|| string_at(m, "name"))
            .or_else(|| string_at(m, "text"))
            .unwrap_or_default()
            .to_string(),
        Some(Value::Array(list)) => list
            .iter()
            .map(|v| milestone_value(Some(v)))
            .find(|s| !s.is_empty())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn parent_issue_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Object(m) => {
            if let Some(title) = string_at(m, "title") {
                return title.to_string();
            }
            if let Some(n) = number_at(m, "number").filter(|n| *n > 0) {
                return format!("#{}", n);
            }
            m.get("content").map(parent_issue_value).unwrap_or_default()
        }
        _ => String::new(),
    }
}

fn sub_issue_count(value: &Value) -> String {
    match value {
        Value::Number(_) => number_string(value)
            .filter(|s| s != "0")
            .unwrap_or_default(),
        Value::Object(m) => {
            if let Some(total) = m.get("totalCount").and_then(number_string)
                && total != "0"
            {
                return total;
            }
            match m.get("nodes").and_then(Value::as_array) {
                Some(nodes) if !nodes.is_empty() => nodes.len().to_string(),
                _ => String::new(),
            }
        }
        _ => String::new(),
    }
}

fn content_or_root<'a>(m: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    let content = m.get("content").and_then(Value::as_object);
    keys.iter()
        .find_map(|k| content.and_then(|c| c.get(*k)))
        .or_else(|| keys.iter().find_map(|k| m.get(*k)))
}

/// Label names from a list, a `{nodes}` connection, `{name}`, `{text}`, or a
/// delimited string
fn label_names(value: Option<&Value>) -> Vec<String> {
    collect_names(value, &["name"])
}

/// User logins from the same shapes as [`label_names`], preferring `login`
fn logins(value: Option<&Value>) -> Vec<String> {
    collect_names(value, &["login", "name"])
}

fn collect_names(value: Option<&Value>, keys: &[&str]) -> Vec<String> {
    let mut out = Vec::new();
    match value {
        Some(Value::Array(list)) => {
            for entry in list {
                out.extend(collect_names(Some(entry), keys));
            }
        }
        Some(Value::Object(m)) => {
            if let Some(nodes) = m.get("nodes") {
                out.extend(collect_names(Some(nodes), keys));
            } else if let Some(name) = keys.iter().find_map(|k| string_at(m, k)) {
                out.push(name.to_string());
            } else if let Some(text) = string_at(m, "text") {
                out.extend(split_list_field(text));
            }
        }
        Some(Value::String(s)) => out.extend(split_list_field(s)),
        _ => {}
    }
    out
}

/// Split a free-form list on `,` `;` and line breaks
pub fn split_list_field(text: &str) -> Vec<String> {
    text.split([',', ';', '\n', '\r'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn scalar_values(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => split_list_field(s),
        Value::Number(_) => number_string(value).into_iter().collect(),
        Value::Array(list) => list
            .iter()
            .filter_map(|v| v.as_str().map(str::trim).filter(|s| !s.is_empty()))
            .map(String::from)
            .collect(),
        Value::Object(m) => named_value(value)
            .or_else(|| string_at(m, "title").map(String::from))
            .into_iter()
            .collect(),
        _ => Vec::new(),
    }
}

fn is_known_key(key: &str) -> bool {
    matches!(
        key,
        "id" | "title"
            | "content"
            | "body"
            | "repository"
            | "milestone"
            | "status"
            | "fieldValues"
            | "parent"
            | "subIssues"
            | "priority"
            | "assignees"
            | "labels"
            | "updatedAt"
            | "createdAt"
            | "position"
            | "type"
    )
}

fn is_sub_issue_field(compact: &str) -> bool {
    matches!(
        compact,
        "subissuecount" | "subissues" | "subissueprogress" | "subissue" | "subissuescount"
    )
}

fn is_parent_issue_field(compact: &str) -> bool {
    matches!(compact, "parentissue" | "isparentissue" | "parent")
}

fn string_at<'a>(m: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    m.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn number_at(m: &Map<String, Value>, key: &str) -> Option<u64> {
    let v = m.get(key)?;
    v.as_u64()
        .or_else(|| v.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
}

fn number_string(value: &Value) -> Option<String> {
    if let Some(n) = value.as_i64() {
        return Some(n.to_string());
    }
    value.as_f64().map(|f| format!("{:.0}", f))
}

fn timestamp_at(m: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    string_at(m, key)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
