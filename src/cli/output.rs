use serde::Serialize;

use crate::model::{Item, Project};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ItemJson {
    pub id: String,
    pub title: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iteration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Serialize)]
pub struct ItemListJson {
    pub project: String,
    pub total: usize,
    pub items: Vec<ItemJson>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

pub fn item_to_json(item: &Item) -> ItemJson {
    ItemJson {
        id: item.id.clone(),
        title: item.title.clone(),
        status: item.status.clone(),
        kind: non_empty(item.kind.as_str()),
        reference: non_empty(&item.reference()),
        assignees: item.assignees.clone(),
        labels: item.labels.clone(),
        milestone: non_empty(&item.milestone),
        priority: non_empty(item.effective_priority()),
        iteration: non_empty(item.iteration_name()),
        url: non_empty(&item.url),
        body: None,
    }
}

pub fn list_to_json(project: &Project, total: usize, items: &[&Item]) -> ItemListJson {
    ItemListJson {
        project: project.name.clone(),
        total,
        items: items.iter().map(|item| item_to_json(item)).collect(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// One-line summary: `[Status] repo#12 Title @alice #bug`
pub fn format_item_line(item: &Item) -> String {
    let reference = item.reference();
    let reference = if reference.is_empty() {
        String::new()
    } else {
        format!("{} ", reference)
    };
    let assignees: String = item.assignees.iter().map(|a| format!(" @{}", a)).collect();
    let labels: String = item.labels.iter().map(|l| format!(" #{}", l)).collect();
    format!("[{}] {}{}{}{}", item.status, reference, item.title, assignees, labels)
}

/// Header line for `list`: `== Project (3/7 items) ==`
pub fn format_list_header(project: &Project, shown: usize, total: usize) -> String {
    format!("== {} ({}/{} items) ==", project.name, shown, total)
}

/// Detailed view for `show`
pub fn format_item_detail(item: &Item, body: Option<&str>) -> Vec<String> {
    let mut lines = vec![item.title.clone()];
    let mut field = |key: &str, value: &str| {
        if !value.is_empty() {
            lines.push(format!("{}: {}", key, value));
        }
    };
    field("id", &item.id);
    field("status", &item.status);
    field("issue", &item.reference());
    field("assignees", &item.assignees.join(", "));
    field("labels", &item.labels.join(", "));
    field("priority", item.effective_priority());
    field("milestone", &item.milestone);
    field("iteration", item.iteration_name());
    field("parent", &item.parent_issue);
    field("sub-issues", &item.sub_issue_progress);
    field("url", &item.url);

    let body = body.unwrap_or(&item.description);
    if !body.trim().is_empty() {
        lines.push(String::new());
        lines.extend(body.lines().map(str::to_string));
    }
    lines
}
