use std::sync::Mutex;

use chrono::{Duration, Utc};

use super::{ProjectClient, RemoteError};
use crate::model::{Field, FieldOption, Item, ItemKind, Iteration, Project};
use crate::ops::validate;

/// In-memory provider serving a sample project. Mutations answer with partial
/// items the way the real remote does and are recorded for inspection.
#[derive(Debug, Default)]
pub struct StubClient {
    calls: Mutex<Vec<String>>,
}

impl StubClient {
    pub fn new() -> Self {
        StubClient::default()
    }

    /// Operations performed so far, e.g. `update_assignees PVTI_2 [dave]`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    pub fn sample_project() -> Project {
        Project {
            id: "1".into(),
            node_id: "PVT_sample".into(),
            owner: "acme".into(),
            name: "Web App v2.0".into(),
            fields: vec![
                select_field("PVTSSF_status", "Status", &["Backlog", "In Progress", "Review", "Done"]),
                select_field("PVTSSF_priority", "Priority", &["High", "Medium", "Low"]),
                select_field("PVTSSF_labels", "Labels", &["bug", "feature", "docs"]),
                select_field("PVTSSF_milestone", "Milestone", &["v2.0", "v2.1"]),
                Field {
                    id: "PVTIF_sprint".into(),
                    name: "Sprint".into(),
                    options: vec![],
                },
            ],
        }
    }

    pub fn sample_items() -> Vec<Item> {
        let today = Utc::now().date_naive();
        let current = Iteration {
            id: "it-2".into(),
            name: "Sprint 2".into(),
            start: Some(today - Duration::days(3)),
            duration_days: 14,
        };
        let next = Iteration {
            id: "it-3".into(),
            name: "Sprint 3".into(),
            start: Some(today + Duration::days(11)),
            duration_days: 14,
        };

        let rows: [(&str, &str, &str, &[&str], &[&str], &str, Option<&Iteration>); 6] = [
            ("Authentication flow", "Backlog", "repo1", &["tanaka"], &["feature"], "High", Some(&current)),
            ("API integration", "Backlog", "repo1", &["sato"], &["feature"], "Medium", Some(&next)),
            ("TUI layout", "In Progress", "repo2", &["tanaka", "yamada"], &["feature"], "High", Some(&current)),
            ("Key bindings", "In Progress", "repo2", &["yamada"], &["docs"], "Low", None),
            ("Add test coverage", "Review", "repo1", &[], &["bug"], "Medium", Some(&current)),
            ("Release notes", "Done", "repo1", &["sato"], &["docs"], "", None),
        ];
        rows.iter()
            .enumerate()
            .map(|(i, (title, status, repo, assignees, labels, priority, iteration))| {
                let number = 120 + i as u64;
                let repository = format!("acme/{}", repo);
                let mut item = Item::new(format!("PVTI_{}", number), *title, *status);
                item.content_id = format!("I_{}", number);
                item.kind = ItemKind::Issue;
                item.url = format!("https://github.com/{}/issues/{}", repository, number);
                item.repository = repository;
                item.number = number;
                item.assignees = assignees.iter().map(|s| s.to_string()).collect();
                item.labels = labels.iter().map(|s| s.to_string()).collect();
                item.priority = priority.to_string();
                item.milestone = "v2.0".into();
                item.iteration = iteration.cloned();
                item.position = i as i64;
                item.created_at = Some(Utc::now() - Duration::days(30 - i as i64));
                item.updated_at = Some(Utc::now() - Duration::hours(i as i64));
                if let Some(it) = &item.iteration {
                    item.field_values
                        .insert("Sprint".into(), vec![it.id.clone(), it.name.clone()]);
                }
                item
            })
            .collect()
    }
}

fn select_field(id: &str, name: &str, options: &[&str]) -> Field {
    Field {
        id: id.into(),
        name: name.into(),
        options: options
            .iter()
            .enumerate()
            .map(|(i, o)| FieldOption {
                id: format!("{}_{}", id, i),
                name: o.to_string(),
            })
            .collect(),
    }
}

fn option_name(project: &Project, field_id: &str, option_id: &str) -> Option<(String, String)> {
    let field = project.fields.iter().find(|f| f.id == field_id)?;
    let option = field.options.iter().find(|o| o.id == option_id)?;
    Some((field.name.clone(), option.name.clone()))
}

impl ProjectClient for StubClient {
    fn fetch_project(
        &self,
        project_id: &str,
        owner: &str,
        limit: usize,
    ) -> Result<(Project, Vec<Item>), RemoteError> {
        self.record(format!("fetch_project {} {} {}", project_id, owner, limit));
        let mut project = Self::sample_project();
        if !owner.is_empty() {
            project.owner = owner.to_string();
        }
        let mut items = Self::sample_items();
        items.truncate(limit);
        Ok((project, items))
    }

    fn update_status(
        &self,
        project: &Project,
        item_id: &str,
        field_id: &str,
        option_id: &str,
    ) -> Result<Item, RemoteError> {
        validate::validate_select_update(project.mutation_id(), item_id, field_id, option_id)?;
        self.record(format!("update_status {} {}", item_id, option_id));
        let status = option_name(project, field_id, option_id)
            .map(|(_, name)| name)
            .unwrap_or_default();
        Ok(Item {
            id: item_id.to_string(),
            status,
            ..Default::default()
        })
    }

    fn update_field(
        &self,
        project: &Project,
        item_id: &str,
        field_id: &str,
        option_id: &str,
    ) -> Result<Item, RemoteError> {
        validate::validate_select_update(project.mutation_id(), item_id, field_id, option_id)?;
        self.record(format!("update_field {} {} {}", item_id, field_id, option_id));
        let mut item = Item {
            id: item_id.to_string(),
            ..Default::default()
        };
        if let Some((field, value)) = option_name(project, field_id, option_id) {
            item.fill_select_value(&field, &value);
        }
        Ok(item)
    }

    fn update_labels(&self, repository: &str, number: u64, labels: &[String]) -> Result<Item, RemoteError> {
        self.record(format!("update_labels {}#{} [{}]", repository, number, labels.join(",")));
        Ok(Item {
            labels: labels.to_vec(),
            ..Default::default()
        })
    }

    fn update_milestone(&self, _project: &Project, item_id: &str, milestone: &str) -> Result<Item, RemoteError> {
        validate::validate_item_id(item_id)?;
        self.record(format!("update_milestone {} {}", item_id, milestone));
        Ok(Item {
            id: item_id.to_string(),
            milestone: milestone.to_string(),
            ..Default::default()
        })
    }

    fn update_assignees(&self, item: &Item, logins: &[String]) -> Result<Item, RemoteError> {
        validate::validate_assignable(item)?;
        self.record(format!("update_assignees {} [{}]", item.id, logins.join(",")));
        Ok(Item {
            id: item.id.clone(),
            assignees: logins.to_vec(),
            ..Default::default()
        })
    }

    fn update_item(
        &self,
        _project: &Project,
        item: &Item,
        title: &str,
        description: &str,
    ) -> Result<Item, RemoteError> {
        validate::validate_non_empty(title, "title")?;
        self.record(format!("update_item {} {}", item.id, title));
        Ok(Item {
            id: item.id.clone(),
            title: title.to_string(),
            description: description.to_string(),
            ..Default::default()
        })
    }

    fn fetch_issue_body(&self, repository: &str, number: u64) -> Result<String, RemoteError> {
        self.record(format!("fetch_issue_body {}#{}", repository, number));
        Ok(format!(
            "Sample body for {}#{}.\n\nSteps:\n1. Open the board\n2. Press o on a card",
            repository, number
        ))
    }
}
