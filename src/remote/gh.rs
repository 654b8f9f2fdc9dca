use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use serde_json::{Value, json};

use super::{ProjectClient, RemoteError};
use crate::model::{Field, Item, ItemKind, Project};
use crate::ops::validate::{self, ValidationError};
use crate::parse::item_decoder;

/// [`ProjectClient`] backed by the `gh` command line tool
#[derive(Debug, Clone)]
pub struct GhClient {
    gh_path: PathBuf,
}

impl Default for GhClient {
    fn default() -> Self {
        GhClient::new("gh")
    }
}

impl GhClient {
    pub fn new(gh_path: impl Into<PathBuf>) -> Self {
        GhClient {
            gh_path: gh_path.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String, RemoteError> {
        self.run_with_input(args, None)
    }

    fn run_with_input(&self, args: &[&str], input: Option<&str>) -> Result<String, RemoteError> {
        let program = self.gh_path.display().to_string();
        tracing::debug!(program = %program, ?args, "running gh");

        let mut child = Command::new(&self.gh_path)
            .args(args)
            .stdin(if input.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RemoteError::Spawn {
                program: program.clone(),
                source,
            })?;
        if let (Some(text), Some(mut stdin)) = (input, child.stdin.take()) {
            stdin
                .write_all(text.as_bytes())
                .map_err(|source| RemoteError::Spawn {
                    program: program.clone(),
                    source,
                })?;
        }
        let output = child.wait_with_output().map_err(|source| RemoteError::Spawn {
            program: program.clone(),
            source,
        })?;

        if !output.status.success() {
            let command = format!("gh {}", args.iter().take(2).copied().collect::<Vec<_>>().join(" "));
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::warn!(%command, %stderr, "gh command failed");
            return Err(RemoteError::CommandFailed { command, stderr });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn fetch_fields(&self, project_id: &str, owner: &str) -> Result<Vec<Field>, RemoteError> {
        let mut args = vec!["project", "field-list", project_id, "--format", "json"];
        if !owner.is_empty() {
            args.extend(["--owner", owner]);
        }
        let out = self.run(&args)?;
        item_decoder::decode_fields(&out).map_err(|source| RemoteError::Decode {
            what: "project fields",
            source,
        })
    }

    fn edit_item(&self, args: &[&str], item_id: &str) -> Result<Item, RemoteError> {
        let out = self.run(args)?;
        Ok(decode_edited_item(&out, item_id))
    }

    fn patch_issue(&self, repository: &str, number: u64, body: &Value) -> Result<Item, RemoteError> {
        let endpoint = format!("repos/{}/issues/{}", repository, number);
        let out = self.run_with_input(
            &["api", "--method", "PATCH", endpoint.as_str(), "--input", "-"],
            Some(&body.to_string()),
        )?;
        let value: Value = serde_json::from_str(&out).map_err(|source| RemoteError::Decode {
            what: "issue",
            source,
        })?;
        Ok(item_decoder::decode_issue(&value))
    }
}

impl ProjectClient for GhClient {
    fn fetch_project(
        &self,
        project_id: &str,
        owner: &str,
        limit: usize,
    ) -> Result<(Project, Vec<Item>), RemoteError> {
        let mut args = vec!["project", "view", project_id, "--format", "json"];
        if !owner.is_empty() {
            args.extend(["--owner", owner]);
        }
        let out = self.run(&args)?;
        let mut project =
            item_decoder::decode_project_view(&out, project_id).map_err(|source| RemoteError::Decode {
                what: "project",
                source,
            })?;
        if project.owner.is_empty() {
            project.owner = owner.to_string();
        }

        // A project without a readable schema is still browsable
        match self.fetch_fields(project_id, owner) {
            Ok(fields) => project.fields = fields,
            Err(e) => tracing::warn!(error = %e, "could not load project fields"),
        }

        let limit = limit.to_string();
        let mut args = vec!["project", "item-list", project_id, "--format", "json", "--limit", limit.as_str()];
        if !owner.is_empty() {
            args.extend(["--owner", owner]);
        }
        let out = self.run(&args)?;
        let mut items = item_decoder::decode_item_list(&out).map_err(|source| RemoteError::Decode {
            what: "project items",
            source,
        })?;
        if items.iter().all(|i| i.position == 0) {
            for (i, item) in items.iter_mut().enumerate() {
                item.position = i as i64;
            }
        }
        tracing::info!(project = %project.name, items = items.len(), "fetched project");
        Ok((project, items))
    }

    fn update_status(
        &self,
        project: &Project,
        item_id: &str,
        field_id: &str,
        option_id: &str,
    ) -> Result<Item, RemoteError> {
        self.update_field(project, item_id, field_id, option_id)
    }

    fn update_field(
        &self,
        project: &Project,
        item_id: &str,
        field_id: &str,
        option_id: &str,
    ) -> Result<Item, RemoteError> {
        let project_id = project.mutation_id();
        validate::validate_select_update(project_id, item_id, field_id, option_id)?;
        self.edit_item(
            &[
                "project",
                "item-edit",
                "--id",
                item_id,
                "--project-id",
                project_id,
                "--field-id",
                field_id,
                "--single-select-option-id",
                option_id,
                "--format",
                "json",
            ],
            item_id,
        )
    }

    fn update_labels(&self, repository: &str, number: u64, labels: &[String]) -> Result<Item, RemoteError> {
        self.patch_issue(repository, number, &json!({ "labels": labels }))
    }

    fn update_milestone(&self, project: &Project, item_id: &str, milestone: &str) -> Result<Item, RemoteError> {
        validate::validate_item_id(item_id)?;
        let fields = if project.fields.is_empty() {
            self.fetch_fields(&project.id, &project.owner)?
        } else {
            project.fields.clone()
        };
        let field = fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case("milestone"))
            .ok_or_else(|| RemoteError::Unsupported("project has no Milestone field".into()))?;

        let option_id = if field.options.is_empty() {
            None
        } else {
            let idx = field
                .option_index(milestone)
                .ok_or_else(|| RemoteError::Unsupported(format!("unknown milestone: {}", milestone)))?;
            Some(field.options[idx].id.clone())
        };

        let mut args = vec![
            "project",
            "item-edit",
            "--id",
            item_id,
            "--project-id",
            project.mutation_id(),
            "--field-id",
            field.id.as_str(),
            "--format",
            "json",
        ];
        match &option_id {
            Some(id) => args.extend(["--single-select-option-id", id.as_str()]),
            None => args.extend(["--text", milestone]),
        }
        let mut item = self.edit_item(&args, item_id)?;
        if item.milestone.is_empty() {
            item.milestone = milestone.to_string();
        }
        Ok(item)
    }

    fn update_assignees(&self, item: &Item, logins: &[String]) -> Result<Item, RemoteError> {
        let (repository, number) = validate::validate_assignable(item)?;
        self.patch_issue(repository, number, &json!({ "assignees": logins }))
    }

    fn update_item(
        &self,
        project: &Project,
        item: &Item,
        title: &str,
        description: &str,
    ) -> Result<Item, RemoteError> {
        validate::validate_non_empty(title, "title")?;
        let number = item.number.to_string();
        let args: Vec<&str> = match (&item.kind, item.locator()) {
            _ if item.content_id.starts_with("DI_") => vec![
                "project", "item-edit", "--id", item.content_id.as_str(), "--title", title, "--body", description,
            ],
            (ItemKind::Issue, Some((repo, _))) if !item.content_id.is_empty() => vec![
                "issue", "edit", number.as_str(), "--repo", repo, "--title", title, "--body", description,
            ],
            (ItemKind::PullRequest, Some((repo, _))) if !item.content_id.is_empty() => vec![
                "pr", "edit", number.as_str(), "--repo", repo, "--title", title, "--body", description,
            ],
            _ => {
                validate::validate_item_id(&item.id)?;
                vec![
                    "project",
                    "item-edit",
                    "--id",
                    item.id.as_str(),
                    "--project-id",
                    project.mutation_id(),
                    "--title",
                    title,
                    "--body",
                    description,
                ]
            }
        };
        self.run(&args)?;
        Ok(Item {
            id: item.id.clone(),
            title: title.to_string(),
            description: description.to_string(),
            ..Default::default()
        })
    }

    fn fetch_issue_body(&self, repository: &str, number: u64) -> Result<String, RemoteError> {
        if repository.is_empty() || number == 0 {
            return Err(ValidationError::NoLocator {
                id: format!("{}#{}", repository, number),
            }
            .into());
        }
        let number = number.to_string();
        let out = self.run(&["issue", "view", number.as_str(), "--repo", repository, "--json", "body"])?;
        let value: Value = serde_json::from_str(&out).map_err(|source| RemoteError::Decode {
            what: "issue body",
            source,
        })?;
        Ok(value
            .get("body")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }
}

/// `item-edit` output varies between gh versions; fall back to a bare item
/// carrying only the id when it cannot be decoded.
fn decode_edited_item(out: &str, item_id: &str) -> Item {
    let mut item = serde_json::from_str::<Value>(out)
        .ok()
        .and_then(|v| item_decoder::decode_item(&v))
        .unwrap_or_default();
    if item.id.is_empty() {
        item.id = item_id.to_string();
    }
    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UNKNOWN_STATUS;

    #[test]
    fn edited_item_falls_back_to_id() {
        let item = decode_edited_item("not json", "PVTI_1");
        assert_eq!(item.id, "PVTI_1");
        assert_eq!(item.status, "");
    }

    #[test]
    fn edited_item_decodes_payload() {
        let item = decode_edited_item(r#"{"id": "PVTI_2", "title": "New"}"#, "PVTI_1");
        assert_eq!(item.id, "PVTI_2");
        assert_eq!(item.title, "New");
        assert_eq!(item.status, UNKNOWN_STATUS);
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let client = GhClient::new("/nonexistent/gh-binary");
        let err = client.fetch_project("1", "", 10).unwrap_err();
        assert!(matches!(err, RemoteError::Spawn { .. }), "{err}");
    }

    #[test]
    fn invalid_ids_fail_before_running_gh() {
        let client = GhClient::new("/nonexistent/gh-binary");
        let project = Project {
            id: "1".into(),
            node_id: "PVT_1".into(),
            ..Default::default()
        };
        let err = client.update_status(&project, "123", "F", "O").unwrap_err();
        assert!(matches!(err, RemoteError::Validation(_)), "{err}");
    }

    #[test]
    fn assignment_rejects_drafts_before_running_gh() {
        let client = GhClient::new("/nonexistent/gh-binary");
        let mut item = Item::new("PVTI_1", "t", "Todo");
        item.kind = ItemKind::DraftIssue;
        let err = client.update_assignees(&item, &["a".into()]).unwrap_err();
        assert!(err.to_string().contains("cannot assign"), "{err}");
    }
}
