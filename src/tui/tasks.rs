use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use crate::io::{ConfigStore, shell};
use crate::model::{Item, UNKNOWN_STATUS};
use crate::remote::{ProjectClient, RemoteError};

use super::message::{Msg, Task};

/// Runs tasks on worker threads and posts their results back to the loop
pub struct TaskRunner {
    client: Arc<dyn ProjectClient>,
    store: ConfigStore,
    tx: Sender<Msg>,
}

impl TaskRunner {
    pub fn new(client: Arc<dyn ProjectClient>, store: ConfigStore, tx: Sender<Msg>) -> Self {
        TaskRunner { client, store, tx }
    }

    pub fn spawn(&self, task: Task) {
        let client = Arc::clone(&self.client);
        let store = self.store.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let msg = execute(task, client.as_ref(), &store);
            // The loop may already be gone on quit
            let _ = tx.send(msg);
        });
    }

    pub fn spawn_all(&self, tasks: Vec<Task>) {
        for task in tasks {
            self.spawn(task);
        }
    }
}

/// Perform one task to completion. Every outcome, failures included, is
/// turned into a message.
pub fn execute(task: Task, client: &dyn ProjectClient, store: &ConfigStore) -> Msg {
    let name = task.name();
    tracing::debug!(task = name, "task started");
    let msg = match task {
        Task::FetchProject {
            project_id,
            owner,
            limit,
        } => match client.fetch_project(&project_id, &owner, limit) {
            Ok((project, items)) => {
                tracing::info!(project = %project.name, items = items.len(), "project loaded");
                Msg::ProjectLoaded { project, items }
            }
            Err(e) => remote_error("load project", e),
        },
        Task::UpdateStatus {
            index,
            project,
            item_id,
            field_id,
            option_id,
            option_name,
        } => match client.update_status(&project, &item_id, &field_id, &option_id) {
            Ok(mut item) => {
                if item.status.is_empty() || item.status == UNKNOWN_STATUS {
                    item.status = option_name;
                }
                updated(index, item_id, item)
            }
            Err(e) => remote_error("update status", e),
        },
        Task::UpdateField {
            index,
            project,
            item_id,
            field_id,
            option_id,
            field_name,
            option_name,
        } => match client.update_field(&project, &item_id, &field_id, &option_id) {
            Ok(mut item) => {
                // gh echoes little more than the id after an edit
                item.fill_select_value(&field_name, &option_name);
                updated(index, item_id, item)
            }
            Err(e) => remote_error("update field", e),
        },
        Task::UpdateLabels {
            index,
            repository,
            number,
            labels,
        } => match client.update_labels(&repository, number, &labels) {
            Ok(item) => Msg::ItemUpdated { index, item },
            Err(e) => remote_error("update labels", e),
        },
        Task::UpdateMilestone {
            index,
            project,
            item_id,
            milestone,
        } => match client.update_milestone(&project, &item_id, &milestone) {
            Ok(item) => updated(index, item_id, item),
            Err(e) => remote_error("update milestone", e),
        },
        Task::UpdateAssignees { index, item, logins } => {
            match client.update_assignees(&item, &logins) {
                Ok(partial) => updated(index, item.id, partial),
                Err(e) => remote_error("update assignees", e),
            }
        }
        Task::UpdateTitle {
            index,
            project,
            item,
            title,
            description,
        } => match client.update_item(&project, &item, &title, &description) {
            Ok(partial) => updated(index, item.id, partial),
            Err(e) => remote_error("update item", e),
        },
        Task::FetchDetail {
            item_id,
            repository,
            number,
        } => match client.fetch_issue_body(&repository, number) {
            Ok(body) => Msg::DetailReady { item_id, body },
            Err(e) => remote_error("fetch details", e),
        },
        Task::DismissAfter { id, after } => {
            thread::sleep(after);
            Msg::DismissNotification(id)
        }
        Task::OpenBrowser(url) => match shell::open_browser(&url) {
            Ok(()) => Msg::ActionDone(format!("Opened {}", url)),
            Err(e) => Msg::Error(format!("open browser: {}", e)),
        },
        Task::CopyToClipboard(text) => match shell::copy_to_clipboard(&text) {
            Ok(()) => Msg::ActionDone(format!("Copied {}", text)),
            Err(e) => Msg::Error(format!("copy to clipboard: {}", e)),
        },
        Task::PersistCardFields(fields) => match store.save_card_fields(&fields) {
            Ok(()) => Msg::CardFieldsSaved,
            Err(e) => Msg::Error(format!("save card fields: {}", e)),
        },
        Task::SaveSettings(config) => match store.save(&config) {
            Ok(()) => Msg::SettingsSaved(config),
            Err(e) => Msg::Error(format!("save settings: {}", e)),
        },
    };
    if let Msg::Error(e) = &msg {
        tracing::warn!(task = name, error = %e, "task failed");
    } else {
        tracing::debug!(task = name, "task finished");
    }
    msg
}

/// The remote may omit the item id on partial results
fn updated(index: usize, item_id: String, mut item: Item) -> Msg {
    if item.id.is_empty() {
        item.id = item_id;
    }
    Msg::ItemUpdated { index, item }
}

fn remote_error(action: &str, e: RemoteError) -> Msg {
    Msg::Error(format!("{}: {}", action, e))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;
    use crate::model::{CardFields, NotificationId, Project};
    use crate::remote::StubClient;
    use crate::tui::input::handle_key;
    use crate::tui::test_support::{code, key, loaded_app};
    use crate::tui::update::update;
    use crossterm::event::KeyCode;

    /// Sample remote whose single-select edits answer with the bare id, as
    /// `gh project item-edit` does
    struct EchoIdClient(StubClient);

    impl ProjectClient for EchoIdClient {
        fn fetch_project(&self, id: &str, owner: &str, limit: usize) -> Result<(Project, Vec<Item>), RemoteError> {
            self.0.fetch_project(id, owner, limit)
        }
        fn update_status(&self, p: &Project, item: &str, field: &str, option: &str) -> Result<Item, RemoteError> {
            self.0.update_status(p, item, field, option)
        }
        fn update_field(&self, _: &Project, item_id: &str, _: &str, _: &str) -> Result<Item, RemoteError> {
            Ok(Item {
                id: item_id.to_string(),
                ..Default::default()
            })
        }
        fn update_labels(&self, repo: &str, number: u64, labels: &[String]) -> Result<Item, RemoteError> {
            self.0.update_labels(repo, number, labels)
        }
        fn update_milestone(&self, p: &Project, item_id: &str, milestone: &str) -> Result<Item, RemoteError> {
            self.0.update_milestone(p, item_id, milestone)
        }
        fn update_assignees(&self, item: &Item, logins: &[String]) -> Result<Item, RemoteError> {
            self.0.update_assignees(item, logins)
        }
        fn update_item(&self, p: &Project, item: &Item, title: &str, body: &str) -> Result<Item, RemoteError> {
            self.0.update_item(p, item, title, body)
        }
        fn fetch_issue_body(&self, repo: &str, number: u64) -> Result<String, RemoteError> {
            self.0.fetch_issue_body(repo, number)
        }
    }

    fn store(dir: &TempDir) -> ConfigStore {
        ConfigStore::new(dir.path().join("config.toml"))
    }

    #[test]
    fn status_update_fills_in_option_name() {
        let dir = TempDir::new().unwrap();
        let client = StubClient::new();
        let project = StubClient::sample_project();
        let field = project.field("Status").unwrap().clone();
        let task = Task::UpdateStatus {
            index: 0,
            project: project.clone(),
            item_id: "PVTI_120".into(),
            field_id: field.id.clone(),
            option_id: field.options[1].id.clone(),
            option_name: "In Progress".into(),
        };
        match execute(task, &client, &store(&dir)) {
            Msg::ItemUpdated { index, item } => {
                assert_eq!(index, 0);
                assert_eq!(item.id, "PVTI_120");
                assert_eq!(item.status, "In Progress");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn invalid_item_id_becomes_error_message() {
        let dir = TempDir::new().unwrap();
        let client = StubClient::new();
        let project = StubClient::sample_project();
        let task = Task::UpdateMilestone {
            index: 0,
            project,
            item_id: "12345".into(),
            milestone: "v2.1".into(),
        };
        match execute(task, &client, &store(&dir)) {
            Msg::Error(e) => assert!(e.starts_with("update milestone: "), "{}", e),
            other => panic!("unexpected {:?}", other),
        }
        assert!(client.calls().is_empty());
    }

    #[test]
    fn card_fields_are_persisted() {
        let dir = TempDir::new().unwrap();
        let fields = CardFields {
            repository: true,
            ..Default::default()
        };
        let msg = execute(Task::PersistCardFields(fields), &StubClient::new(), &store(&dir));
        assert!(matches!(msg, Msg::CardFieldsSaved));
        assert_eq!(store(&dir).load().unwrap().card_fields, fields);
    }

    #[test]
    fn dismiss_after_resolves_to_its_id() {
        let dir = TempDir::new().unwrap();
        let task = Task::DismissAfter {
            id: NotificationId(7),
            after: Duration::from_millis(1),
        };
        let msg = execute(task, &StubClient::new(), &store(&dir));
        assert!(matches!(msg, Msg::DismissNotification(NotificationId(7))));
    }

    #[test]
    fn priority_pick_shows_up_when_remote_echoes_only_the_id() {
        let dir = TempDir::new().unwrap();
        let client = EchoIdClient(StubClient::new());
        let mut app = loaded_app();
        assert_eq!(app.focused_item().unwrap().priority, "High");

        handle_key(&mut app, key('p'));
        handle_key(&mut app, key('j'));
        handle_key(&mut app, code(KeyCode::Enter));
        for task in app.take_tasks() {
            if matches!(task, Task::DismissAfter { .. }) {
                continue;
            }
            let msg = execute(task, &client, &store(&dir));
            update(&mut app, msg);
        }

        let item = app.focused_item().unwrap();
        assert_eq!(item.priority, "Medium");
        assert_eq!(item.field_values.get("Priority"), Some(&vec!["Medium".to_string()]));
        assert_eq!(app.board_columns()[0].cards[0].priority, "Medium");
    }
}
