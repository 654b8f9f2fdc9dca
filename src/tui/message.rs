use std::time::Duration;

use crossterm::event::KeyEvent;

use crate::model::{CardFields, Config, Item, NotificationId, Project};

/// Everything the event loop can dequeue. Each message is handled to
/// completion before the next one.
#[derive(Debug, Clone)]
pub enum Msg {
    Key(KeyEvent),
    Resize,
    ProjectLoaded { project: Project, items: Vec<Item> },
    /// Partial item returned by a mutation, addressed by the index the item
    /// had when the mutation was started
    ItemUpdated { index: usize, item: Item },
    DetailReady { item_id: String, body: String },
    /// A side effect finished; the text is shown as a hint
    ActionDone(String),
    CardFieldsSaved,
    SettingsSaved(Config),
    Error(String),
    DismissNotification(NotificationId),
}

/// Work requested by a transition. Tasks run off the loop and resolve to
/// exactly one [`Msg`].
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    FetchProject {
        project_id: String,
        owner: String,
        limit: usize,
    },
    UpdateStatus {
        index: usize,
        project: Project,
        item_id: String,
        field_id: String,
        option_id: String,
        option_name: String,
    },
    UpdateField {
        index: usize,
        project: Project,
        item_id: String,
        field_id: String,
        option_id: String,
        field_name: String,
        option_name: String,
    },
    UpdateLabels {
        index: usize,
        repository: String,
        number: u64,
        labels: Vec<String>,
    },
    UpdateMilestone {
        index: usize,
        project: Project,
        item_id: String,
        milestone: String,
    },
    UpdateAssignees {
        index: usize,
        item: Item,
        logins: Vec<String>,
    },
    UpdateTitle {
        index: usize,
        project: Project,
        item: Item,
        title: String,
        description: String,
    },
    FetchDetail {
        item_id: String,
        repository: String,
        number: u64,
    },
    DismissAfter {
        id: NotificationId,
        after: Duration,
    },
    OpenBrowser(String),
    CopyToClipboard(String),
    PersistCardFields(CardFields),
    SaveSettings(Config),
}

impl Task {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Task::FetchProject { .. } => "fetch_project",
            Task::UpdateStatus { .. } => "update_status",
            Task::UpdateField { .. } => "update_field",
            Task::UpdateLabels { .. } => "update_labels",
            Task::UpdateMilestone { .. } => "update_milestone",
            Task::UpdateAssignees { .. } => "update_assignees",
            Task::UpdateTitle { .. } => "update_title",
            Task::FetchDetail { .. } => "fetch_detail",
            Task::DismissAfter { .. } => "dismiss_after",
            Task::OpenBrowser(_) => "open_browser",
            Task::CopyToClipboard(_) => "copy_to_clipboard",
            Task::PersistCardFields(_) => "persist_card_fields",
            Task::SaveSettings(_) => "save_settings",
        }
    }
}
