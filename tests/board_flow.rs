//! End-to-end flows through the board state machine.
//!
//! Each test drives the app with key events, runs the requested tasks
//! against the in-memory sample project, and feeds the results back.

use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use project_hub::io::ConfigStore;
use project_hub::model::{Config, Item, ItemKind, Level};
use project_hub::ops::focus::BoardPos;
use project_hub::ops::sort::SortField;
use project_hub::remote::StubClient;
use project_hub::tui::app::{Mode, View};
use project_hub::tui::{App, Msg, Session, Task, execute, update};

struct Harness {
    app: App,
    client: StubClient,
    store: ConfigStore,
    _dir: TempDir,
}

impl Harness {
    /// App after the initial fetch has completed
    fn loaded() -> Self {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("config.toml"));
        let session = Session {
            project_id: "1".into(),
            owner: "acme".into(),
            item_limit: 100,
            ..Default::default()
        };
        let mut h = Harness {
            app: App::new(session, Config::default()),
            client: StubClient::new(),
            store,
            _dir: dir,
        };
        h.app.reload();
        let tasks = h.app.take_tasks();
        h.run(tasks);
        h
    }

    /// Execute tasks until none are left; notification timers are skipped
    fn run(&mut self, tasks: Vec<Task>) {
        let mut queue: VecDeque<Task> = tasks.into();
        while let Some(task) = queue.pop_front() {
            if matches!(task, Task::DismissAfter { .. }) {
                continue;
            }
            let msg = execute(task, &self.client, &self.store);
            queue.extend(update(&mut self.app, msg));
        }
    }

    /// Replace the loaded collection, as a fresh fetch would
    fn load(&mut self, items: Vec<Item>) {
        let project = StubClient::sample_project();
        let tasks = update(&mut self.app, Msg::ProjectLoaded { project, items });
        self.run(tasks);
    }

    fn press(&mut self, code: KeyCode) {
        let tasks = update(&mut self.app, Msg::Key(KeyEvent::new(code, KeyModifiers::NONE)));
        self.run(tasks);
    }

    fn chars(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyCode::Char(c));
        }
    }

    fn focused_title(&self) -> String {
        self.app.focused_item().map(|i| i.title.clone()).unwrap_or_default()
    }

    fn latest_message(&self) -> String {
        self.app
            .notifications
            .active()
            .last()
            .map(|n| n.message.clone())
            .unwrap_or_default()
    }
}

#[test]
fn initial_load_focuses_first_card() {
    let h = Harness::loaded();
    assert_eq!(h.app.items.len(), 6);
    assert_eq!(h.focused_title(), "Authentication flow");
    assert_eq!(h.latest_message(), "Loaded 6 items");
}

#[test]
fn done_column_is_last() {
    let h = Harness::loaded();
    let names: Vec<String> = h.app.board_columns().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Backlog", "In Progress", "Review", "Done"]);
}

#[test]
fn assigning_keeps_focus_on_the_same_item() {
    let mut h = Harness::loaded();
    h.press(KeyCode::Char('l'));
    h.press(KeyCode::Char('j'));
    assert_eq!(h.focused_title(), "Key bindings");

    h.press(KeyCode::Char('a'));
    assert_eq!(h.app.state.mode, Mode::Assigning);
    assert_eq!(h.app.input.text(), "yamada");
    h.chars(", tanaka");
    h.press(KeyCode::Enter);

    assert_eq!(h.app.state.mode, Mode::Normal);
    assert_eq!(h.focused_title(), "Key bindings");
    let item = h.app.focused_item().unwrap();
    assert_eq!(item.assignees, vec!["yamada", "tanaka"]);
    // Fields the mutation did not report survive the merge
    assert_eq!(item.status, "In Progress");
    assert_eq!(item.labels, vec!["docs"]);
    assert_eq!(h.latest_message(), "Item updated successfully");
    assert!(h.client.calls().iter().any(|c| c == "update_assignees PVTI_123 [yamada,tanaka]"));
}

#[test]
fn status_change_moves_card_and_focus_follows() {
    let mut h = Harness::loaded();
    assert_eq!(h.focused_title(), "Authentication flow");
    h.press(KeyCode::Char('w'));
    assert_eq!(h.app.state.mode, Mode::StatusSelect);
    // Backlog -> In Progress
    h.press(KeyCode::Char('j'));
    h.press(KeyCode::Enter);

    assert_eq!(h.focused_title(), "Authentication flow");
    assert_eq!(h.app.focused_item().unwrap().status, "In Progress");
    assert_eq!(h.app.state.board.column, 1);
}

#[test]
fn filter_narrows_the_board_and_esc_restores_it() {
    let mut h = Harness::loaded();
    h.press(KeyCode::Char('/'));
    h.chars("label:docs");
    let visible: Vec<String> = h.app.filtered().iter().map(|i| i.title.clone()).collect();
    assert_eq!(visible, vec!["Key bindings", "Release notes"]);

    h.press(KeyCode::Esc);
    assert_eq!(h.app.state.mode, Mode::Normal);
    assert_eq!(h.app.filtered().len(), 6);
}

#[test]
fn grouped_table_wraps_past_headers() {
    let mut h = Harness::loaded();
    h.press(KeyCode::Char('2'));
    h.press(KeyCode::Char('m'));
    assert_eq!(h.latest_message(), "Group by: status");

    h.press(KeyCode::Char('G'));
    assert_eq!(h.focused_title(), "Release notes");
    h.press(KeyCode::Char('j'));
    assert_eq!(h.focused_title(), "Authentication flow");
    h.press(KeyCode::Char('k'));
    assert_eq!(h.focused_title(), "Release notes");
}

#[test]
fn sort_toggles_direction_on_repeat() {
    let mut h = Harness::loaded();
    h.press(KeyCode::Char('2'));
    h.press(KeyCode::Char('s'));
    h.press(KeyCode::Char('t'));
    assert_eq!(h.app.state.sort.field, Some(SortField::Title));
    assert!(h.app.state.sort.ascending);
    assert_eq!(h.app.table_items()[0].title, "API integration");

    h.press(KeyCode::Char('s'));
    h.press(KeyCode::Char('t'));
    assert!(!h.app.state.sort.ascending);
    assert_eq!(h.app.table_items()[0].title, "TUI layout");
}

#[test]
fn stale_update_is_dropped_with_a_warning() {
    let mut h = Harness::loaded();
    let tasks = update(
        &mut h.app,
        Msg::ItemUpdated {
            index: 99,
            item: Default::default(),
        },
    );
    h.run(tasks);
    let latest = h.app.notifications.active().last().unwrap();
    assert_eq!(latest.level, Level::Warning);
    assert!(latest.message.starts_with("Update ignored"));
    assert_eq!(h.app.items.len(), 6);
}

#[test]
fn settings_view_round_trip() {
    let mut h = Harness::loaded();
    h.press(KeyCode::Char('4'));
    assert_eq!(h.app.state.view, View::Settings);
    h.press(KeyCode::Esc);
    assert_eq!(h.app.state.view, View::Board);
    assert_eq!(h.app.state.mode, Mode::Normal);
}

#[test]
fn priority_pick_updates_card() {
    let mut h = Harness::loaded();
    h.press(KeyCode::Char('p'));
    h.press(KeyCode::Char('j'));
    h.press(KeyCode::Enter);
    assert_eq!(h.app.focused_item().unwrap().priority, "Medium");
    assert_eq!(h.app.board_columns()[0].cards[0].priority, "Medium");
    assert_eq!(h.latest_message(), "Item updated successfully");
}

#[test]
fn roadmap_status_change_keeps_focus() {
    let mut h = Harness::loaded();
    h.press(KeyCode::Char('3'));
    assert_eq!(h.app.state.view, View::Roadmap);
    h.press(KeyCode::Char('l'));
    assert_eq!(h.focused_title(), "API integration");

    h.press(KeyCode::Char('w'));
    h.press(KeyCode::Char('j'));
    h.press(KeyCode::Enter);
    assert_eq!(h.app.focused_item().unwrap().status, "In Progress");
    assert_eq!(h.focused_title(), "API integration");
    assert_eq!(h.app.state.roadmap_row, 3);
}

fn issue(number: u64, title: &str, status: &str) -> Item {
    Item {
        kind: ItemKind::Issue,
        repository: "acme/api".into(),
        number,
        position: number as i64,
        ..Item::new(format!("PVTI_{}", number), title, status)
    }
}

#[test]
fn assignment_leaves_board_position_unchanged() {
    let mut h = Harness::loaded();
    h.load(vec![
        issue(1, "First", "Backlog"),
        issue(2, "Second", "In Progress"),
        issue(3, "Third", "Review"),
    ]);
    h.press(KeyCode::Char('l'));
    assert_eq!(h.focused_title(), "Second");
    let before = h.app.state.board;
    assert_eq!(before, BoardPos { column: 1, row: 0 });

    h.press(KeyCode::Char('a'));
    h.chars("dave");
    h.press(KeyCode::Enter);

    assert_eq!(h.app.state.board, before);
    assert_eq!(h.focused_title(), "Second");
    assert_eq!(h.app.focused_item().unwrap().assignees, vec!["dave"]);
}

#[test]
fn assigning_a_draft_reports_an_error() {
    let mut h = Harness::loaded();
    let mut draft = Item::new("PVTI_9", "Loose idea", "Backlog");
    draft.kind = ItemKind::DraftIssue;
    h.load(vec![draft]);

    h.press(KeyCode::Char('a'));
    h.chars("dave");
    h.press(KeyCode::Enter);

    assert_eq!(h.app.state.mode, Mode::Normal);
    let latest = h.app.notifications.active().last().unwrap();
    assert_eq!(latest.level, Level::Error);
    assert!(latest.message.starts_with("Error: cannot assign"));
    assert!(h.app.items[0].assignees.is_empty());
    assert!(!h.client.calls().iter().any(|c| c.starts_with("update_assignees")));
}
