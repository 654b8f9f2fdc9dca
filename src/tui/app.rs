use std::io;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use chrono::Utc;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use regex::Regex;

use crate::io::ConfigStore;
use crate::model::{
    CardFields, Config, Field, FilterSpec, GroupBy, Item, Level, Notifications, Project,
};
use crate::ops::focus::{self, BoardPos};
use crate::ops::projection::{self, Bucket, Column, Timeline};
use crate::ops::sort::{self, SortKey};
use crate::ops::{predicate, search};
use crate::parse::{parse_filter, with_iterations};
use crate::remote::ProjectClient;

use super::message::{Msg, Task};
use super::render;
use super::settings_form::SettingsForm;
use super::tasks::TaskRunner;
use super::text_buffer::TextBuffer;
use super::theme::Theme;
use super::update;

/// Which view is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Board,
    Table,
    Roadmap,
    Settings,
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Filtering,
    EditingTitle,
    Assigning,
    LabelsInput,
    MilestoneInput,
    StatusSelect,
    LabelSelect,
    MilestoneSelect,
    PrioritySelect,
    Sort,
    FieldToggle,
    Detail,
    Settings,
}

impl Mode {
    /// Modes that capture typed text into the input buffer
    pub fn is_text_input(self) -> bool {
        matches!(
            self,
            Mode::Filtering
                | Mode::EditingTitle
                | Mode::Assigning
                | Mode::LabelsInput
                | Mode::MilestoneInput
        )
    }

    /// Project field a select mode edits
    pub fn select_field_name(self) -> Option<&'static str> {
        match self {
            Mode::StatusSelect => Some("Status"),
            Mode::LabelSelect => Some("Labels"),
            Mode::MilestoneSelect => Some("Milestone"),
            Mode::PrioritySelect => Some("Priority"),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Filtering => "FILTER",
            Mode::EditingTitle => "EDIT",
            Mode::Assigning => "ASSIGN",
            Mode::LabelsInput => "LABELS",
            Mode::MilestoneInput => "MILESTONE",
            Mode::StatusSelect => "STATUS",
            Mode::LabelSelect => "LABEL",
            Mode::MilestoneSelect => "MILESTONE",
            Mode::PrioritySelect => "PRIORITY",
            Mode::Sort => "SORT",
            Mode::FieldToggle => "FIELDS",
            Mode::Detail => "DETAIL",
            Mode::Settings => "SETTINGS",
        }
    }
}

/// A table column; optional ones follow the card field visibility flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableColumn {
    Title,
    Status,
    Repository,
    Labels,
    Milestone,
    SubIssues,
    ParentIssue,
    Priority,
    Assignees,
}

impl TableColumn {
    pub fn label(self) -> &'static str {
        match self {
            TableColumn::Title => "Title",
            TableColumn::Status => "Status",
            TableColumn::Repository => "Repository",
            TableColumn::Labels => "Labels",
            TableColumn::Milestone => "Milestone",
            TableColumn::SubIssues => "Sub-issues",
            TableColumn::ParentIssue => "Parent",
            TableColumn::Priority => "Priority",
            TableColumn::Assignees => "Assignees",
        }
    }
}

/// Columns shown in the table for the given visibility flags
pub fn visible_columns(fields: &CardFields) -> Vec<TableColumn> {
    let mut columns = vec![TableColumn::Title, TableColumn::Status];
    if fields.repository {
        columns.push(TableColumn::Repository);
    }
    if fields.labels {
        columns.push(TableColumn::Labels);
    }
    if fields.milestone {
        columns.push(TableColumn::Milestone);
    }
    if fields.sub_issues {
        columns.push(TableColumn::SubIssues);
    }
    if fields.parent_issue {
        columns.push(TableColumn::ParentIssue);
    }
    columns.push(TableColumn::Priority);
    columns.push(TableColumn::Assignees);
    columns
}

/// Option list popup for the select modes
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorState {
    pub field: Field,
    pub cursor: usize,
}

/// Detail overlay for one item
#[derive(Debug, Clone, PartialEq)]
pub struct DetailState {
    pub item_id: String,
    pub body: Option<String>,
    pub loading: bool,
    pub scroll: u16,
}

/// Where the user is looking and how the items are arranged
#[derive(Debug, Clone)]
pub struct ViewState {
    pub view: View,
    pub mode: Mode,
    /// Identity of the focused item; positions are derived from it
    pub focused_id: Option<String>,
    /// Index of the focused item in `App::items`, recomputed by `sync_focus`
    pub focused_index: Option<usize>,
    pub board: BoardPos,
    pub table_row: usize,
    pub table_column: usize,
    /// Position of the focused item in roadmap reading order
    pub roadmap_row: usize,
    pub filter: FilterSpec,
    pub sort: SortKey,
    pub group_by: Option<GroupBy>,
    pub card_fields: CardFields,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            view: View::Board,
            mode: Mode::Normal,
            focused_id: None,
            focused_index: None,
            board: BoardPos::default(),
            table_row: 0,
            table_column: 0,
            roadmap_row: 0,
            filter: FilterSpec::default(),
            sort: SortKey::default(),
            group_by: None,
            card_fields: CardFields::default(),
        }
    }
}

/// Effective startup settings after merging flags with the config file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub project_id: String,
    pub owner: String,
    pub item_limit: usize,
    pub exclude_done: bool,
    pub suppress_hints: bool,
    pub iteration_filters: Vec<String>,
}

/// Main application state
pub struct App {
    pub project: Project,
    /// Source of truth; projections are rebuilt from it
    pub items: Vec<Item>,
    pub state: ViewState,
    pub config: Config,
    pub session: Session,
    pub theme: Theme,
    pub notifications: Notifications,
    pub input: TextBuffer,
    /// Filter active before filter mode was entered, restored on esc
    pub filter_backup: Option<FilterSpec>,
    pub selector: Option<SelectorState>,
    pub detail: Option<DetailState>,
    pub settings: SettingsForm,
    pub loading: bool,
    pub should_quit: bool,
    tasks: Vec<Task>,
}

impl App {
    pub fn new(session: Session, config: Config) -> Self {
        let project = Project {
            id: session.project_id.clone(),
            owner: session.owner.clone(),
            ..Default::default()
        };
        let state = ViewState {
            card_fields: config.card_fields,
            filter: with_iterations("", &session.iteration_filters),
            ..Default::default()
        };
        App {
            project,
            items: Vec::new(),
            state,
            theme: Theme::from_config(&config.ui),
            settings: SettingsForm::from_config(&config),
            config,
            session,
            notifications: Notifications::default(),
            input: TextBuffer::default(),
            filter_backup: None,
            selector: None,
            detail: None,
            loading: false,
            should_quit: false,
            tasks: Vec::new(),
        }
    }

    /// Queue background work; the loop picks it up after the transition
    pub fn spawn(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub fn take_tasks(&mut self) -> Vec<Task> {
        std::mem::take(&mut self.tasks)
    }

    /// Add a notification and schedule its expiry. Info-level hints are
    /// dropped while hints are suppressed.
    pub fn notify(&mut self, level: Level, message: impl Into<String>) {
        if level == Level::Info && self.session.suppress_hints {
            return;
        }
        let n = self.notifications.push(level, message);
        let task = Task::DismissAfter {
            id: n.id,
            after: n.dismiss_after,
        };
        self.spawn(task);
    }

    pub fn notify_error(&mut self, message: impl std::fmt::Display) {
        self.notify(Level::Error, format!("Error: {}", message));
    }

    /// Request a fresh fetch of the project
    pub fn reload(&mut self) {
        if self.project.id.is_empty() {
            self.notify(Level::Warning, "No project configured; set one in Settings (4)");
            return;
        }
        self.loading = true;
        let task = Task::FetchProject {
            project_id: self.project.id.clone(),
            owner: self.project.owner.clone(),
            limit: self.session.item_limit,
        };
        self.spawn(task);
    }

    pub fn set_view(&mut self, view: View) {
        self.state.view = view;
        if view == View::Settings {
            self.settings = SettingsForm::from_config(&self.config);
            self.state.mode = Mode::Settings;
        } else if self.state.mode == Mode::Settings {
            self.state.mode = Mode::Normal;
        }
        self.sync_focus();
    }

    // -----------------------------------------------------------------------
    // Projections

    /// Items passing the active filter, in collection order
    pub fn filtered(&self) -> Vec<&Item> {
        predicate::apply(&self.items, &self.project.fields, &self.state.filter, Utc::now())
    }

    pub fn board_columns(&self) -> Vec<Column> {
        projection::board_columns(&self.filtered(), &self.project.status_options())
    }

    /// Filtered then sorted sequence backing the table
    pub fn table_items(&self) -> Vec<&Item> {
        let mut items = self.filtered();
        sort::apply(&mut items, self.state.sort);
        items
    }

    /// Buckets for the grouped table, or None when the table is flat
    pub fn grouped_buckets<'a>(&'a self, items: &[&'a Item]) -> Option<Vec<Bucket<'a>>> {
        let group_by = self.state.group_by?;
        Some(projection::buckets(items, group_by, &self.project.status_options()))
    }

    /// Filtered items arranged by iteration
    pub fn roadmap(&self) -> Vec<Timeline<'_>> {
        projection::roadmap(&self.filtered())
    }

    pub fn roadmap_items(&self) -> Vec<&Item> {
        projection::roadmap_order(&self.roadmap())
    }

    pub fn visible_columns(&self) -> Vec<TableColumn> {
        visible_columns(&self.state.card_fields)
    }

    pub fn focused_column(&self) -> TableColumn {
        let columns = self.visible_columns();
        columns[self.state.table_column.min(columns.len() - 1)]
    }

    /// Highlighter for the free-text term; follows the input while filtering
    pub fn search_regex(&self) -> Option<Regex> {
        if self.state.mode == Mode::Filtering {
            return search::term_regex(&parse_filter(self.input.text()).query);
        }
        search::term_regex(&self.state.filter.query)
    }

    // -----------------------------------------------------------------------
    // Focus

    pub fn focused_item(&self) -> Option<&Item> {
        let id = self.state.focused_id.as_deref()?;
        match self.state.focused_index.and_then(|i| self.items.get(i)) {
            Some(item) if item.id == id => Some(item),
            _ => self.items.iter().find(|item| item.id == id),
        }
    }

    /// Index of the focused item in the collection and the item itself
    pub fn focused_entry(&self) -> Option<(usize, &Item)> {
        let id = self.state.focused_id.as_deref()?;
        self.items.iter().enumerate().find(|(_, item)| item.id == id)
    }

    /// Re-locate the focused identity in the active projection. Falls back
    /// to the first selectable row when the item is no longer visible.
    pub fn sync_focus(&mut self) {
        let id = self.state.focused_id.clone();
        match self.state.view {
            View::Board | View::Settings => {
                let columns = self.board_columns();
                let pos = id
                    .as_deref()
                    .and_then(|id| focus::locate_card(&columns, id))
                    .or_else(|| focus::first_card(&columns));
                self.state.board = pos.unwrap_or_default();
                self.state.focused_id = pos
                    .and_then(|p| focus::card_at(&columns, p))
                    .map(|card| card.id.clone());
            }
            View::Table => {
                let items = self.table_items();
                let (row, new_id) = match self.grouped_buckets(&items) {
                    Some(buckets) => {
                        let rows = projection::flatten(&buckets);
                        let row = id
                            .as_deref()
                            .and_then(|id| focus::locate_row(&rows, id))
                            .or_else(|| focus::first_item_row(&rows));
                        let new_id = row.and_then(|r| rows[r].item()).map(|item| item.id.clone());
                        (row, new_id)
                    }
                    None => {
                        let row = id
                            .as_deref()
                            .and_then(|id| items.iter().position(|item| item.id == id))
                            .or(if items.is_empty() { None } else { Some(0) });
                        (row, row.map(|r| items[r].id.clone()))
                    }
                };
                self.state.table_row = row.unwrap_or(0);
                self.state.focused_id = new_id;
            }
            View::Roadmap => {
                let items = self.roadmap_items();
                let row = id
                    .as_deref()
                    .and_then(|id| items.iter().position(|item| item.id == id))
                    .or(if items.is_empty() { None } else { Some(0) });
                let new_id = row.map(|r| items[r].id.clone());
                self.state.roadmap_row = row.unwrap_or(0);
                self.state.focused_id = new_id;
            }
        }
        self.state.focused_index = self
            .state
            .focused_id
            .as_deref()
            .and_then(|id| self.items.iter().position(|item| item.id == id));
        let ncols = self.visible_columns().len();
        self.state.table_column = self.state.table_column.min(ncols - 1);
    }

    /// Move focus by `delta` rows within the visible sequence
    pub fn move_focus(&mut self, delta: isize) {
        match self.state.view {
            View::Board => {
                let columns = self.board_columns();
                let pos = focus::move_board(&columns, self.state.board, 0, delta);
                self.focus_card(&columns, pos);
            }
            View::Table => {
                let items = self.table_items();
                let target = match self.grouped_buckets(&items) {
                    Some(buckets) => {
                        let rows = projection::flatten(&buckets);
                        focus::step_grouped(&rows, self.state.table_row, delta)
                            .and_then(|r| rows[r].item().map(|item| (r, item.id.clone())))
                    }
                    None => focus::step_flat(items.len(), self.state.table_row, delta)
                        .map(|r| (r, items[r].id.clone())),
                };
                if let Some((row, id)) = target {
                    self.state.table_row = row;
                    self.focus_id(id);
                }
            }
            View::Roadmap => {
                let items = self.roadmap_items();
                if let Some(row) = focus::step_flat(items.len(), self.state.roadmap_row, delta) {
                    let id = items[row].id.clone();
                    self.state.roadmap_row = row;
                    self.focus_id(id);
                }
            }
            View::Settings => {}
        }
    }

    /// Board: change column. Table: change the focused column. Roadmap:
    /// jump to the first item of a neighbouring iteration.
    pub fn move_column(&mut self, delta: isize) {
        match self.state.view {
            View::Board => {
                let columns = self.board_columns();
                let pos = focus::move_board(&columns, self.state.board, delta, 0);
                self.focus_card(&columns, pos);
            }
            View::Table => {
                let last = self.visible_columns().len() as isize - 1;
                self.state.table_column =
                    (self.state.table_column as isize + delta).clamp(0, last) as usize;
            }
            View::Roadmap => {
                let timelines = self.roadmap();
                if timelines.is_empty() {
                    return;
                }
                let mut starts = Vec::with_capacity(timelines.len());
                let mut offset = 0;
                for timeline in &timelines {
                    starts.push(offset);
                    offset += timeline.items.len();
                }
                let current = starts
                    .iter()
                    .rposition(|&start| start <= self.state.roadmap_row)
                    .unwrap_or(0);
                let target = (current as isize + delta).clamp(0, starts.len() as isize - 1) as usize;
                let id = timelines[target].items[0].id.clone();
                self.state.roadmap_row = starts[target];
                self.focus_id(id);
            }
            View::Settings => {}
        }
    }

    /// Jump to the first (`top`) or last row of the current column / table
    pub fn focus_edge(&mut self, top: bool) {
        match self.state.view {
            View::Board => {
                let columns = self.board_columns();
                let Some(column) = columns.get(self.state.board.column) else {
                    return;
                };
                if column.cards.is_empty() {
                    return;
                }
                let row = if top { 0 } else { column.cards.len() - 1 };
                let pos = BoardPos {
                    column: self.state.board.column,
                    row,
                };
                self.focus_card(&columns, pos);
            }
            View::Table => {
                let items = self.table_items();
                let target = match self.grouped_buckets(&items) {
                    Some(buckets) => {
                        let rows = projection::flatten(&buckets);
                        let row = if top {
                            focus::first_item_row(&rows)
                        } else {
                            focus::last_item_row(&rows)
                        };
                        row.and_then(|r| rows[r].item().map(|item| (r, item.id.clone())))
                    }
                    None if items.is_empty() => None,
                    None => {
                        let r = if top { 0 } else { items.len() - 1 };
                        Some((r, items[r].id.clone()))
                    }
                };
                if let Some((row, id)) = target {
                    self.state.table_row = row;
                    self.focus_id(id);
                }
            }
            View::Roadmap => {
                let items = self.roadmap_items();
                if items.is_empty() {
                    return;
                }
                let row = if top { 0 } else { items.len() - 1 };
                let id = items[row].id.clone();
                self.state.roadmap_row = row;
                self.focus_id(id);
            }
            View::Settings => {}
        }
    }

    fn focus_card(&mut self, columns: &[Column], pos: BoardPos) {
        self.state.board = pos;
        if let Some(card) = focus::card_at(columns, pos) {
            let id = card.id.clone();
            self.focus_id(id);
        }
    }

    fn focus_id(&mut self, id: String) {
        self.state.focused_index = self.items.iter().position(|item| item.id == id);
        self.state.focused_id = Some(id);
    }
}

/// Run the TUI until the user quits
pub fn run(
    mut app: App,
    client: Arc<dyn ProjectClient>,
    store: ConfigStore,
) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let (tx, rx) = mpsc::channel();
    let runner = TaskRunner::new(client, store, tx);
    app.reload();
    runner.spawn_all(app.take_tasks());

    let result = run_event_loop(&mut terminal, &mut app, &runner, &rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    runner: &TaskRunner,
    rx: &mpsc::Receiver<Msg>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(50))? {
            let msg = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => Some(Msg::Key(key)),
                Event::Resize(..) => Some(Msg::Resize),
                _ => None,
            };
            if let Some(msg) = msg {
                runner.spawn_all(update::update(app, msg));
            }
        }

        // Results from background tasks
        while let Ok(msg) = rx.try_recv() {
            runner.spawn_all(update::update(app, msg));
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::loaded_app;

    #[test]
    fn focus_starts_on_first_card() {
        let app = loaded_app();
        assert_eq!(app.state.board, BoardPos { column: 0, row: 0 });
        assert_eq!(app.focused_item().unwrap().title, "Authentication flow");
        assert_eq!(app.state.focused_index, Some(0));
    }

    #[test]
    fn switching_to_table_keeps_identity() {
        let mut app = loaded_app();
        app.move_column(1);
        let id = app.state.focused_id.clone();
        app.set_view(View::Table);
        assert_eq!(app.state.focused_id, id);
        let items = app.table_items();
        assert_eq!(Some(&items[app.state.table_row].id), id.as_ref());
    }

    #[test]
    fn grouping_relocates_focus_row() {
        let mut app = loaded_app();
        app.set_view(View::Table);
        app.focus_edge(false);
        let id = app.state.focused_id.clone();
        app.state.group_by = Some(GroupBy::Status);
        app.sync_focus();
        assert_eq!(app.state.focused_id, id);
        let items = app.table_items();
        let buckets = app.grouped_buckets(&items).unwrap();
        let rows = projection::flatten(&buckets);
        assert_eq!(rows[app.state.table_row].item().map(|i| &i.id), id.as_ref());
    }

    fn roadmap_numbers(app: &App) -> Vec<u64> {
        app.roadmap_items().iter().map(|i| i.number).collect()
    }

    #[test]
    fn roadmap_reads_by_iteration_start() {
        let mut app = loaded_app();
        app.move_focus(1);
        assert_eq!(app.state.focused_id.as_deref(), Some("PVTI_121"));
        app.set_view(View::Roadmap);
        assert_eq!(roadmap_numbers(&app), vec![120, 122, 124, 121, 123, 125]);
        assert_eq!(app.state.focused_id.as_deref(), Some("PVTI_121"));
        assert_eq!(app.state.roadmap_row, 3);
    }

    #[test]
    fn roadmap_movement_steps_items_and_iterations() {
        let mut app = loaded_app();
        app.set_view(View::Roadmap);
        app.focus_edge(true);
        app.move_focus(1);
        assert_eq!(app.focused_item().unwrap().number, 122);
        app.move_column(1);
        assert_eq!(app.focused_item().unwrap().number, 121);
        app.move_column(1);
        assert_eq!(app.focused_item().unwrap().number, 123);
        app.move_column(1);
        assert_eq!(app.focused_item().unwrap().number, 123);
        app.move_column(-1);
        assert_eq!(app.focused_item().unwrap().number, 121);
        app.focus_edge(false);
        assert_eq!(app.focused_item().unwrap().number, 125);
        assert_eq!(app.state.roadmap_row, 5);
    }

    #[test]
    fn roadmap_focus_follows_item_into_another_iteration() {
        let mut app = loaded_app();
        app.set_view(View::Roadmap);
        app.move_focus(2);
        assert_eq!(app.focused_item().unwrap().number, 124);
        let next = app.items[1].iteration.clone();
        app.items[4].iteration = next;
        app.sync_focus();
        assert_eq!(roadmap_numbers(&app), vec![120, 122, 121, 124, 123, 125]);
        assert_eq!(app.state.focused_id.as_deref(), Some("PVTI_124"));
        assert_eq!(app.state.roadmap_row, 3);
    }

    #[test]
    fn filtered_out_focus_falls_back_to_first_row() {
        let mut app = loaded_app();
        app.focus_edge(false);
        app.state.filter = parse_filter("assignee:sato");
        app.sync_focus();
        let focused = app.focused_item().unwrap();
        assert!(focused.assignees.contains(&"sato".to_string()));
    }

    #[test]
    fn table_columns_follow_card_fields() {
        let mut fields = CardFields::default();
        fields.labels = false;
        fields.repository = true;
        assert_eq!(
            visible_columns(&fields),
            vec![
                TableColumn::Title,
                TableColumn::Status,
                TableColumn::Repository,
                TableColumn::Milestone,
                TableColumn::Priority,
                TableColumn::Assignees,
            ]
        );
    }

    #[test]
    fn suppressed_hints_drop_info_only() {
        let mut app = loaded_app();
        app.session.suppress_hints = true;
        app.notify(Level::Info, "hint");
        app.notify(Level::Error, "boom");
        let active: Vec<&str> = app.notifications.active().map(|n| n.message.as_str()).collect();
        assert_eq!(active, vec!["boom"]);
        assert_eq!(app.take_tasks().len(), 1);
    }

    #[test]
    fn startup_iterations_seed_the_filter() {
        let session = Session {
            iteration_filters: vec!["@current".into(), "Sprint 2".into()],
            ..Default::default()
        };
        let app = App::new(session, Config::default());
        assert_eq!(app.state.filter.iterations, vec!["@current", "Sprint 2"]);
        assert_eq!(parse_filter(&app.state.filter.raw).iterations, app.state.filter.iterations);
    }
}
