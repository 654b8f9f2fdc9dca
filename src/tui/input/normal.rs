use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::{FilterSpec, GroupBy, Level};

use super::*;
use crate::tui::app::{DetailState, TableColumn, View};
use crate::tui::message::Task;

pub(super) fn handle_normal(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if let Some(delta) = vertical_delta(key) {
        app.move_focus(delta);
        return;
    }
    match key.code {
        KeyCode::Char('r') if ctrl => app.reload(),
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('R') => app.reload(),

        // Views
        KeyCode::Char('1') | KeyCode::Char('b') => app.set_view(View::Board),
        KeyCode::Char('2') | KeyCode::Char('t') => app.set_view(View::Table),
        KeyCode::Char('3') | KeyCode::Char('r') => app.set_view(View::Roadmap),
        KeyCode::Char('4') => app.set_view(View::Settings),

        // Movement
        KeyCode::Char('h') | KeyCode::Left => app.move_column(-1),
        KeyCode::Char('l') | KeyCode::Right => app.move_column(1),
        KeyCode::Char('g') | KeyCode::Home => app.focus_edge(true),
        KeyCode::Char('G') | KeyCode::End => app.focus_edge(false),

        KeyCode::Char('/') => enter_filter(app),
        KeyCode::Char('s') => {
            if app.state.view == View::Table {
                app.state.mode = Mode::Sort;
                app.notify(
                    Level::Info,
                    "Sort: t title, S status, r repo, L labels, m milestone, p priority, a assignees, n number, c created, u updated",
                );
            } else {
                app.notify(Level::Info, "Sorting is available in the table view (2)");
            }
        }
        KeyCode::Char('m') => cycle_group(app),
        KeyCode::Esc => clear_filter(app),

        // Editing
        KeyCode::Char('i') | KeyCode::Enter => edit_focused(app),
        KeyCode::Char('a') => enter_text_mode(app, Mode::Assigning),
        KeyCode::Char('e') => enter_text_mode(app, Mode::LabelsInput),
        KeyCode::Char('E') => enter_text_mode(app, Mode::MilestoneInput),
        KeyCode::Char('w') => enter_select(app, Mode::StatusSelect),
        KeyCode::Char('p') => enter_select(app, Mode::PrioritySelect),
        KeyCode::Char('L') => enter_select(app, Mode::LabelSelect),
        KeyCode::Char('M') => enter_select(app, Mode::MilestoneSelect),
        KeyCode::Char('f') => {
            app.state.mode = Mode::FieldToggle;
            app.notify(
                Level::Info,
                "Toggle: m milestone, r repository, l labels, s sub-issues, p parent",
            );
        }

        // Item actions
        KeyCode::Char('o') => open_detail(app),
        KeyCode::Char('O') => {
            if let Some(url) = focused_url(app) {
                app.spawn(Task::OpenBrowser(url));
            }
        }
        KeyCode::Char('y') => {
            if let Some(url) = focused_url(app) {
                app.spawn(Task::CopyToClipboard(url));
            }
        }
        _ => {}
    }
}

fn enter_filter(app: &mut App) {
    app.filter_backup = Some(app.state.filter.clone());
    app.input.set(app.state.filter.raw.clone());
    app.state.mode = Mode::Filtering;
}

/// Clear the filter and any grouping
fn clear_filter(app: &mut App) {
    if app.state.filter.is_empty() && app.state.group_by.is_none() {
        return;
    }
    app.state.filter = FilterSpec::default();
    app.state.group_by = None;
    app.sync_focus();
    app.notify(Level::Info, "Filter cleared");
}

fn cycle_group(app: &mut App) {
    if app.state.view != View::Table {
        app.notify(Level::Info, "Grouping is available in the table view (2)");
        return;
    }
    app.state.group_by = GroupBy::cycle(app.state.group_by);
    app.sync_focus();
    let label = app.state.group_by.map_or("none", GroupBy::as_str);
    app.notify(Level::Info, format!("Group by: {}", label));
}

/// Edit the focused item; in the table the focused column picks the field
fn edit_focused(app: &mut App) {
    if app.state.view != View::Table {
        enter_text_mode(app, Mode::EditingTitle);
        return;
    }
    match app.focused_column() {
        TableColumn::Title => enter_text_mode(app, Mode::EditingTitle),
        TableColumn::Status => enter_select(app, Mode::StatusSelect),
        TableColumn::Labels => enter_text_mode(app, Mode::LabelsInput),
        TableColumn::Milestone => enter_text_mode(app, Mode::MilestoneInput),
        TableColumn::Priority => enter_select(app, Mode::PrioritySelect),
        TableColumn::Assignees => enter_text_mode(app, Mode::Assigning),
        column @ (TableColumn::Repository | TableColumn::SubIssues | TableColumn::ParentIssue) => {
            app.notify(Level::Warning, format!("{} is not editable", column.label()));
        }
    }
}

/// Enter a text-capture mode with the buffer pre-filled from the focused item
pub(super) fn enter_text_mode(app: &mut App, mode: Mode) {
    let Some((_, item)) = require_focused(app) else {
        return;
    };
    let prefill = match mode {
        Mode::EditingTitle => item.title.clone(),
        Mode::Assigning => item.assignees.join(", "),
        Mode::LabelsInput => item.labels.join(", "),
        Mode::MilestoneInput => item.milestone.clone(),
        _ => String::new(),
    };
    app.input.set(prefill);
    app.state.mode = mode;
}

fn open_detail(app: &mut App) {
    let Some((_, item)) = require_focused(app) else {
        return;
    };
    let fetch = item.locator().map(|(repo, number)| Task::FetchDetail {
        item_id: item.id.clone(),
        repository: repo.to_string(),
        number,
    });
    let body = if fetch.is_some() || item.description.is_empty() {
        None
    } else {
        Some(item.description.clone())
    };
    app.detail = Some(DetailState {
        item_id: item.id.clone(),
        body,
        loading: fetch.is_some(),
        scroll: 0,
    });
    app.state.mode = Mode::Detail;
    if let Some(task) = fetch {
        app.spawn(task);
    }
}

fn focused_url(app: &mut App) -> Option<String> {
    let (_, item) = require_focused(app)?;
    if item.url.is_empty() {
        app.notify(Level::Warning, "Item has no URL");
        return None;
    }
    Some(item.url)
}
