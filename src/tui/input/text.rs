use crossterm::event::{KeyCode, KeyEvent};

use crate::model::GroupBy;
use crate::ops::validate;
use crate::parse::parse_filter;

use super::*;
use crate::tui::message::Task;

/// Keys for the text-capture modes: the buffer takes editing keys,
/// enter commits and esc discards.
pub(super) fn handle_text_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => commit(app),
        KeyCode::Esc => cancel(app),
        _ => {
            app.input.handle_key(key);
            if app.state.mode == Mode::Filtering {
                // Live filtering while typing
                apply_filter_text(app);
            }
        }
    }
}

fn cancel(app: &mut App) {
    if app.state.mode == Mode::Filtering
        && let Some(previous) = app.filter_backup.take()
    {
        app.state.filter = previous;
        app.sync_focus();
    }
    back_to_normal(app);
}

fn commit(app: &mut App) {
    match app.state.mode {
        Mode::Filtering => {
            apply_filter_text(app);
            app.filter_backup = None;
            back_to_normal(app);
        }
        Mode::EditingTitle => commit_title(app),
        Mode::Assigning => commit_assignees(app),
        Mode::LabelsInput => commit_labels(app),
        Mode::MilestoneInput => commit_milestone(app),
        _ => back_to_normal(app),
    }
}

fn apply_filter_text(app: &mut App) {
    let spec = parse_filter(app.input.text());
    if let Some(group) = spec.group_by.as_deref().and_then(GroupBy::parse) {
        app.state.group_by = Some(group);
    } else if app.state.filter.group_by.is_some() {
        // the directive that set the grouping was removed
        app.state.group_by = None;
    }
    app.state.filter = spec;
    app.sync_focus();
}

fn commit_title(app: &mut App) {
    let title = app.input.text().trim().to_string();
    let Some((index, item)) = require_focused(app) else {
        back_to_normal(app);
        return;
    };
    back_to_normal(app);
    if let Err(e) = validate::validate_non_empty(&title, "title") {
        app.notify_error(e);
        return;
    }
    if title == item.title {
        return;
    }
    let description = item.description.clone();
    app.spawn(Task::UpdateTitle {
        index,
        project: app.project.clone(),
        item,
        title,
        description,
    });
}

fn commit_assignees(app: &mut App) {
    let logins = split_list(app.input.text());
    let Some((index, item)) = require_focused(app) else {
        back_to_normal(app);
        return;
    };
    back_to_normal(app);
    if let Err(e) = validate::validate_assignable(&item) {
        app.notify_error(e);
        return;
    }
    app.spawn(Task::UpdateAssignees { index, item, logins });
}

fn commit_labels(app: &mut App) {
    let labels = split_list(app.input.text());
    let Some((index, item)) = require_focused(app) else {
        back_to_normal(app);
        return;
    };
    back_to_normal(app);
    let (repository, number) = match validate::validate_labelable(&item) {
        Ok((repo, number)) => (repo.to_string(), number),
        Err(e) => {
            app.notify_error(e);
            return;
        }
    };
    app.spawn(Task::UpdateLabels {
        index,
        repository,
        number,
        labels,
    });
}

fn commit_milestone(app: &mut App) {
    let milestone = app.input.text().trim().to_string();
    let Some((index, item)) = require_focused(app) else {
        back_to_normal(app);
        return;
    };
    back_to_normal(app);
    if let Err(e) = validate::validate_item_id(&item.id) {
        app.notify_error(e);
        return;
    }
    app.spawn(Task::UpdateMilestone {
        index,
        project: app.project.clone(),
        item_id: item.id,
        milestone,
    });
}
