use crossterm::event::{KeyCode, KeyEvent};

use crate::model::Level;
use crate::ops::validate;

use super::*;
use crate::tui::app::SelectorState;
use crate::tui::message::Task;

/// Open the option list for one of the select modes. The project must have
/// a field with exactly the mode's field name; otherwise the mode is left
/// unchanged and an error is shown.
pub(super) fn enter_select(app: &mut App, mode: Mode) {
    let Some(field_name) = mode.select_field_name() else {
        return;
    };
    let Some((_, item)) = require_focused(app) else {
        return;
    };
    let Some(field) = app.project.field(field_name).cloned() else {
        app.notify_error(format!("{} field not found in project", field_name));
        return;
    };
    if field.options.is_empty() {
        app.notify_error(format!("{} field has no options", field_name));
        return;
    }
    let current = match mode {
        Mode::StatusSelect => item.status.clone(),
        Mode::PrioritySelect => item.priority.clone(),
        Mode::MilestoneSelect => item.milestone.clone(),
        _ => item.labels.first().cloned().unwrap_or_default(),
    };
    let cursor = field.option_index(&current).unwrap_or(0);
    app.selector = Some(SelectorState { field, cursor });
    app.state.mode = mode;
    app.notify(Level::Info, "j/k to choose, enter to apply, esc to cancel");
}

pub(super) fn handle_select(app: &mut App, key: KeyEvent) {
    if let Some(delta) = vertical_delta(key) {
        if let Some(sel) = &mut app.selector {
            let n = sel.field.options.len() as isize;
            sel.cursor = (sel.cursor as isize + delta).rem_euclid(n.max(1)) as usize;
        }
        return;
    }
    match key.code {
        KeyCode::Enter => apply_selection(app),
        KeyCode::Esc | KeyCode::Char('q') => back_to_normal(app),
        _ => {}
    }
}

fn apply_selection(app: &mut App) {
    let mode = app.state.mode;
    let Some(sel) = app.selector.take() else {
        back_to_normal(app);
        return;
    };
    back_to_normal(app);
    let Some(option) = sel.field.options.get(sel.cursor).cloned() else {
        return;
    };
    let Some((index, item)) = require_focused(app) else {
        return;
    };

    if mode == Mode::StatusSelect {
        if validate::validate_item_id(&item.id).is_err() {
            app.notify_error(format!(
                "Invalid item ID format: {}. Expected project item node ID.",
                item.id
            ));
            return;
        }
        app.spawn(Task::UpdateStatus {
            index,
            project: app.project.clone(),
            item_id: item.id,
            field_id: sel.field.id,
            option_id: option.id,
            option_name: option.name,
        });
    } else {
        app.spawn(Task::UpdateField {
            index,
            project: app.project.clone(),
            item_id: item.id,
            field_id: sel.field.id,
            option_id: option.id,
            field_name: sel.field.name,
            option_name: option.name,
        });
    }
}
