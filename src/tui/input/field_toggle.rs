use crossterm::event::{KeyCode, KeyEvent};

use crate::model::{CardField, Level};

use super::*;
use crate::tui::message::Task;

/// Flip one optional card field and persist the preference
pub(super) fn handle_field_toggle(app: &mut App, key: KeyEvent) {
    let field = match key.code {
        KeyCode::Char(c) => CardField::from_toggle_key(c),
        _ => None,
    };
    app.state.mode = Mode::Normal;
    let Some(field) = field else {
        return;
    };
    app.state.card_fields.toggle(field);
    app.config.card_fields = app.state.card_fields;
    app.sync_focus();
    let shown = if app.state.card_fields.get(field) {
        "shown"
    } else {
        "hidden"
    };
    app.notify(Level::Info, format!("{} {}", field.label(), shown));
    app.spawn(Task::PersistCardFields(app.state.card_fields));
}
