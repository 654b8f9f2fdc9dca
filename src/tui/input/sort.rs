use crossterm::event::{KeyCode, KeyEvent};

use crate::model::Level;
use crate::ops::sort::SortField;

use super::*;

/// Sort mode: one letter per field; movement keys keep working
pub(super) fn handle_sort(app: &mut App, key: KeyEvent) {
    if let Some(delta) = vertical_delta(key) {
        app.move_focus(delta);
        return;
    }
    match key.code {
        KeyCode::Esc => app.state.mode = Mode::Normal,
        KeyCode::Char(c) => {
            let Some(field) = SortField::from_key(c) else {
                return;
            };
            app.state.sort = app.state.sort.toggle(field);
            app.state.mode = Mode::Normal;
            // Keep the same item focused in its new row
            app.sync_focus();
            if let Some(label) = app.state.sort.describe() {
                app.notify(Level::Info, format!("Sort: {}", label));
            }
        }
        _ => {}
    }
}
