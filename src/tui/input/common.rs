use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::{Item, Level};

use super::*;

/// Normalize shifted letters so that bindings can match on the uppercase char
pub(super) fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
        && c.is_ascii_lowercase()
    {
        key.code = KeyCode::Char(c.to_ascii_uppercase());
    }
    key
}

/// Ctrl+C quits from every mode
pub(super) fn is_force_quit(key: KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// j/k and the arrow keys as a row delta
pub(super) fn vertical_delta(key: KeyEvent) -> Option<isize> {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Some(1),
        KeyCode::Char('k') | KeyCode::Up => Some(-1),
        _ => None,
    }
}

/// Clone of the focused item, or a warning when nothing is focused
pub(super) fn require_focused(app: &mut App) -> Option<(usize, Item)> {
    match app.focused_entry() {
        Some((index, item)) => Some((index, item.clone())),
        None => {
            app.notify(Level::Warning, "No item selected");
            None
        }
    }
}

/// Split a comma-separated list, dropping blanks and duplicates
pub(super) fn split_list(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for part in text.split(',') {
        crate::model::push_unique(&mut out, part.trim());
    }
    out
}

pub(super) fn back_to_normal(app: &mut App) {
    app.state.mode = Mode::Normal;
    app.input.clear();
    app.selector = None;
}
