mod common;
mod detail;
mod field_toggle;
mod normal;
mod select;
mod settings;
mod sort;
mod text;

use crossterm::event::{KeyCode, KeyEvent};

use super::app::{App, Mode};

// Import all submodule functions into this module's namespace
// so that submodules can access cross-module functions via `use super::*;`
#[allow(unused_imports)]
use common::*;
#[allow(unused_imports)]
use detail::*;
#[allow(unused_imports)]
use field_toggle::*;
#[allow(unused_imports)]
use normal::*;
#[allow(unused_imports)]
use select::*;
#[allow(unused_imports)]
use settings::*;
#[allow(unused_imports)]
use sort::*;
#[allow(unused_imports)]
use text::*;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    let key = normalize_key(key);
    if is_force_quit(key) {
        app.should_quit = true;
        return;
    }

    match app.state.mode {
        Mode::Normal => handle_normal(app, key),
        Mode::Filtering
        | Mode::EditingTitle
        | Mode::Assigning
        | Mode::LabelsInput
        | Mode::MilestoneInput => handle_text_input(app, key),
        Mode::StatusSelect | Mode::LabelSelect | Mode::MilestoneSelect | Mode::PrioritySelect => {
            handle_select(app, key)
        }
        Mode::Sort => handle_sort(app, key),
        Mode::FieldToggle => handle_field_toggle(app, key),
        Mode::Detail => handle_detail(app, key),
        Mode::Settings => handle_settings(app, key),
    }
}
