use crossterm::event::{KeyCode, KeyEvent};

use super::*;
use crate::tui::app::View;
use crate::tui::message::Task;

/// Settings form: tab/arrows move between rows, space flips flags, typing
/// edits the focused text row, enter saves and esc cancels.
pub(super) fn handle_settings(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.set_view(View::Board);
        }
        KeyCode::Enter => {
            let config = app.settings.to_config(&app.config);
            app.spawn(Task::SaveSettings(config));
        }
        KeyCode::Tab | KeyCode::Down => app.settings.cycle(1),
        KeyCode::BackTab | KeyCode::Up => app.settings.cycle(-1),
        KeyCode::Char(' ') if app.settings.focused_field().is_toggle() => {
            app.settings.toggle_focused();
        }
        _ => {
            if let Some(buffer) = app.settings.focused_buffer() {
                buffer.handle_key(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::input::handle_key;
    use crate::tui::settings_form::SettingsField;
    use crate::tui::test_support::{code, key, loaded_app, type_text};

    #[test]
    fn editing_and_saving_settings() {
        let mut app = loaded_app();
        handle_key(&mut app, key('4'));
        assert_eq!(app.state.mode, Mode::Settings);

        app.settings.project_id.clear();
        type_text(&mut app, "42");
        handle_key(&mut app, code(KeyCode::Tab));
        handle_key(&mut app, code(KeyCode::Tab));
        handle_key(&mut app, code(KeyCode::Tab));
        assert_eq!(app.settings.focused_field(), SettingsField::ExcludeDone);
        handle_key(&mut app, key(' '));
        handle_key(&mut app, code(KeyCode::Enter));

        let tasks = app.take_tasks();
        let saved = tasks.iter().find_map(|t| match t {
            Task::SaveSettings(config) => Some(config.clone()),
            _ => None,
        });
        let saved = saved.unwrap();
        assert_eq!(saved.default_project_id, "42");
        assert!(saved.default_exclude_done);
    }

    #[test]
    fn esc_returns_to_board_without_saving() {
        let mut app = loaded_app();
        handle_key(&mut app, key('4'));
        handle_key(&mut app, code(KeyCode::Esc));
        assert_eq!(app.state.view, View::Board);
        assert_eq!(app.state.mode, Mode::Normal);
        assert!(!app.take_tasks().iter().any(|t| matches!(t, Task::SaveSettings(_))));
    }
}
