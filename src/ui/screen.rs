use itertools::Itertools;

use crate::{
    app::{App, Mode},
    editor::{DurationEditor, Field},
    keymap::KeyMap,
};

/// A UI Screen boundary: decides what text the current mode shows. Styling is
/// left to the render style.
pub trait Screen {
    fn title(&self) -> &'static str;
    fn body(&self, app: &App) -> Vec<String>;
    fn help(&self, app: &App, keymap: &KeyMap) -> String;
}

/// Countdown screen
pub struct TimerScreen;

impl Screen for TimerScreen {
    fn title(&self) -> &'static str {
        "Pomodoro CLI App"
    }

    fn body(&self, app: &App) -> Vec<String> {
        let session = &app.session;
        vec![
            session.phase().to_string(),
            format!("Time: {}", super::timer_text(session.timer())),
            format!("Round: {}", session.round()),
        ]
    }

    fn help(&self, app: &App, keymap: &KeyMap) -> String {
        keymap
            .help_bindings(app.session.running())
            .iter()
            .map(|b| format!("{} {}", b.help_key, b.help_desc))
            .join(" • ")
    }
}

/// Duration editor screen
pub struct EditorScreen;

impl EditorScreen {
    fn field_line(editor: &DurationEditor, field: Field) -> String {
        let focused = editor.focus() == field;
        format!(
            "{} {}: {}{} min",
            if focused { ">" } else { " " },
            field,
            editor.input(field),
            if focused { "_" } else { "" }
        )
    }
}

impl Screen for EditorScreen {
    fn title(&self) -> &'static str {
        "Change timer value"
    }

    fn body(&self, app: &App) -> Vec<String> {
        let Some(editor) = app.editor() else {
            return vec![];
        };
        let mut lines = Field::ALL
            .iter()
            .map(|&field| Self::field_line(editor, field))
            .collect::<Vec<_>>();
        if let Some(err) = editor.error() {
            lines.push(format!("! {err}"));
        }
        lines
    }

    fn help(&self, _app: &App, _keymap: &KeyMap) -> String {
        "tab next field • enter save • esc cancel".to_string()
    }
}

/// Helper to construct the appropriate screen for the current mode
pub fn current_screen(mode: &Mode) -> Box<dyn Screen> {
    match mode {
        Mode::Timer => Box::new(TimerScreen),
        Mode::Editing(_) => Box::new(EditorScreen),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Session, SessionEvent};

    #[test]
    fn timer_screen_idle() {
        let app = App::default();
        let screen = current_screen(&app.mode);
        assert_eq!(screen.body(&app), vec!["START", "Time: 25:00", "Round: 0"]);
        assert_eq!(
            screen.help(&app, &KeyMap::default()),
            "s start • r reset • c change timer value • q quit"
        );
    }

    #[test]
    fn timer_screen_running_offers_stop() {
        let (session, _) = Session::default().apply(SessionEvent::Start);
        let app = App::new(session);
        let help = TimerScreen.help(&app, &KeyMap::default());
        assert!(help.starts_with("p stop"));
        assert_eq!(TimerScreen.body(&app)[0], "WORK");
    }

    #[test]
    fn editor_screen_marks_focus_and_error() {
        let mut app = App::default();
        let mut editor = DurationEditor::new(app.session.durations());
        editor.apply(crate::editor::EditorCommand::Input('x'));
        editor.apply(crate::editor::EditorCommand::Commit);
        app.mode = Mode::Editing(editor);

        let body = current_screen(&app.mode).body(&app);
        assert_eq!(body[0], "> Work: 25x_ min");
        assert_eq!(body[1], "  Short break: 5 min");
        assert_eq!(body[2], "  Long break: 15 min");
        assert_eq!(body[3], "! Work: '25x' is not a whole number");
    }
}
