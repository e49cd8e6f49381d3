use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::editor::EditorCommand;
use crate::session::SessionEvent;

/// One key press pattern: a code plus the modifiers that must be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Key {
    pub const fn plain(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::NONE,
        }
    }

    pub const fn ctrl(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
        }
    }

    fn matches(&self, event: &KeyEvent) -> bool {
        // Shift is implied by the character itself, so it is ignored here
        let mods = event.modifiers.difference(KeyModifiers::SHIFT);
        event.code == self.code && mods == self.modifiers
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    keys: Vec<Key>,
    pub help_key: &'static str,
    pub help_desc: &'static str,
}

impl KeyBinding {
    pub fn new(keys: Vec<Key>, help_key: &'static str, help_desc: &'static str) -> Self {
        Self {
            keys,
            help_key,
            help_desc,
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.keys.iter().any(|k| k.matches(event))
    }
}

/// Key bindings of the timer screen. Built once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    pub start: KeyBinding,
    pub stop: KeyBinding,
    pub reset: KeyBinding,
    pub change: KeyBinding,
    pub quit: KeyBinding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            start: KeyBinding::new(vec![Key::plain('s')], "s", "start"),
            stop: KeyBinding::new(vec![Key::plain('p')], "p", "stop"),
            reset: KeyBinding::new(vec![Key::plain('r')], "r", "reset"),
            change: KeyBinding::new(vec![Key::plain('c')], "c", "change timer value"),
            quit: KeyBinding::new(vec![Key::plain('q'), Key::ctrl('c')], "q", "quit"),
        }
    }
}

impl KeyMap {
    /// Maps a key press on the timer screen to a session command.
    pub fn command_for(&self, key: &KeyEvent) -> Option<SessionEvent> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        // quit first so ctrl+c wins over any overlapping binding
        if self.quit.matches(key) {
            Some(SessionEvent::Quit)
        } else if self.start.matches(key) {
            Some(SessionEvent::Start)
        } else if self.stop.matches(key) {
            Some(SessionEvent::Stop)
        } else if self.reset.matches(key) {
            Some(SessionEvent::Reset)
        } else if self.change.matches(key) {
            Some(SessionEvent::Change)
        } else {
            None
        }
    }

    /// Bindings shown in the help line. Start and stop are mutually exclusive
    /// depending on whether the countdown is running.
    pub fn help_bindings(&self, running: bool) -> Vec<&KeyBinding> {
        let toggle = if running { &self.stop } else { &self.start };
        vec![toggle, &self.reset, &self.change, &self.quit]
    }

    /// Whether a key press quits from anywhere, including the editor.
    pub fn is_interrupt(&self, key: &KeyEvent) -> bool {
        Key::ctrl('c').matches(key)
    }

    /// Maps a key press inside the duration editor.
    pub fn editor_command_for(&self, key: &KeyEvent) -> Option<EditorCommand> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        match key.code {
            KeyCode::Tab | KeyCode::Down => Some(EditorCommand::NextField),
            KeyCode::BackTab | KeyCode::Up => Some(EditorCommand::PrevField),
            KeyCode::Enter => Some(EditorCommand::Commit),
            KeyCode::Esc => Some(EditorCommand::Cancel),
            KeyCode::Backspace => Some(EditorCommand::Backspace),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(EditorCommand::Input(c))
            }
            _ => None,
        }
    }
}
