use crate::editor::DurationEditor;
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Timer,
    /// The duration editor is open; the session underneath is stopped.
    Editing(DurationEditor),
}

/// Everything the renderer needs: the live session plus which screen owns
/// the keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    pub session: Session,
    pub mode: Mode,
    pub quitting: bool,
}

impl App {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            mode: Mode::Timer,
            quitting: false,
        }
    }

    pub fn editor(&self) -> Option<&DurationEditor> {
        match &self.mode {
            Mode::Editing(editor) => Some(editor),
            Mode::Timer => None,
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(Session::default())
    }
}
