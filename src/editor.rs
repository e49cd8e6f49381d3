use std::time::Duration;

use thiserror::Error;

use crate::session::Durations;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Field {
    #[strum(serialize = "Work")]
    Work,
    #[strum(serialize = "Short break")]
    ShortBreak,
    #[strum(serialize = "Long break")]
    LongBreak,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Work, Field::ShortBreak, Field::LongBreak];

    pub fn next(self) -> Self {
        match self {
            Field::Work => Field::ShortBreak,
            Field::ShortBreak => Field::LongBreak,
            Field::LongBreak => Field::Work,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Field::Work => Field::LongBreak,
            Field::ShortBreak => Field::Work,
            Field::LongBreak => Field::ShortBreak,
        }
    }

    fn index(self) -> usize {
        match self {
            Field::Work => 0,
            Field::ShortBreak => 1,
            Field::LongBreak => 2,
        }
    }
}

/// Longest phase the editor accepts: one day.
pub const MAX_MINUTES: u64 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("{0}: enter a number of minutes")]
    Empty(Field),
    #[error("{field}: '{input}' is not a whole number")]
    NotANumber { field: Field, input: String },
    #[error("{0}: must be at least one minute")]
    NotPositive(Field),
    #[error("{0}: at most {max} minutes", max = MAX_MINUTES)]
    TooLarge(Field),
}

impl EditorError {
    pub fn field(&self) -> Field {
        match self {
            EditorError::Empty(field)
            | EditorError::NotPositive(field)
            | EditorError::TooLarge(field) => *field,
            EditorError::NotANumber { field, .. } => *field,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    NextField,
    PrevField,
    Input(char),
    Backspace,
    Commit,
    Cancel,
}

/// What the editor asks its owner to do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorOutcome {
    /// Keep editing.
    Pending,
    /// All fields are valid; replace the session with these durations.
    Committed(Durations),
    /// Drop the edits and return to the previous session.
    Cancelled,
}

/// Transient editor for the three configured durations, in whole minutes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationEditor {
    focus: Field,
    inputs: [String; 3],
    error: Option<EditorError>,
}

impl DurationEditor {
    /// Opens the editor pre-filled with the given durations.
    pub fn new(current: &Durations) -> Self {
        let minutes = |d: Duration| (d.as_secs() / 60).to_string();
        Self {
            focus: Field::Work,
            inputs: [
                minutes(current.work),
                minutes(current.short_break),
                minutes(current.long_break),
            ],
            error: None,
        }
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn input(&self, field: Field) -> &str {
        &self.inputs[field.index()]
    }

    pub fn error(&self) -> Option<&EditorError> {
        self.error.as_ref()
    }

    pub fn apply(&mut self, command: EditorCommand) -> EditorOutcome {
        match command {
            EditorCommand::NextField => self.focus = self.focus.next(),
            EditorCommand::PrevField => self.focus = self.focus.prev(),
            EditorCommand::Input(c) => {
                if !c.is_control() {
                    self.inputs[self.focus.index()].push(c);
                }
            }
            EditorCommand::Backspace => {
                self.inputs[self.focus.index()].pop();
            }
            EditorCommand::Commit => match self.validate() {
                Ok(durations) => {
                    self.error = None;
                    return EditorOutcome::Committed(durations);
                }
                Err(err) => {
                    self.focus = err.field();
                    self.error = Some(err);
                }
            },
            EditorCommand::Cancel => return EditorOutcome::Cancelled,
        }
        EditorOutcome::Pending
    }

    /// Parses every field without touching the editor state.
    pub fn validate(&self) -> Result<Durations, EditorError> {
        let work = self.parse_field(Field::Work)?;
        let short_break = self.parse_field(Field::ShortBreak)?;
        let long_break = self.parse_field(Field::LongBreak)?;
        Ok(Durations::from_minutes(work, short_break, long_break))
    }

    fn parse_field(&self, field: Field) -> Result<u64, EditorError> {
        let raw = self.input(field).trim();
        if raw.is_empty() {
            return Err(EditorError::Empty(field));
        }
        let minutes: u64 = raw.parse().map_err(|_| EditorError::NotANumber {
            field,
            input: raw.to_string(),
        })?;
        if minutes == 0 {
            return Err(EditorError::NotPositive(field));
        }
        if minutes > MAX_MINUTES {
            return Err(EditorError::TooLarge(field));
        }
        Ok(minutes)
    }
}
