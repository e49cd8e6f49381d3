use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
    tty::IsTty,
};
use log::{info, warn};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal, TerminalOptions, Viewport,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use tomato::{
    app::App,
    app_dirs::AppDirs,
    keymap::KeyMap,
    logging,
    notify::{DesktopNotifier, Notifier, NullNotifier, DEFAULT_SOUND},
    runtime::{CrosstermEventSource, Dispatcher, ThreadTicker},
    session::{Durations, Session},
    ui::{RenderStyle, View},
};

const WINDOW_TITLE: &str = "Pomodoro CLI App.";

/// pomodoro timer in your terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal pomodoro timer: 25 minutes of work, 5 minute breaks and a 15 minute break after every fourth round, with a desktop notification at each change. Press 'c' while running to change the durations."
)]
pub struct Cli {
    /// how the timer is drawn
    #[clap(long, value_enum, default_value_t = Style::Framed)]
    style: Style,

    /// do not play a sound on phase changes
    #[clap(long)]
    mute: bool,

    /// sound file played on phase changes
    #[clap(long, default_value = DEFAULT_SOUND)]
    sound: PathBuf,

    /// disable desktop notifications and sound entirely
    #[clap(long)]
    no_notify: bool,

    /// log file (default: ~/.local/state/tomato/tomato.log); level from RUST_LOG
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// milliseconds per countdown tick
    #[clap(long, default_value_t = 1000, hide = true, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum Style {
    Plain,
    Framed,
}

impl From<Style> for RenderStyle {
    fn from(style: Style) -> Self {
        match style {
            Style::Plain => RenderStyle::Plain,
            Style::Framed => RenderStyle::Framed,
        }
    }
}

impl Cli {
    fn notifier(&self) -> Box<dyn Notifier> {
        if self.no_notify {
            Box::new(NullNotifier)
        } else {
            let sound = (!self.mute).then(|| self.sound.clone());
            Box::new(DesktopNotifier::new(sound))
        }
    }

    fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    fn log_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(AppDirs::log_path)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = cli.log_path() {
        // Last chance to use stderr before raw mode; the timer runs without logs
        if let Err(err) = logging::init_file_logger(&path) {
            eprintln!("tomato: logging disabled, cannot open {}: {err}", path.display());
        }
    }

    let style = RenderStyle::from(cli.style);
    info!("starting with style {}", cli.style);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    let viewport = if style.uses_alternate_screen() {
        execute!(stdout, EnterAlternateScreen)?;
        Viewport::Fullscreen
    } else {
        Viewport::Inline(RenderStyle::INLINE_HEIGHT)
    };
    execute!(stdout, SetTitle(WINDOW_TITLE))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::with_options(backend, TerminalOptions { viewport })?;

    let result = start_tui(&mut terminal, &cli, style);
    if let Err(err) = &result {
        warn!("event loop failed: {err}");
    }

    disable_raw_mode()?;
    if style.uses_alternate_screen() {
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    }
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    cli: &Cli,
    style: RenderStyle,
) -> Result<(), Box<dyn Error>> {
    let events = CrosstermEventSource::new();
    let ticker = ThreadTicker::new(events.sender());
    let session = Session::new(Durations::default(), cli.tick_interval());
    let keymap = KeyMap::default();

    let mut dispatcher =
        Dispatcher::new(App::new(session), keymap.clone(), cli.notifier(), ticker);
    dispatcher.run(&events, |app| {
        terminal
            .draw(|f| f.render_widget(View::new(app, &keymap, style), f.area()))
            .map(|_| ())
    })?;

    info!("quit");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["tomato"]);

        assert_eq!(cli.style, Style::Framed);
        assert!(!cli.mute);
        assert!(!cli.no_notify);
        assert_eq!(cli.sound, PathBuf::from("sound.wav"));
        assert_eq!(cli.log_file, None);
        assert_eq!(cli.tick_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_cli_plain_style() {
        let cli = Cli::parse_from(["tomato", "--style", "plain"]);
        assert_eq!(RenderStyle::from(cli.style), RenderStyle::Plain);
    }

    #[test]
    fn test_cli_rejects_unknown_style() {
        let result = Cli::try_parse_from(["tomato", "--style", "fancy"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_zero_tick() {
        let result = Cli::try_parse_from(["tomato", "--tick-ms", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_log_file_override() {
        let cli = Cli::parse_from(["tomato", "--log-file", "/tmp/t.log"]);
        assert_eq!(cli.log_path(), Some(PathBuf::from("/tmp/t.log")));
    }

    #[test]
    fn test_cli_sound_options() {
        let cli = Cli::parse_from(["tomato", "--sound", "bell.wav", "--mute"]);
        assert!(cli.mute);
        assert_eq!(cli.sound, PathBuf::from("bell.wav"));
    }

    #[test]
    fn test_style_display() {
        assert_eq!(Style::Plain.to_string(), "Plain");
        assert_eq!(Style::Framed.to_string(), "Framed");
    }

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }
}
