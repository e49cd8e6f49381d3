pub mod screen;

use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Text},
    widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap},
};

use crate::{app::App, keymap::KeyMap, timer::CountdownTimer};

const PLAIN_FG: Color = Color::Rgb(0xc2, 0xa8, 0xc2);
const FRAMED_BG: Color = Color::Rgb(0x74, 0xe2, 0x91);
const HELP_FG: Color = Color::Rgb(0x62, 0x62, 0x62);

const FRAMED_WIDTH: u16 = 50;
const FRAMED_BOX_WIDTH: u16 = 30;

/// How the session is drawn. The content is identical; only the chrome differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStyle {
    /// Inline below the prompt, a single rounded box.
    Plain,
    /// Alternate screen, centred title and a filled box.
    #[default]
    Framed,
}

impl RenderStyle {
    /// Rows the inline viewport needs for the plain style.
    pub const INLINE_HEIGHT: u16 = 10;

    pub fn uses_alternate_screen(&self) -> bool {
        matches!(self, RenderStyle::Framed)
    }
}

/// `MM:SS`, with minutes allowed to grow past 59.
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// An expired timer nobody has reset yet reads "All done!".
pub fn timer_text(timer: &CountdownTimer) -> String {
    if timer.timed_out() {
        "All done!".to_string()
    } else {
        format_remaining(timer.remaining())
    }
}

/// Plain-text rendering of the whole view.
pub fn render_text(app: &App, keymap: &KeyMap) -> String {
    let screen = screen::current_screen(&app.mode);
    let mut lines = screen.body(app);
    lines.push(String::new());
    lines.push(screen.help(app, keymap));
    lines.join("\n")
}

/// Ratatui widget for one frame
pub struct View<'a> {
    pub app: &'a App,
    pub keymap: &'a KeyMap,
    pub style: RenderStyle,
}

impl<'a> View<'a> {
    pub fn new(app: &'a App, keymap: &'a KeyMap, style: RenderStyle) -> Self {
        Self { app, keymap, style }
    }
}

impl Widget for View<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let screen = screen::current_screen(&self.app.mode);
        let body = screen.body(self.app);
        let help = screen.help(self.app, self.keymap);

        match self.style {
            RenderStyle::Plain => render_plain(&body, &help, area, buf),
            RenderStyle::Framed => render_framed(screen.title(), &body, &help, area, buf),
        }
    }
}

fn render_plain(body: &[String], help: &str, area: Rect, buf: &mut Buffer) {
    let mut lines: Vec<Line> = body.iter().map(|l| Line::raw(l.as_str())).collect();
    lines.push(Line::raw(""));
    lines.push(Line::styled(help, Style::default().fg(HELP_FG)));

    let width = lines.iter().map(|l| l.width()).max().unwrap_or(0) as u16 + 6;
    let height = lines.len() as u16 + 4;
    let rect = Rect::new(area.x, area.y, width.min(area.width), height.min(area.height));

    Paragraph::new(Text::from(lines))
        .style(Style::default().fg(PLAIN_FG))
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .padding(Padding::new(2, 2, 1, 1)),
        )
        .render(rect, buf);
}

fn render_framed(title: &str, body: &[String], help: &str, area: Rect, buf: &mut Buffer) {
    let box_height = body.len() as u16 + 8;
    let outer = centered(area, FRAMED_WIDTH, box_height + 4);

    let [title_area, box_row, help_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(box_height),
        Constraint::Length(2),
    ])
    .areas(outer);

    Paragraph::new(title)
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .render(title_area, buf);

    let box_area = centered(box_row, FRAMED_BOX_WIDTH, box_height);
    let text: Vec<Line> = body.iter().map(|l| Line::raw(l.as_str())).collect();
    Paragraph::new(Text::from(text))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(
            Style::default()
                .fg(Color::White)
                .bg(FRAMED_BG)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .padding(Padding::new(1, 1, 3, 3)),
        )
        .render(box_area, buf);

    Paragraph::new(Line::raw(help))
        .alignment(Alignment::Center)
        .style(Style::default().fg(HELP_FG))
        .render(help_area, buf);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
