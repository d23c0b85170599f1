pub mod digits;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::{
    pomodoro::TimerView,
    session::{Phase, SessionKind},
    util::format_volume,
};

const TITLE: &str = " Pomodoro Timer ";
const HORIZONTAL_MARGIN: u16 = 1;

/// Full-screen timer rendering for one frame
pub struct TimerScreen<'a> {
    pub view: &'a TimerView,
    /// Extra line under the controls, e.g. why audio is off
    pub note: Option<&'a str>,
}

impl<'a> TimerScreen<'a> {
    pub fn new(view: &'a TimerView) -> Self {
        Self { view, note: None }
    }

    pub fn with_note(mut self, note: Option<&'a str>) -> Self {
        self.note = note;
        self
    }
}

fn kind_color(kind: SessionKind) -> Color {
    match kind {
        SessionKind::Work => Color::Red,
        SessionKind::Break => Color::Green,
    }
}

fn phase_style(phase: Phase) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match phase {
        Phase::Running => bold.fg(Color::Cyan),
        Phase::Paused => bold.fg(Color::Yellow),
        Phase::Stopped => bold.fg(Color::DarkGray),
    }
}

fn control(label: &str, enabled: bool) -> Span<'static> {
    let style = if enabled {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM)
    };
    Span::styled(label.to_string(), style)
}

impl Widget for TimerScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let view = self.view;
        let accent = Style::default()
            .fg(kind_color(view.kind))
            .add_modifier(Modifier::BOLD);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(TITLE)
            .title_alignment(Alignment::Center);
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(1), // kind + volume
                Constraint::Min(1),    // countdown
                Constraint::Length(1), // phase
                Constraint::Length(1), // controls
                Constraint::Length(1), // note
            ])
            .split(inner);

        let header = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[0]);
        Paragraph::new(Span::styled(view.kind.to_string().to_uppercase(), accent))
            .alignment(Alignment::Left)
            .render(header[0], buf);
        Paragraph::new(Span::styled(
            format_volume(view.volume),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Right)
        .render(header[1], buf);

        render_countdown(&view.remaining, accent, chunks[1], buf);

        Paragraph::new(Span::styled(
            view.phase.to_string().to_uppercase(),
            phase_style(view.phase),
        ))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

        let c = view.controls;
        let sep = || Span::raw("  ");
        let hints = Line::from(vec![
            control("[s] start", c.start_enabled),
            sep(),
            control("[x] stop", c.stop_enabled),
            sep(),
            control("[r] reset", true),
            sep(),
            control("[-] vol", c.volume_down_enabled),
            sep(),
            control("[+] vol", c.volume_up_enabled),
            sep(),
            control("[q] quit", true),
        ]);
        Paragraph::new(hints)
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        if let Some(note) = self.note {
            Paragraph::new(Span::styled(
                note.to_string(),
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
        }
    }
}

/// Big block digits when they fit, plain text otherwise
fn render_countdown(remaining: &str, style: Style, area: Rect, buf: &mut Buffer) {
    let width = digits::rendered_width(remaining) as u16;
    let height = digits::GLYPH_HEIGHT as u16;

    if area.width < width || area.height < height {
        let top = area.height.saturating_sub(1) / 2;
        let line = Rect::new(area.x, area.y + top, area.width, area.height.min(1));
        Paragraph::new(Span::styled(remaining.to_string(), style))
            .alignment(Alignment::Center)
            .render(line, buf);
        return;
    }

    let top = (area.height - height) / 2;
    let lines: Vec<Line> = digits::render_lines(remaining)
        .into_iter()
        .map(|row| Line::from(Span::styled(row, style)))
        .collect();
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(Rect::new(area.x, area.y + top, area.width, height), buf);
}
