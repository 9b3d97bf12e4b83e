pub mod screen;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use timeboxer::app::{App, DurationEditor, Field, Focus};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const EDITOR_WIDTH: u16 = 50;
const EDITOR_HEIGHT: u16 = 9;

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn italic() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

fn selected() -> Style {
    Style::default().patch(bold()).add_modifier(Modifier::REVERSED)
}

fn focused_border(is_focused: bool) -> Style {
    if is_focused {
        Style::default().fg(Color::Yellow)
    } else {
        dim()
    }
}

/// Lay names out as chips, wrapping on display width rather than bytes.
fn chip_lines(names: &[&str], highlight: Option<usize>, width: u16) -> Vec<Line<'static>> {
    let mut lines = vec![];
    let mut current: Vec<Span<'static>> = vec![];
    let mut used = 0usize;

    for (idx, name) in names.iter().enumerate() {
        let chip = format!(" {} ", name);
        let w = chip.width() + 1;
        if used > 0 && used + w > width as usize {
            lines.push(Line::from(std::mem::take(&mut current)));
            used = 0;
        }
        let style = if highlight == Some(idx) {
            selected()
        } else {
            Style::default().bg(Color::DarkGray).fg(Color::White)
        };
        current.push(Span::styled(chip, style));
        current.push(Span::raw(" "));
        used += w;
    }
    if !current.is_empty() {
        lines.push(Line::from(current));
    }
    lines
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn render_setup(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2), // title + description
            Constraint::Length(3), // name input
            Constraint::Min(3),    // roster
            Constraint::Length(3), // presets
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(vec![
        Line::from(Span::styled("Timeboxer", bold().fg(Color::Cyan))),
        Line::from(Span::styled(
            "Add participants and timebox their turns.",
            italic(),
        )),
    ])
    .render(chunks[0], buf);

    let input_focused = app.focus == Focus::Input && app.editor.is_none();
    let input_line = if app.input.is_empty() && !input_focused {
        Line::from(Span::styled("Enter participant name", dim()))
    } else if input_focused {
        Line::from(vec![Span::raw(app.input.clone()), Span::styled("▏", bold())])
    } else {
        Line::from(Span::raw(app.input.clone()))
    };
    Paragraph::new(input_line)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focused_border(input_focused))
                .title("Participant Name"),
        )
        .render(chunks[1], buf);

    let controls_focused = app.focus == Focus::Controls && app.editor.is_none();
    let roster_block = Block::default()
        .borders(Borders::ALL)
        .border_style(focused_border(controls_focused))
        .title(format!("Participants ({})", session.roster().len()));
    if session.roster().is_empty() {
        Paragraph::new(Span::styled("No participants added yet", dim()))
            .alignment(Alignment::Center)
            .block(roster_block)
            .render(chunks[2], buf);
    } else {
        let highlight = controls_focused.then_some(app.selected);
        let lines = chip_lines(
            &session.roster().names(),
            highlight,
            chunks[2].width.saturating_sub(2),
        );
        Paragraph::new(lines).block(roster_block).render(chunks[2], buf);
    }

    let mut presets: Vec<Span> = session
        .presets()
        .iter()
        .enumerate()
        .flat_map(|(idx, minutes)| {
            let style = if session.is_preset_selected(*minutes) {
                selected()
            } else {
                Style::default()
            };
            [
                Span::styled(format!("{})", idx + 1), dim()),
                Span::styled(format!(" {} ", minutes), style),
                Span::raw("  "),
            ]
        })
        .collect();
    match session.custom() {
        Some(custom) => {
            let style = if session.is_custom_selected() {
                selected()
            } else {
                Style::default()
            };
            presets.push(Span::styled("c)", dim()));
            presets.push(Span::styled(format!(" ⚙ {} ", custom.label()), style));
        }
        None => {
            presets.push(Span::styled("c)", dim()));
            presets.push(Span::raw(" Custom "));
        }
    }
    presets.push(Span::styled(
        format!("   each turn {}", session.duration().label()),
        italic(),
    ));
    Paragraph::new(Line::from(presets))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(dim())
                .title("Timer Presets (min)"),
        )
        .render(chunks[3], buf);

    let legend = if input_focused {
        "(enter) add / (tab) controls / (esc) quit"
    } else {
        "(↑↓) select / (d)elete / (1-9) preset / (c)ustom / (s)tart / (x) clear all / (tab) name / (esc) quit"
    };
    Paragraph::new(Span::styled(legend, italic()))
        .wrap(Wrap { trim: true })
        .render(chunks[4], buf);
}

pub fn render_editor(editor: &DurationEditor, area: Rect, buf: &mut Buffer) {
    let popup = centered_rect(EDITOR_WIDTH, EDITOR_HEIGHT, area);
    Clear.render(popup, buf);

    let field = |label: &'static str, value: u32, is_focused: bool| {
        let style = if is_focused { selected() } else { bold() };
        [
            Span::raw(label),
            Span::styled(format!(" {:>2} ", value), style),
            Span::raw("   "),
        ]
    };

    let mut values = vec![];
    values.extend(field("Minutes ", editor.minutes, editor.field == Field::Minutes));
    values.extend(field("Seconds ", editor.seconds, editor.field == Field::Seconds));

    let lines = vec![
        Line::from(Span::styled(
            "Customize the timer duration for each participant",
            italic(),
        )),
        Line::from(""),
        Line::from(values).alignment(Alignment::Center),
        Line::from(""),
        Line::from(Span::styled(
            "(tab) switch / (↑↓) adjust / (enter) apply / (esc) cancel",
            dim(),
        )),
    ];

    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title("Timer Settings"),
        )
        .render(popup, buf);
}

pub fn render_session(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let countdown = session.countdown();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // label
            Constraint::Length(1), // participant
            Constraint::Length(1), // progress
            Constraint::Length(1),
            Constraint::Length(1), // clock
            Constraint::Length(1), // status
            Constraint::Length(1),
            Constraint::Min(3), // remaining
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Span::styled("Current Participant", dim()))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let name = session
        .active()
        .map(|p| p.name().to_string())
        .unwrap_or_default();
    Paragraph::new(Span::styled(name, bold().fg(Color::Cyan)))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    Paragraph::new(Span::styled(
        format!(
            "Turn {} of {}",
            session.turns_taken(),
            session.roster().len()
        ),
        italic(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    let clock = session.clock_display();
    let clock_style = if countdown.is_flashing() {
        bold().fg(Color::Red)
    } else if countdown.is_running() {
        bold().fg(Color::Green)
    } else {
        bold()
    };
    let clock_text = if session.clock_visible() {
        clock
    } else {
        " ".repeat(clock.width())
    };
    Paragraph::new(Span::styled(format!("⏱ {}", clock_text), clock_style))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

    let status = if countdown.is_running() {
        Span::styled("running", Style::default().fg(Color::Green))
    } else if countdown.remaining_secs() == 0 {
        Span::styled("time's up!", bold().fg(Color::Red))
    } else {
        Span::styled("paused", dim())
    };
    Paragraph::new(status)
        .alignment(Alignment::Center)
        .render(chunks[5], buf);

    let remaining = session.remaining();
    let remaining_block = Block::default()
        .borders(Borders::ALL)
        .border_style(dim())
        .title(format!("Remaining Participants ({})", remaining.len()));
    let remaining_text = if remaining.is_empty() {
        Span::styled("No participants remaining", dim())
    } else {
        Span::raw(remaining.iter().map(|p| p.name()).join(", "))
    };
    Paragraph::new(remaining_text)
        .wrap(Wrap { trim: true })
        .block(remaining_block)
        .render(chunks[7], buf);

    Paragraph::new(Span::styled(
        "(space) start/pause / (r)eset / (n)ext participant / (e)nd session / (esc) quit",
        italic(),
    ))
    .wrap(Wrap { trim: true })
    .render(chunks[8], buf);
}

pub fn render_completed(app: &App, area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::from(Span::styled("Session Completed!", bold().fg(Color::Green))),
        Line::from(""),
        Line::from(Span::styled(
            "All participants have completed their turns.",
            dim(),
        )),
        Line::from(Span::styled(
            format!("{} turns taken", app.session.turns_taken()),
            italic(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "(enter) start new session / (esc) quit",
            italic(),
        )),
    ];
    let height = lines.len() as u16;
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(centered_rect(area.width, height, area), buf);
}
