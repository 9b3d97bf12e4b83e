use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::countdown::{TimerConfig, MAX_MINUTES, MAX_SECONDS};
use crate::runtime::{AppEvent, Step};
use crate::session::Session;
use crate::turns::Phase;
use crate::util::parse_clamped;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Input,
    Controls,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field {
    Minutes,
    Seconds,
}

/// The custom duration sheet. Values are clamped on every keystroke.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationEditor {
    pub minutes: u32,
    pub seconds: u32,
    pub field: Field,
}

impl DurationEditor {
    fn new(current: TimerConfig) -> Self {
        Self {
            minutes: current.minutes,
            seconds: current.seconds,
            field: Field::Minutes,
        }
    }

    fn focused(&mut self) -> (&mut u32, u32) {
        match self.field {
            Field::Minutes => (&mut self.minutes, MAX_MINUTES),
            Field::Seconds => (&mut self.seconds, MAX_SECONDS),
        }
    }

    fn push_digit(&mut self, d: char) {
        let (value, max) = self.focused();
        *value = parse_clamped(&format!("{}{}", value, d), max);
    }

    fn pop_digit(&mut self) {
        let (value, _) = self.focused();
        *value /= 10;
    }

    fn step(&mut self, up: bool) {
        let (value, max) = self.focused();
        *value = if up {
            (*value + 1).min(max)
        } else {
            value.saturating_sub(1)
        };
    }

    fn switch_field(&mut self) {
        self.field = match self.field {
            Field::Minutes => Field::Seconds,
            Field::Seconds => Field::Minutes,
        };
    }
}

/// Whether the loop keeps going after an event.
#[derive(Debug, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Screen state around a [`Session`]. Turns key presses into session calls;
/// the binary only draws it.
pub struct App {
    pub session: Session,
    pub focus: Focus,
    pub input: String,
    pub selected: usize,
    pub editor: Option<DurationEditor>,
}

impl App {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            focus: Focus::Input,
            input: String::new(),
            selected: 0,
            editor: None,
        }
    }

    /// Time passes before the key lands, so an expiry that happened while
    /// waiting is already visible to the handler.
    pub fn on_step(&mut self, step: Step) -> Flow {
        self.on_tick(step.elapsed);
        match step.event {
            AppEvent::Key(key) => self.on_key(key),
            AppEvent::Resize | AppEvent::Tick => Flow::Continue,
        }
    }

    pub fn on_tick(&mut self, elapsed: Duration) {
        self.session.advance_clock(elapsed);
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        if let Some(editor) = self.editor.as_mut() {
            match key.code {
                KeyCode::Esc => self.editor = None,
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                    editor.switch_field()
                }
                KeyCode::Char(c) if c.is_ascii_digit() => editor.push_digit(c),
                KeyCode::Backspace => editor.pop_digit(),
                KeyCode::Up => editor.step(true),
                KeyCode::Down => editor.step(false),
                KeyCode::Enter => {
                    let (m, s) = (editor.minutes, editor.seconds);
                    self.session.apply_custom(m, s);
                    self.editor = None;
                }
                _ => {}
            }
            return Flow::Continue;
        }

        if key.code == KeyCode::Esc {
            return Flow::Quit;
        }

        match self.session.phase() {
            Phase::NotStarted => match self.focus {
                Focus::Input => self.on_input_key(key),
                Focus::Controls => self.on_controls_key(key),
            },
            Phase::InProgress => match key.code {
                KeyCode::Char(' ') => {
                    self.session.toggle_timer();
                }
                KeyCode::Char('r') => {
                    self.session.reset_timer();
                }
                KeyCode::Char('n') | KeyCode::Right => {
                    self.session.advance();
                }
                KeyCode::Char('e') => {
                    self.end_session();
                }
                _ => {}
            },
            Phase::Completed => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char('n')) {
                    self.end_session();
                }
            }
        }
        Flow::Continue
    }

    fn on_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                if self.session.add_participant(&self.input) {
                    self.input.clear();
                    self.selected = self.session.roster().len() - 1;
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Tab | KeyCode::Down => self.focus = Focus::Controls,
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    fn on_controls_key(&mut self, key: KeyEvent) {
        let len = self.session.roster().len();
        match key.code {
            KeyCode::Tab | KeyCode::Char('a') => self.focus = Focus::Input,
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < len {
                    self.selected += 1;
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                let name = self
                    .session
                    .roster()
                    .participants()
                    .get(self.selected)
                    .map(|p| p.name().to_string());
                if let Some(name) = name {
                    self.session.remove_participant(&name);
                    self.clamp_selection();
                }
            }
            KeyCode::Char('x') => {
                self.session.clear_all();
                self.selected = 0;
            }
            KeyCode::Char('c') => {
                self.editor = Some(DurationEditor::new(self.session.duration()));
            }
            KeyCode::Char('s') | KeyCode::Enter => {
                self.session.start_session();
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let idx = c.to_digit(10).unwrap_or(0) as usize;
                let preset = idx
                    .checked_sub(1)
                    .and_then(|i| self.session.presets().get(i).copied());
                if let Some(minutes) = preset {
                    self.session.select_preset(minutes);
                }
            }
            _ => {}
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.session.roster().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    fn end_session(&mut self) {
        self.session.end_session();
        self.focus = Focus::Controls;
        self.clamp_selection();
    }
}
