use ratatui::Frame;
use timeboxer::{app::App, Phase};

use crate::ui::{render_completed, render_editor, render_session, render_setup};

/// A UI Screen boundary: responsible for rendering one view
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Roster entry and timer presets
pub struct SetupScreen;

impl Screen for SetupScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        let area = f.area();
        render_setup(app, area, f.buffer_mut());
    }
}

/// Custom duration sheet drawn over the setup screen
pub struct DurationEditorScreen;

impl Screen for DurationEditorScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        let area = f.area();
        render_setup(app, area, f.buffer_mut());
        if let Some(editor) = &app.editor {
            render_editor(editor, area, f.buffer_mut());
        }
    }
}

/// Current participant, countdown and who is left
pub struct SessionScreen;

impl Screen for SessionScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        let area = f.area();
        render_session(app, area, f.buffer_mut());
    }
}

pub struct CompletedScreen;

impl Screen for CompletedScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        let area = f.area();
        render_completed(app, area, f.buffer_mut());
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(app: &App) -> Box<dyn Screen> {
    match (app.session.phase(), app.editor.is_some()) {
        (Phase::NotStarted, true) => Box::new(DurationEditorScreen),
        (Phase::NotStarted, false) => Box::new(SetupScreen),
        (Phase::InProgress, _) => Box::new(SessionScreen),
        (Phase::Completed, _) => Box::new(CompletedScreen),
    }
}
