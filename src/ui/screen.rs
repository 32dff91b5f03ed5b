use ratatui::Frame;

use crate::{ui::missed_keys::render_missed_keys, App, AppState};

/// A UI Screen boundary: responsible for rendering
pub trait Screen {
    fn render(&self, app: &mut App, f: &mut Frame);
}

/// Countdown, typing and results all draw through the `App` widget
pub struct SessionScreen;

impl Screen for SessionScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }
}

/// Most missed keys table
pub struct MissedKeysScreen;

impl Screen for MissedKeysScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_missed_keys(app, f);
    }
}

pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Countdown | AppState::Typing | AppState::Results => Box::new(SessionScreen),
        AppState::MissedKeys => Box::new(MissedKeysScreen),
    }
}
