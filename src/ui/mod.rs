mod catalog;
mod detail;
mod filters;
mod help;

use crate::app::{App, Route};
use ratatui::Frame;

/// Top-level render dispatch.
pub fn render(app: &mut App, frame: &mut Frame) {
    match app.route {
        Route::Catalog => catalog::render(app, frame),
        Route::Game { .. } => detail::render(app, frame),
    }

    // Render help overlay on top if active
    if app.show_help {
        help::render(frame);
    }
}
