//! Rendering methods for the App.

use ratatui::layout::{Constraint, Layout};
use ratatui::widgets::Clear;

use crate::ui::{KeyHintBar, StatusBar, ViewTabBar, hints_for};

use super::App;

impl App {
    /// Renders the application.
    pub fn render(&self, frame: &mut ratatui::Frame) {
        let area = frame.area();

        // Clear the entire frame first to prevent rendering artifacts
        frame.render_widget(Clear, area);

        let [tabs, body, status, hints] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let stack = self.dashboard.stack();
        let view = stack.current();

        frame.render_widget(ViewTabBar::new(stack.views(), stack.current_index()), tabs);
        view.render(body, frame.buffer_mut());
        frame.render_widget(
            StatusBar::new(view)
                .message(self.dashboard.status())
                .position(stack.current_index(), stack.len()),
            status,
        );
        frame.render_widget(KeyHintBar::new(hints_for(view)), hints);
    }
}
