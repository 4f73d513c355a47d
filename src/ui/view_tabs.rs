//! View tab bar widget.
//!
//! One tab per open view at the top of the screen, the displayed one
//! highlighted.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use crate::view::View;

/// Longest title shown in a tab before it is cut.
const MAX_TAB_TITLE: usize = 24;

/// View tab bar widget.
pub struct ViewTabBar<'a> {
    views: &'a [View],
    current: usize,
}

impl<'a> ViewTabBar<'a> {
    /// Creates a tab bar for `views` with `current` displayed.
    #[must_use]
    pub fn new(views: &'a [View], current: usize) -> Self {
        Self { views, current }
    }
}

/// Cuts `title` to at most `max` columns, marking the cut with `…`.
fn clip_title(title: &str, max: usize) -> String {
    if title.width() <= max {
        return title.to_string();
    }
    let mut out = String::new();
    for c in title.chars() {
        if out.width() + 1 >= max {
            break;
        }
        out.push(c);
    }
    out.push('\u{2026}');
    out
}

impl Widget for ViewTabBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let bg_color = Color::Black;
        buf.set_style(
            Rect::new(area.x, area.y, area.width, 1),
            Style::default().fg(Color::White).bg(bg_color),
        );

        let mut spans = Vec::new();
        for (i, view) in self.views.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(
                    "\u{2502}",
                    Style::default().fg(Color::DarkGray).bg(bg_color),
                ));
            }

            let label = format!(" {} {} ", i + 1, clip_title(view.title(), MAX_TAB_TITLE));
            let style = if i == self.current {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray).bg(bg_color)
            };
            spans.push(Span::styled(label, style));
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
