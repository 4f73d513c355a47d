//! Status bar widget.
//!
//! Renders the displayed view kind, the last status message, and the
//! position of the displayed view in the stack.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use crate::view::View;

/// Separator character for status bar segments.
const SEG_SEPARATOR: char = '\u{2502}';

/// Status bar widget.
pub struct StatusBar<'a> {
    /// Status message.
    message: &'a str,
    /// Badge text for the displayed view.
    mode: &'static str,
    /// Badge color for the displayed view.
    mode_color: Color,
    /// 1-based position and stack length.
    position: Option<(usize, usize)>,
}

impl<'a> StatusBar<'a> {
    /// Creates a status bar for the displayed view.
    #[must_use]
    pub fn new(view: &View) -> Self {
        let (mode, mode_color) = match view {
            View::List(_) => ("LIST", Color::Blue),
            View::Static(_) => ("INSPECT", Color::Magenta),
            View::Streaming(_) => ("LOGS", Color::Green),
        };
        Self {
            message: "",
            mode,
            mode_color,
            position: None,
        }
    }

    /// Sets the status message.
    #[must_use]
    pub fn message(mut self, message: &'a str) -> Self {
        self.message = message;
        self
    }

    /// Sets the displayed position (0-based) and the stack length.
    #[must_use]
    pub fn position(mut self, index: usize, len: usize) -> Self {
        self.position = Some((index + 1, len));
        self
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let bg_style = Style::default().bg(Color::Rgb(30, 30, 40)).fg(Color::White);
        buf.set_style(Rect::new(area.x, area.y, area.width, 1), bg_style);

        let right_edge = area.x + area.width;
        let badge = format!("  {}  ", self.mode);
        let badge_style = Style::default().bg(self.mode_color).fg(Color::White);
        let (mut x, _) = buf.set_stringn(area.x, area.y, &badge, area.width as usize, badge_style);

        if x < right_edge {
            buf.set_stringn(
                x,
                area.y,
                SEG_SEPARATOR.to_string(),
                1,
                Style::default().fg(Color::DarkGray).bg(Color::Rgb(30, 30, 40)),
            );
            x += 1;
        }

        let right = self
            .position
            .map(|(pos, len)| format!("{} view {}/{} ", SEG_SEPARATOR, pos, len))
            .unwrap_or_default();
        let right_width = right.width() as u16;

        // Message gets whatever the position segment leaves
        let center_end = right_edge.saturating_sub(right_width);
        if x < center_end && !self.message.is_empty() {
            let text = format!(" {}", self.message);
            let room = (center_end - x) as usize;
            if text.width() > room && room > 1 {
                buf.set_stringn(x, area.y, &text, room - 1, bg_style);
                buf.set_stringn(center_end - 1, area.y, "\u{2026}", 1, bg_style);
            } else {
                buf.set_stringn(x, area.y, &text, room, bg_style);
            }
        }

        if right_width > 0 && right_width < area.width {
            buf.set_stringn(center_end, area.y, &right, right_width as usize, bg_style);
        }
    }
}
