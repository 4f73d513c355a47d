//! Context-aware key hint bar widget.
//!
//! Renders styled key badges with descriptions at the bottom of the screen.
//! The hints depend on the kind of the displayed view.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use crate::view::View;

/// Style variant for a key hint badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyHintStyle {
    /// Default gray badge.
    #[default]
    Normal,
    /// Cyan badge for the view's own actions.
    Highlighted,
    /// Red badge for closing and quitting.
    Danger,
}

impl KeyHintStyle {
    /// Returns the background color for the key badge.
    #[must_use]
    pub const fn badge_bg(&self) -> Color {
        match self {
            Self::Normal => Color::DarkGray,
            Self::Highlighted => Color::Cyan,
            Self::Danger => Color::Red,
        }
    }

    /// Returns the foreground color for the key badge text.
    #[must_use]
    pub const fn badge_fg(&self) -> Color {
        match self {
            Self::Normal | Self::Danger => Color::White,
            Self::Highlighted => Color::Black,
        }
    }
}

/// A single key hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyHint {
    /// Key text (e.g., "i").
    pub key: &'static str,
    /// Description of the action (e.g., "Inspect").
    pub description: &'static str,
    /// Visual style for the badge.
    pub style: KeyHintStyle,
}

impl KeyHint {
    /// Creates a new key hint with Normal style.
    #[must_use]
    pub const fn new(key: &'static str, description: &'static str) -> Self {
        Self::styled(key, description, KeyHintStyle::Normal)
    }

    /// Creates a new key hint with a specific style.
    #[must_use]
    pub const fn styled(key: &'static str, description: &'static str, style: KeyHintStyle) -> Self {
        Self {
            key,
            description,
            style,
        }
    }

    /// Display width: " key " badge plus " desc".
    fn display_width(&self) -> usize {
        self.key.width() + 2 + self.description.width() + 1
    }
}

const NAVIGATION: [KeyHint; 2] = [KeyHint::new("j/k", "Move"), KeyHint::new("p/n", "Prev/Next")];

const CLOSE: KeyHint = KeyHint::styled("x", "Close", KeyHintStyle::Danger);

const QUIT: KeyHint = KeyHint::styled("q", "Quit", KeyHintStyle::Danger);

/// Returns the hints for the displayed view.
///
/// The list view cannot be closed, so it gets no `x` hint.
#[must_use]
pub fn hints_for(view: &View) -> Vec<KeyHint> {
    let mut hints = match view {
        View::List(_) => vec![
            KeyHint::styled("i", "Inspect", KeyHintStyle::Highlighted),
            KeyHint::styled("l", "Logs", KeyHintStyle::Highlighted),
        ],
        View::Static(_) => vec![KeyHint::new("PgUp/PgDn", "Scroll")],
        View::Streaming(_) => vec![KeyHint::new("End", "Follow")],
    };
    hints.extend(NAVIGATION);
    if !view.is_list() {
        hints.push(CLOSE);
    }
    hints.push(QUIT);
    hints
}

/// Divider between hints.
const DIVIDER: &str = " \u{2502} ";

/// Row of key badges separated by thin dividers.
///
/// Hints that do not fit are replaced by a `…+N` indicator.
pub struct KeyHintBar {
    hints: Vec<KeyHint>,
}

impl KeyHintBar {
    /// Creates a new key hint bar with the given hints.
    #[must_use]
    pub fn new(hints: Vec<KeyHint>) -> Self {
        Self { hints }
    }

    /// Returns how many hints fit in `available` cells, keeping room for
    /// the overflow indicator when some are dropped.
    fn fitting(&self, available: usize) -> usize {
        let width_of = |count: usize| -> usize {
            self.hints
                .iter()
                .take(count)
                .enumerate()
                .map(|(i, h)| (if i == 0 { 1 } else { DIVIDER.width() }) + h.display_width())
                .sum()
        };

        let mut count = self.hints.len();
        while count > 0 {
            let dropped = self.hints.len() - count;
            let indicator = if dropped > 0 {
                format!(" \u{2026}+{}", dropped).width()
            } else {
                0
            };
            if width_of(count) + indicator <= available {
                break;
            }
            count -= 1;
        }
        count
    }
}

impl Widget for KeyHintBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let bar_style = Style::default().bg(Color::Black).fg(Color::DarkGray);
        buf.set_style(Rect::new(area.x, area.y, area.width, 1), bar_style);

        let right = area.x + area.width;
        let fits = self.fitting(area.width as usize);
        let mut x = area.x + 1;

        for (i, hint) in self.hints.iter().take(fits).enumerate() {
            if i > 0 {
                x = put(buf, x, area.y, right, DIVIDER, bar_style);
            }

            let badge = Style::default()
                .bg(hint.style.badge_bg())
                .fg(hint.style.badge_fg())
                .add_modifier(Modifier::BOLD);
            x = put(buf, x, area.y, right, &format!(" {} ", hint.key), badge);

            let desc = Style::default().fg(Color::Gray).bg(Color::Black);
            x = put(buf, x, area.y, right, &format!(" {}", hint.description), desc);
        }

        let dropped = self.hints.len() - fits;
        if dropped > 0 {
            put(buf, x, area.y, right, &format!(" \u{2026}+{}", dropped), bar_style);
        }
    }
}

/// Writes `text` at `x` without crossing `right`. Returns the next column.
fn put(buf: &mut Buffer, x: u16, y: u16, right: u16, text: &str, style: Style) -> u16 {
    if x >= right {
        return x;
    }
    let (next, _) = buf.set_stringn(x, y, text, (right - x) as usize, style);
    next
}
