//! Immutable, scrollable text.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::ViewId;
use crate::app::input_traits::ListSelectable;

/// A block of text that never changes after construction.
#[derive(Debug)]
pub struct StaticView {
    id: ViewId,
    title: String,
    text: String,
    line_count: usize,
    offset: usize,
}

impl StaticView {
    /// Creates a view showing `text`.
    #[must_use]
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_count = text.lines().count();
        Self {
            id: ViewId::next(),
            title: title.into(),
            text,
            line_count,
            offset: 0,
        }
    }

    /// Replaces the identity, making this view stand in for another one.
    #[must_use]
    pub fn with_id(mut self, id: ViewId) -> Self {
        self.id = id;
        self
    }

    /// Returns the view identity.
    #[must_use]
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Returns the tab title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the full text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the first visible line.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Paints the text starting at the scroll offset.
    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(
                " {} ({}/{}) ",
                self.title,
                (self.offset + 1).min(self.line_count),
                self.line_count
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let scroll = u16::try_from(self.offset).unwrap_or(u16::MAX);
        Paragraph::new(self.text.as_str())
            .block(block)
            .style(Style::default().fg(Color::White))
            .scroll((scroll, 0))
            .render(area, buf);
    }
}

impl ListSelectable for StaticView {
    fn select_prev(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    fn select_next(&mut self) {
        if self.offset + 1 < self.line_count {
            self.offset += 1;
        }
    }

    fn select_first(&mut self) {
        self.offset = 0;
    }

    fn select_last(&mut self) {
        self.offset = self.line_count.saturating_sub(1);
    }
}
