//! The object list.

use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Padding, Widget},
};

use super::{KeyOutcome, ViewAction, ViewId};
use crate::app::input_traits::ListSelectable;
use crate::docker::{CellKind, DomainObject, Row, render_row};

/// Tab title of the list view.
pub const LIST_TITLE: &str = "docker";

/// An object together with its rendered row.
#[derive(Debug, Clone)]
pub struct ListRow {
    /// The object behind the row.
    pub object: DomainObject,
    /// Cells shown for it.
    pub row: Row,
}

/// Selectable list of images and containers.
#[derive(Debug)]
pub struct ListView {
    id: ViewId,
    rows: Vec<ListRow>,
    selected: usize,
}

impl ListView {
    /// Builds the list, rendering every row against `now`.
    #[must_use]
    pub fn new(objects: Vec<DomainObject>, now: DateTime<Utc>) -> Self {
        let rows = objects
            .into_iter()
            .map(|object| {
                let row = render_row(&object, now);
                ListRow { object, row }
            })
            .collect();

        Self {
            id: ViewId::next(),
            rows,
            selected: 0,
        }
    }

    /// Returns the view identity.
    #[must_use]
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Returns the tab title.
    #[must_use]
    pub fn title(&self) -> &str {
        LIST_TITLE
    }

    /// Returns the rows.
    #[must_use]
    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the selected row index.
    #[must_use]
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Returns the selected object.
    #[must_use]
    pub fn selected(&self) -> Option<&DomainObject> {
        self.rows.get(self.selected).map(|r| &r.object)
    }

    /// Selects a row, clamped to the list.
    pub fn select(&mut self, index: usize) {
        self.selected = index.min(self.rows.len().saturating_sub(1));
    }

    /// Handles the list's own keys: `i` inspects, `l` opens logs.
    pub fn handle_key(&mut self, key: &KeyEvent) -> KeyOutcome {
        if key.modifiers != KeyModifiers::NONE {
            return KeyOutcome::Unhandled;
        }

        match key.code {
            KeyCode::Char('i') => match self.selected() {
                Some(object) => KeyOutcome::Action(ViewAction::Inspect(object.clone())),
                None => KeyOutcome::Consumed,
            },
            KeyCode::Char('l') => match self.selected() {
                Some(DomainObject::Container(container)) => {
                    KeyOutcome::Action(ViewAction::Logs(container.clone()))
                }
                // Images have no logs
                Some(DomainObject::Image(_)) | None => KeyOutcome::Consumed,
            },
            _ => KeyOutcome::Unhandled,
        }
    }

    /// Paints the list.
    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" Images & containers ({}) ", self.rows.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if self.rows.is_empty() {
            buf.set_stringn(
                inner.x,
                inner.y,
                "No images or containers found",
                inner.width as usize,
                Style::default().fg(Color::DarkGray),
            );
            return;
        }

        // Keep the selection on screen
        let height = inner.height as usize;
        let offset = self.selected.saturating_sub(height - 1);

        for (line, (idx, entry)) in self
            .rows
            .iter()
            .enumerate()
            .skip(offset)
            .take(height)
            .enumerate()
        {
            let y = inner.y + line as u16;
            let is_selected = idx == self.selected;
            let base = if is_selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::REVERSED | Modifier::BOLD)
            } else {
                Style::default()
            };

            if is_selected {
                buf.set_style(Rect::new(inner.x, y, inner.width, 1), base);
            }

            let mut x = inner.x;
            for (cell, width) in entry.row.cells.iter().zip(entry.row.layout(inner.width)) {
                if width == 0 {
                    continue;
                }
                let style = if is_selected {
                    base
                } else {
                    match cell.kind {
                        CellKind::Id => Style::default().fg(Color::White),
                        CellKind::Detail => Style::default().fg(Color::LightRed),
                    }
                };
                // Leave a one-cell gap between columns
                let text_width = width.saturating_sub(1).max(1) as usize;
                buf.set_stringn(x, y, &cell.text, text_width, style);
                x += width;
            }
        }
    }
}

impl ListSelectable for ListView {
    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn select_next(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    fn select_first(&mut self) {
        self.selected = 0;
    }

    fn select_last(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }
}
