//! List row layout for Docker objects.
//!
//! Pure mapping from a `DomainObject` to the cells of one list row.
//! Nothing here talks to Docker.

use chrono::{DateTime, Duration, Utc};

use super::container::DomainObject;

/// Width of the identifier column (12 characters plus a gap).
pub const ID_COLUMN_WIDTH: u16 = 13;

/// How a column claims horizontal space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnWidth {
    /// Exactly this many cells.
    Fixed(u16),
    /// An equal share of whatever the fixed columns leave.
    Fill,
}

/// Visual role of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Identifiers and timestamps.
    Id,
    /// Names, commands, and status text.
    Detail,
}

/// One cell of a list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCell {
    /// Text to display.
    pub text: String,
    /// Column width policy.
    pub width: ColumnWidth,
    /// Visual role.
    pub kind: CellKind,
}

impl RowCell {
    fn id(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            width: ColumnWidth::Fixed(ID_COLUMN_WIDTH),
            kind: CellKind::Id,
        }
    }

    fn fill(text: impl Into<String>, kind: CellKind) -> Self {
        Self {
            text: text.into(),
            width: ColumnWidth::Fill,
            kind,
        }
    }
}

/// A rendered list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Cells from left to right.
    pub cells: Vec<RowCell>,
}

impl Row {
    /// Returns the cell texts, mostly useful for assertions.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.text.as_str()).collect()
    }

    /// Computes the width of every cell for a row of `total` cells.
    ///
    /// Fixed columns get their width (clipped to what is left); the
    /// remainder is shared equally by fill columns, the leftmost ones
    /// taking one cell each of rounding slack.
    #[must_use]
    pub fn layout(&self, total: u16) -> Vec<u16> {
        let fixed: u16 = self
            .cells
            .iter()
            .map(|c| match c.width {
                ColumnWidth::Fixed(w) => w,
                ColumnWidth::Fill => 0,
            })
            .fold(0u16, u16::saturating_add);
        let fill_count = self
            .cells
            .iter()
            .filter(|c| c.width == ColumnWidth::Fill)
            .count() as u16;

        let spare = total.saturating_sub(fixed);
        let share = if fill_count == 0 { 0 } else { spare / fill_count };
        let mut slack = if fill_count == 0 { 0 } else { spare % fill_count };

        let mut remaining = total;
        let mut widths = Vec::with_capacity(self.cells.len());
        for cell in &self.cells {
            let want = match cell.width {
                ColumnWidth::Fixed(w) => w,
                ColumnWidth::Fill => {
                    let w = share + slack.min(1);
                    slack = slack.saturating_sub(1);
                    w
                }
            };
            let w = want.min(remaining);
            remaining -= w;
            widths.push(w);
        }
        widths
    }
}

/// Builds the list row for a Docker object.
///
/// Images: `[id, names, created]`.
/// Containers: `[id, command, created, status, name]`.
#[must_use]
pub fn render_row(object: &DomainObject, now: DateTime<Utc>) -> Row {
    let created = format_relative(now, object.created());
    let cells = match object {
        DomainObject::Image(image) => vec![
            RowCell::id(image.short_id()),
            RowCell::fill(image.display_names(), CellKind::Detail),
            RowCell::fill(created, CellKind::Id),
        ],
        DomainObject::Container(container) => vec![
            RowCell::id(container.short_id()),
            RowCell::fill(container.command.clone(), CellKind::Detail),
            RowCell::fill(created, CellKind::Id),
            RowCell::fill(container.status.clone(), CellKind::Detail),
            RowCell::fill(container.name.clone(), CellKind::Detail),
        ],
    };
    Row { cells }
}

/// Formats `t` relative to `now` ("3 hours ago").
///
/// Times in the future are treated as now.
#[must_use]
pub fn format_relative(now: DateTime<Utc>, t: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(t).max(Duration::zero());

    if diff < Duration::minutes(1) {
        return "just now".to_string();
    }
    if diff < Duration::minutes(2) {
        return "a minute ago".to_string();
    }
    if diff < Duration::hours(1) {
        return format!("{} minutes ago", diff.num_minutes());
    }
    if diff < Duration::hours(2) {
        return "an hour ago".to_string();
    }
    if diff < Duration::days(1) {
        return format!("{} hours ago", diff.num_hours());
    }
    if diff < Duration::days(2) {
        return "a day ago".to_string();
    }
    let days = diff.num_days();
    if days < 30 {
        return format!("{} days ago", days);
    }
    if days < 60 {
        return "a month ago".to_string();
    }
    if days < 365 {
        return format!("{} months ago", days / 30);
    }
    if days < 730 {
        return "a year ago".to_string();
    }
    format!("{} years ago", days / 365)
}
