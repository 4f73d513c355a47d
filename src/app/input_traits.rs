//! Shared navigation keys for list-like views.
//!
//! Every view moves a cursor or a scroll offset with the same keys; the
//! view provides the movement, this module maps keys onto it.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Rows moved by PageUp/PageDown.
pub const PAGE_SIZE: usize = 10;

/// Trait for list-based selection navigation.
///
/// Implementors move a selection (or a scroll offset) up, down, to the
/// first row, and to the last row.
pub trait ListSelectable {
    /// Moves to the previous row (up).
    fn select_prev(&mut self);

    /// Moves to the next row (down).
    fn select_next(&mut self);

    /// Moves to the first row.
    fn select_first(&mut self);

    /// Moves to the last row.
    fn select_last(&mut self);

    /// Moves up by one page.
    fn page_up(&mut self) {
        for _ in 0..PAGE_SIZE {
            self.select_prev();
        }
    }

    /// Moves down by one page.
    fn page_down(&mut self) {
        for _ in 0..PAGE_SIZE {
            self.select_next();
        }
    }
}

/// Handles Vim-style navigation keys (j/k) and arrow keys.
///
/// Returns `true` if the key was handled.
pub fn handle_vim_navigation<T: ListSelectable + ?Sized>(
    selectable: &mut T,
    key: &KeyEvent,
) -> bool {
    if key.modifiers != KeyModifiers::NONE {
        return false;
    }

    match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            selectable.select_next();
            true
        }
        KeyCode::Up | KeyCode::Char('k') => {
            selectable.select_prev();
            true
        }
        _ => false,
    }
}

/// Handles Home/End and PageUp/PageDown.
///
/// Returns `true` if the key was handled.
pub fn handle_jump_navigation<T: ListSelectable + ?Sized>(
    selectable: &mut T,
    key: &KeyEvent,
) -> bool {
    if key.modifiers != KeyModifiers::NONE {
        return false;
    }

    match key.code {
        KeyCode::Home => selectable.select_first(),
        KeyCode::End => selectable.select_last(),
        KeyCode::PageUp => selectable.page_up(),
        KeyCode::PageDown => selectable.page_down(),
        _ => return false,
    }
    true
}

/// Handles all list navigation keys (Vim, arrows, Home/End, paging).
pub fn handle_list_navigation<T: ListSelectable + ?Sized>(
    selectable: &mut T,
    key: &KeyEvent,
) -> bool {
    handle_vim_navigation(selectable, key) || handle_jump_navigation(selectable, key)
}
