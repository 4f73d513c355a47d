//! Ordered collection of open views.
//!
//! The list view sits at index 0 for the whole session. Any member can be
//! displayed, not only the most recent one.

use crate::view::{ListView, View, ViewId};

/// Ordered views plus the displayed position.
#[derive(Debug)]
pub struct ViewStack {
    views: Vec<View>,
    current: usize,
    redraws: usize,
}

impl ViewStack {
    /// Creates a stack holding only the list view, displayed.
    #[must_use]
    pub fn new(list: ListView) -> Self {
        Self {
            views: vec![View::List(list)],
            current: 0,
            redraws: 1,
        }
    }

    /// Returns the number of views.
    #[must_use]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Always false; the list view is never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Returns all views in order.
    #[must_use]
    pub fn views(&self) -> &[View] {
        &self.views
    }

    /// Returns the position of the displayed view.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Returns the displayed view.
    #[must_use]
    pub fn current(&self) -> &View {
        assert!(self.current < self.views.len(), "displayed view out of range");
        &self.views[self.current]
    }

    /// Returns the displayed view mutably.
    pub fn current_mut(&mut self) -> &mut View {
        assert!(self.current < self.views.len(), "displayed view out of range");
        &mut self.views[self.current]
    }

    /// Returns the list view.
    #[must_use]
    pub fn list(&self) -> &ListView {
        match self.views.first() {
            Some(View::List(list)) => list,
            _ => unreachable!("list view must stay at index 0"),
        }
    }

    /// Returns the position of the view with identity `id`.
    #[must_use]
    pub fn position(&self, id: ViewId) -> Option<usize> {
        self.views.iter().position(|v| v.id() == id)
    }

    /// Returns true if a view with identity `id` is a member.
    #[must_use]
    pub fn contains(&self, id: ViewId) -> bool {
        self.position(id).is_some()
    }

    /// Returns the member with identity `id`.
    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut View> {
        self.views.iter_mut().find(|v| v.id() == id)
    }

    /// Adds `view` unless a member has the same identity, then displays it.
    ///
    /// When the identity is already present the existing member is kept and
    /// displayed; `view` is dropped.
    pub fn add_and_show(&mut self, view: View) {
        match self.position(view.id()) {
            Some(pos) => {
                tracing::debug!("View {:?} already open at {}", view.id(), pos);
                self.current = pos;
            }
            None => {
                tracing::debug!("Opening view {:?} ({})", view.id(), view.title());
                self.views.push(view);
                self.current = self.views.len() - 1;
            }
        }
        self.request_redraw();
    }

    /// Displays the view at `index`.
    ///
    /// `-1` means the last view; any other out-of-range index means the
    /// list view. A stack holding only the list view ignores the call.
    pub fn show(&mut self, index: isize) {
        let len = self.views.len();
        if len <= 1 {
            return;
        }

        let target = match usize::try_from(index) {
            Ok(i) if i < len => i,
            _ if index == -1 => len - 1,
            _ => {
                tracing::debug!("View index {} out of range, showing the list", index);
                0
            }
        };

        self.current = target;
        self.request_redraw();
    }

    /// Removes the displayed view, tears it down, and displays the list.
    ///
    /// Returns `None` without changing anything when the list view is
    /// displayed.
    pub fn remove_current(&mut self) -> Option<View> {
        if self.current == 0 {
            tracing::warn!("The list view cannot be closed");
            return None;
        }

        let mut view = self.views.remove(self.current);
        view.teardown();
        tracing::debug!("Closed view {:?} ({})", view.id(), view.title());

        self.current = 0;
        self.request_redraw();
        Some(view)
    }

    /// Asks the loop to repaint.
    pub fn request_redraw(&mut self) {
        self.redraws += 1;
    }

    /// Returns the number of redraw requests not yet taken.
    #[must_use]
    pub fn pending_redraws(&self) -> usize {
        self.redraws
    }

    /// Takes all pending redraw requests, returning true if there were any.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraws) > 0
    }
}
