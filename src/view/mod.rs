//! Views shown by the dashboard.
//!
//! `View` is a closed set of three kinds. Every operation delegates by
//! `match`, so adding a kind forces every dispatch site to handle it.

pub mod list;
pub mod stream;
pub mod text;

use std::sync::atomic::{AtomicU64, Ordering};

use crossterm::event::KeyEvent;
use ratatui::{buffer::Buffer, layout::Rect};

use crate::app::input_traits::handle_list_navigation;
use crate::docker::{DockerContainer, DomainObject};

pub use list::{ListRow, ListView};
pub use stream::{StreamEvent, StreamingView};
pub use text::StaticView;

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

impl ViewId {
    /// Allocates a fresh, process-unique identity.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw number.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Work a view asks the dashboard to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    /// Open the inspection payload of an object.
    Inspect(DomainObject),
    /// Open the logs of a container.
    Logs(DockerContainer),
}

/// Result of offering a key to a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The view used the key.
    Consumed,
    /// The view ignored the key.
    Unhandled,
    /// The view wants the dashboard to act.
    Action(ViewAction),
}

/// A view in the stack.
#[derive(Debug)]
pub enum View {
    /// The object list. Exactly one per dashboard.
    List(ListView),
    /// Immutable text.
    Static(StaticView),
    /// Live log tail.
    Streaming(StreamingView),
}

impl View {
    /// Returns the view identity.
    #[must_use]
    pub fn id(&self) -> ViewId {
        match self {
            Self::List(v) => v.id(),
            Self::Static(v) => v.id(),
            Self::Streaming(v) => v.id(),
        }
    }

    /// Returns the tab title.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::List(v) => v.title(),
            Self::Static(v) => v.title(),
            Self::Streaming(v) => v.title(),
        }
    }

    /// Returns true for the object list.
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Offers a key to the view.
    ///
    /// Keys the view has no binding for fall through to cursor and scroll
    /// navigation.
    pub fn handle_key(&mut self, key: &KeyEvent) -> KeyOutcome {
        let outcome = match self {
            Self::List(v) => v.handle_key(key),
            Self::Static(_) | Self::Streaming(_) => KeyOutcome::Unhandled,
        };
        if outcome != KeyOutcome::Unhandled {
            return outcome;
        }

        let moved = match self {
            Self::List(v) => handle_list_navigation(v, key),
            Self::Static(v) => handle_list_navigation(v, key),
            Self::Streaming(v) => handle_list_navigation(v, key),
        };
        if moved {
            KeyOutcome::Consumed
        } else {
            KeyOutcome::Unhandled
        }
    }

    /// Releases whatever the view holds on to. Called once on removal.
    pub fn teardown(&mut self) {
        match self {
            Self::List(_) | Self::Static(_) => {}
            Self::Streaming(v) => {
                v.destroy();
            }
        }
    }

    /// Paints the view body.
    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        match self {
            Self::List(v) => v.render(area, buf),
            Self::Static(v) => v.render(area, buf),
            Self::Streaming(v) => v.render(area, buf),
        }
    }
}

impl From<ListView> for View {
    fn from(view: ListView) -> Self {
        Self::List(view)
    }
}

impl From<StaticView> for View {
    fn from(view: StaticView) -> Self {
        Self::Static(view)
    }
}

impl From<StreamingView> for View {
    fn from(view: StreamingView) -> Self {
        Self::Streaming(view)
    }
}
