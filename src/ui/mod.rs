//! User interface module.
//!
//! Widgets around the displayed view: tab bar, status bar, key hints.

pub mod key_hint_bar;
pub mod statusbar;
pub mod view_tabs;

pub use key_hint_bar::{KeyHint, KeyHintBar, KeyHintStyle, hints_for};
pub use statusbar::StatusBar;
pub use view_tabs::ViewTabBar;
