//! sen
//!
//! A terminal dashboard for browsing Docker images and containers, with
//! inspection and live log views stacked on top of the object list.
//!
//! # Architecture
//!
//! - **Docker Module**: domain objects, list rows, and the backend contract
//!   with its Docker CLI implementation
//! - **View Module**: list, static text, and streaming log views
//! - **Stack Module**: the ordered set of open views
//! - **App Module**: key dispatch, worker event draining, and the event loop
//! - **UI Module**: tab bar, status bar, and key hints
//!
//! # Usage
//!
//! ```no_run
//! use sen::{App, Config};
//!
//! let config = Config::load().unwrap_or_default();
//! let mut app = App::new(&config);
//! // Run event loop...
//! ```

// Clippy configuration - allow common patterns
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

pub mod app;
pub mod config;
pub mod docker;
pub mod logging;
pub mod stack;
pub mod ui;
pub mod view;

// Re-export main types
pub use app::{App, Dashboard, Dispatch};
pub use config::Config;
pub use docker::{DockerBackend, DockerCli, DomainObject};
pub use stack::ViewStack;
pub use view::{View, ViewId};
