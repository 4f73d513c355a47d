//! Main application state and event handling.
//!
//! Pulls terminal events, forwards keys to the dashboard, and decides when
//! to repaint.

pub mod dashboard;
pub mod input_traits;
mod render;

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

use crate::config::Config;
use crate::docker::{DockerBackend, DockerCli};

pub use dashboard::{Dispatch, Dashboard};

/// Event poll timeout in milliseconds.
const POLL_TIMEOUT_MS: u64 = 50;

/// Application state.
pub struct App {
    /// View-stack controller.
    dashboard: Dashboard,
    /// Running flag.
    running: bool,
    /// Repaint needed for reasons outside the dashboard (resize, startup).
    needs_draw: bool,
}

impl App {
    /// Creates the application with the Docker CLI backend.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::with_backend(Box::new(DockerCli::from_config(config)))
    }

    /// Creates the application with any backend.
    #[must_use]
    pub fn with_backend(backend: Box<dyn DockerBackend>) -> Self {
        Self {
            dashboard: Dashboard::new(backend),
            running: true,
            needs_draw: true,
        }
    }

    /// Returns the dashboard.
    #[must_use]
    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Returns the dashboard mutably.
    pub fn dashboard_mut(&mut self) -> &mut Dashboard {
        &mut self.dashboard
    }

    /// Returns true until a quit key was pressed.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Applies worker events, then waits briefly for one terminal event.
    ///
    /// # Errors
    /// Returns error if event processing fails.
    pub fn update(&mut self) -> io::Result<()> {
        self.dashboard.drain_stream_events();

        if event::poll(Duration::from_millis(POLL_TIMEOUT_MS))? {
            match event::read()? {
                Event::Key(key) => self.handle_key(key),
                Event::Resize(..) => self.needs_draw = true,
                _ => {}
            }
        }

        Ok(())
    }

    /// Handles a key event. Only presses count.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.dashboard.dispatch_key(&key) {
            Dispatch::Quit => {
                tracing::info!("Quit requested");
                self.running = false;
            }
            Dispatch::Consumed => {}
            Dispatch::Unhandled => tracing::trace!("Unhandled key: {:?}", key.code),
        }
    }

    /// Returns true if the screen must be repainted, consuming the request.
    pub fn should_draw(&mut self) -> bool {
        let redraw = self.dashboard.take_redraw();
        std::mem::take(&mut self.needs_draw) || redraw
    }

    /// Shuts down the application.
    pub fn shutdown(&mut self) {
        self.dashboard.shutdown();
    }
}
