//! Key dispatch and backend-driven view construction.
//!
//! The dashboard owns the view stack, the backend, and the receiving end
//! of the log workers' channel. It is the only place that mutates views.

use std::sync::mpsc::{self, Receiver, Sender};

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::docker::{BackendError, DockerBackend, DockerContainer, DomainObject};
use crate::stack::ViewStack;
use crate::view::{
    KeyOutcome, ListView, StaticView, StreamEvent, StreamingView, View, ViewAction,
};

/// Maximum number of worker events applied per tick.
const MAX_EVENTS_PER_TICK: usize = 4096;

/// What the loop should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Leave the loop.
    Quit,
    /// The key did something.
    Consumed,
    /// Nothing reacted to the key.
    Unhandled,
}

/// View-stack controller.
pub struct Dashboard {
    stack: ViewStack,
    backend: Box<dyn DockerBackend>,
    events_tx: Sender<StreamEvent>,
    events_rx: Receiver<StreamEvent>,
    status: String,
}

impl Dashboard {
    /// Loads the inventory and displays it.
    ///
    /// A failing backend still yields a dashboard: the list is empty and
    /// the error is shown in the status line.
    pub fn new(backend: Box<dyn DockerBackend>) -> Self {
        let (objects, status) = match backend.inventory() {
            Ok(objects) => {
                let status = format!("{} objects", objects.len());
                (objects, status)
            }
            Err(e) => {
                tracing::error!("Failed to load inventory: {}", e);
                (Vec::new(), format!("Docker unavailable: {}", e))
            }
        };

        let (events_tx, events_rx) = mpsc::channel();
        Self {
            stack: ViewStack::new(ListView::new(objects, Utc::now())),
            backend,
            events_tx,
            events_rx,
            status,
        }
    }

    /// Returns the view stack.
    #[must_use]
    pub fn stack(&self) -> &ViewStack {
        &self.stack
    }

    /// Returns the view stack mutably.
    pub fn stack_mut(&mut self) -> &mut ViewStack {
        &mut self.stack
    }

    /// Returns the status message.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Sets the status message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = msg.into();
        self.stack.request_redraw();
    }

    /// Routes a key press.
    pub fn dispatch_key(&mut self, key: &KeyEvent) -> Dispatch {
        let plain = matches!(key.modifiers, KeyModifiers::NONE | KeyModifiers::SHIFT);

        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Dispatch::Quit;
        }

        if plain {
            match key.code {
                KeyCode::Char('q' | 'Q') => return Dispatch::Quit,
                KeyCode::Char('p') => {
                    let index = self.stack.current_index() as isize;
                    self.stack.show(index - 1);
                    return Dispatch::Consumed;
                }
                KeyCode::Char('n') => {
                    let index = self.stack.current_index() as isize;
                    self.stack.show(index + 1);
                    return Dispatch::Consumed;
                }
                KeyCode::Char('x') => {
                    if self.stack.remove_current().is_none() {
                        self.set_status("The list cannot be closed");
                    }
                    return Dispatch::Consumed;
                }
                _ => {}
            }
        }

        match self.stack.current_mut().handle_key(key) {
            KeyOutcome::Consumed => {
                self.stack.request_redraw();
                Dispatch::Consumed
            }
            KeyOutcome::Unhandled => Dispatch::Unhandled,
            KeyOutcome::Action(ViewAction::Inspect(object)) => {
                self.inspect(&object);
                Dispatch::Consumed
            }
            KeyOutcome::Action(ViewAction::Logs(container)) => {
                self.open_logs(&container);
                Dispatch::Consumed
            }
        }
    }

    /// Opens the pretty-printed inspection payload of `object`.
    pub fn inspect(&mut self, object: &DomainObject) {
        let payload = match object {
            DomainObject::Image(image) => self.backend.inspect_image(&image.id),
            DomainObject::Container(container) => self.backend.inspect_container(&container.id),
        };
        let text = payload.and_then(|v| serde_json::to_string_pretty(&v).map_err(BackendError::from));

        match text {
            Ok(text) => {
                let title = format!("inspect {}", object.short_id());
                tracing::info!("Opening {}", title);
                self.stack.add_and_show(StaticView::new(title, text).into());
            }
            Err(e) => {
                tracing::warn!("Inspect of {} {} failed: {}", object.kind(), object.id(), e);
                self.set_status(format!(
                    "Cannot inspect {} {}: {}",
                    object.kind(),
                    object.short_id(),
                    e
                ));
            }
        }
    }

    /// Opens a live log view for `container`.
    pub fn open_logs(&mut self, container: &DockerContainer) {
        let label = if container.name.is_empty() {
            container.short_id()
        } else {
            container.name.as_str()
        };

        let feed = match self.backend.logs(&container.id) {
            Ok(feed) => feed,
            Err(e) => {
                tracing::warn!("Logs of container {} failed: {}", container.id, e);
                self.set_status(format!("Cannot open logs of {}: {}", label, e));
                return;
            }
        };

        let title = format!("logs {}", label);
        match StreamingView::start(title, feed, self.events_tx.clone()) {
            Ok(view) => {
                tracing::info!("Following logs of {}", container.id);
                self.stack.add_and_show(view.into());
            }
            Err(e) => {
                tracing::error!("Failed to start log worker: {}", e);
                self.set_status(format!("Cannot follow logs of {}: {}", label, e));
            }
        }
    }

    /// Applies pending worker events. Returns how many were applied.
    ///
    /// Events for closed views are dropped. A redraw is requested only if
    /// a displayed view changed.
    pub fn drain_stream_events(&mut self) -> usize {
        let mut handled = 0;
        let mut dirty = false;

        while handled < MAX_EVENTS_PER_TICK {
            let Ok(event) = self.events_rx.try_recv() else {
                break;
            };
            handled += 1;

            let target = event.view();
            let displayed = self.stack.current().id() == target;
            let Some(view) = self.stack.get_mut(target) else {
                tracing::trace!("Dropping event for closed view {:?}", target);
                continue;
            };
            let View::Streaming(stream) = view else {
                unreachable!("stream event for non-streaming view {:?}", target);
            };

            let changed = match event {
                StreamEvent::Line { line, .. } => stream.push_line(line),
                StreamEvent::Ended { .. } => {
                    stream.mark_ended();
                    true
                }
            };
            dirty |= changed && displayed;
        }

        if dirty {
            self.stack.request_redraw();
        }
        handled
    }

    /// Takes pending redraw requests.
    pub fn take_redraw(&mut self) -> bool {
        self.stack.take_redraw()
    }

    /// Tears down every open view except the list.
    pub fn shutdown(&mut self) {
        while self.stack.len() > 1 {
            self.stack.show(-1);
            self.stack.remove_current();
        }
        self.stack.take_redraw();
    }
}
