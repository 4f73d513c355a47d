//! In-memory Docker backend and small test utilities.
//!
//! `FakeBackend` serves a fixed inventory, canned inspection payloads, and
//! log feeds that are either finite or fed live by the test through a
//! channel.

#![allow(dead_code, clippy::expect_used)]

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Duration as Age, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::Value;

use sen::app::Dashboard;
use sen::docker::{
    BackendError, DockerBackend, DockerContainer, DockerImage, DomainObject, LogFeed, LogStop,
};
use sen::view::{StreamingView, View};

/// How long helpers wait for a log worker.
pub const WORKER_TIMEOUT: Duration = Duration::from_secs(5);

/// Log lines pushed by the test while the view is open.
pub struct ChannelLines(Receiver<io::Result<String>>);

impl Iterator for ChannelLines {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.recv().ok()
    }
}

/// Backend serving canned data.
#[derive(Default)]
pub struct FakeBackend {
    objects: Vec<DomainObject>,
    inventory_error: Option<String>,
    inspections: HashMap<String, Value>,
    feeds: Mutex<HashMap<String, LogFeed>>,
}

impl FakeBackend {
    pub fn new(objects: Vec<DomainObject>) -> Self {
        Self {
            objects,
            ..Self::default()
        }
    }

    /// Backend whose inventory call fails.
    pub fn unavailable(message: &str) -> Self {
        Self {
            inventory_error: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn with_inspection(mut self, id: &str, payload: Value) -> Self {
        self.inspections.insert(id.to_string(), payload);
        self
    }

    /// Logs with a finite live part.
    pub fn with_logs(self, id: &str, initial: &str, lines: &[&str]) -> Self {
        let lines: Vec<io::Result<String>> = lines.iter().map(|l| Ok((*l).to_string())).collect();
        let feed = LogFeed::new(initial.as_bytes().to_vec(), Box::new(lines.into_iter()));
        self.insert_feed(id, feed);
        self
    }

    /// Logs whose live part is fed through the returned sender.
    pub fn with_live_logs(self, id: &str, initial: &str) -> (Self, Sender<io::Result<String>>) {
        let (tx, rx) = mpsc::channel();
        let feed = LogFeed::new(initial.as_bytes().to_vec(), Box::new(ChannelLines(rx)));
        self.insert_feed(id, feed);
        (self, tx)
    }

    /// Live logs whose stop hook counts how often the view stopped them.
    pub fn with_counted_logs(
        self,
        id: &str,
        initial: &str,
    ) -> (Self, Sender<io::Result<String>>, Arc<AtomicUsize>) {
        let (tx, rx) = mpsc::channel();
        let stops = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&stops);
        let feed = LogFeed::new(initial.as_bytes().to_vec(), Box::new(ChannelLines(rx)))
            .with_stop(LogStop::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        self.insert_feed(id, feed);
        (self, tx, stops)
    }

    fn insert_feed(&self, id: &str, feed: LogFeed) {
        self.feeds
            .lock()
            .expect("feeds lock")
            .insert(id.to_string(), feed);
    }
}

impl DockerBackend for FakeBackend {
    fn inventory(&self) -> Result<Vec<DomainObject>, BackendError> {
        match &self.inventory_error {
            Some(message) => Err(BackendError::CommandFailed(message.clone())),
            None => Ok(self.objects.clone()),
        }
    }

    fn inspect_image(&self, id: &str) -> Result<Value, BackendError> {
        self.inspections
            .get(id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(id.to_string()))
    }

    fn inspect_container(&self, id: &str) -> Result<Value, BackendError> {
        self.inspect_image(id)
    }

    fn logs(&self, container_id: &str) -> Result<LogFeed, BackendError> {
        self.feeds
            .lock()
            .expect("feeds lock")
            .remove(container_id)
            .ok_or_else(|| BackendError::NotFound(container_id.to_string()))
    }
}

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn image(id: &str, names: &[&str]) -> DomainObject {
    DockerImage::new(
        id.to_string(),
        now() - Age::hours(3),
        names.iter().map(|n| (*n).to_string()).collect(),
    )
    .into()
}

pub fn container(id: &str, name: &str) -> DomainObject {
    DockerContainer::new(
        id.to_string(),
        now() - Age::days(2),
        name.to_string(),
        "sleep infinity".to_string(),
        "Up 2 days".to_string(),
    )
    .into()
}

pub fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

/// Drains worker events until `done` holds or the timeout expires.
pub fn pump_until(dashboard: &mut Dashboard, mut done: impl FnMut(&Dashboard) -> bool) -> bool {
    let deadline = Instant::now() + WORKER_TIMEOUT;
    while Instant::now() < deadline {
        dashboard.drain_stream_events();
        if done(dashboard) {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

/// Returns the streaming view at `index`.
pub fn streaming_at(dashboard: &Dashboard, index: usize) -> &StreamingView {
    match &dashboard.stack().views()[index] {
        View::Streaming(view) => view,
        other => panic!("expected a streaming view at {}, got {:?}", index, other.title()),
    }
}

/// Returns the buffered lines of the streaming view at `index`.
pub fn lines_at(dashboard: &Dashboard, index: usize) -> Vec<String> {
    streaming_at(dashboard, index).lines().to_vec()
}
