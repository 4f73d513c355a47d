//! Backend contract consumed by the dashboard.
//!
//! The dashboard never talks to Docker directly; it goes through
//! [`DockerBackend`]. The CLI implementation lives in `discovery`, tests
//! plug in an in-memory fake.

use std::fmt;
use std::io;

use serde_json::Value;

use super::container::DomainObject;

/// Lazy, unbounded, non-restartable sequence of log lines.
///
/// Pulling the next item may block until the container writes again.
pub type LogLines = Box<dyn Iterator<Item = io::Result<String>> + Send>;

/// Stops the producer behind a [`LogFeed`] without waiting for its reader.
pub struct LogStop(Box<dyn FnOnce() + Send>);

impl LogStop {
    /// Wraps the function that stops the producer.
    #[must_use]
    pub fn new(stop: impl FnOnce() + Send + 'static) -> Self {
        Self(Box::new(stop))
    }

    /// Stops the producer. A blocked reader then sees the end of its lines.
    pub fn stop(self) {
        (self.0)();
    }
}

impl fmt::Debug for LogStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LogStop")
    }
}

/// Logs returned by the backend: what is already there plus what comes next.
pub struct LogFeed {
    /// Log output already produced when the feed was opened.
    pub initial: Vec<u8>,
    /// Lines produced after the feed was opened.
    pub lines: LogLines,
    /// Stops whatever produces `lines`, if anything needs stopping.
    pub stop: Option<LogStop>,
}

impl LogFeed {
    /// Creates a new feed.
    #[must_use]
    pub fn new(initial: Vec<u8>, lines: LogLines) -> Self {
        Self {
            initial,
            lines,
            stop: None,
        }
    }

    /// Attaches the hook run when the feed's consumer is torn down.
    #[must_use]
    pub fn with_stop(mut self, stop: LogStop) -> Self {
        self.stop = Some(stop);
        self
    }
}

impl fmt::Debug for LogFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogFeed")
            .field("initial_bytes", &self.initial.len())
            .field("stoppable", &self.stop.is_some())
            .finish_non_exhaustive()
    }
}

/// Errors returned by a Docker backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The Docker CLI could not be started.
    #[error("Docker CLI not found: {0}")]
    NotInstalled(String),
    /// A Docker command did not finish in time.
    #[error("Docker command timed out: {0}")]
    Timeout(String),
    /// A Docker command exited with an error.
    #[error("Docker command failed: {0}")]
    CommandFailed(String),
    /// The requested object does not exist.
    #[error("No such object: {0}")]
    NotFound(String),
    /// Docker output could not be parsed.
    #[error("Failed to parse Docker output: {0}")]
    Parse(#[from] serde_json::Error),
    /// I/O error talking to the Docker CLI.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Source of Docker objects, inspection data, and logs.
pub trait DockerBackend: Send {
    /// Returns a snapshot of all images and containers.
    fn inventory(&self) -> Result<Vec<DomainObject>, BackendError>;

    /// Returns the inspection payload of an image.
    fn inspect_image(&self, id: &str) -> Result<Value, BackendError>;

    /// Returns the inspection payload of a container.
    fn inspect_container(&self, id: &str) -> Result<Value, BackendError>;

    /// Opens the logs of a container.
    fn logs(&self, container_id: &str) -> Result<LogFeed, BackendError>;
}
