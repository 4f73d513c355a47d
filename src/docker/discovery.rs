//! Docker backend built on the Docker CLI.
//!
//! Discovers images and containers, inspects them, and follows container
//! logs by executing Docker CLI commands and parsing their JSON output.

use std::io::{self, BufRead, BufReader, Read};
use std::process::{Child, Command, Output, Stdio};
use std::sync::{Arc, Mutex, PoisonError, mpsc};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::backend::{BackendError, DockerBackend, LogFeed, LogStop};
use super::container::{DockerContainer, DockerImage, DomainObject};
use crate::config::Config;

/// Maximum number of items to parse from Docker output.
const MAX_PARSE_ITEMS: usize = 500;

/// Default timeout for one-shot Docker commands in milliseconds.
pub const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 5000;

/// Default number of existing log lines shown when opening logs.
pub const DEFAULT_TAIL_LINES: u64 = 200;

/// Poll interval for checking if a process completed.
const POLL_INTERVAL_MS: u64 = 20;

/// Returns the docker command name for the current platform.
#[must_use]
pub fn default_program() -> &'static str {
    if cfg!(target_os = "windows") {
        "docker.exe"
    } else {
        "docker"
    }
}

/// One line of `docker images --format {{json .}}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ImageLine {
    #[serde(rename = "ID")]
    id: String,
    #[serde(default)]
    repository: String,
    #[serde(default)]
    tag: String,
    #[serde(default)]
    created_at: String,
}

/// One line of `docker ps --format {{json .}}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ContainerLine {
    #[serde(rename = "ID")]
    id: String,
    #[serde(default)]
    names: String,
    #[serde(default)]
    command: String,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    status: String,
}

/// Docker backend that shells out to the Docker CLI.
#[derive(Debug, Clone)]
pub struct DockerCli {
    /// Docker executable name or path.
    program: String,
    /// Timeout for one-shot commands.
    timeout: Duration,
    /// Existing log lines fetched when opening logs.
    tail_lines: u64,
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new(default_program())
    }
}

impl DockerCli {
    /// Creates a backend using the given Docker executable.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        let program = program.into();
        assert!(!program.is_empty(), "docker program must not be empty");
        Self {
            program,
            timeout: Duration::from_millis(DEFAULT_COMMAND_TIMEOUT_MS),
            tail_lines: DEFAULT_TAIL_LINES,
        }
    }

    /// Creates a backend from the application configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.docker_command.clone())
            .with_timeout(Duration::from_millis(config.command_timeout_ms))
            .with_tail_lines(config.log_tail_lines)
    }

    /// Sets the timeout for one-shot commands.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets how many existing log lines are fetched.
    #[must_use]
    pub fn with_tail_lines(mut self, tail_lines: u64) -> Self {
        self.tail_lines = tail_lines;
        self
    }

    /// Returns the Docker executable.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        cmd
    }

    /// Runs a command, failing if it does not exit successfully.
    fn run_ok(&self, args: &[&str]) -> Result<Output, BackendError> {
        let label = format!("{} {}", self.program, args.join(" "));
        tracing::debug!("Running {}", label);

        let output = run_with_timeout(&mut self.command(args), self.timeout, &label)?;
        if output.status.success() {
            return Ok(output);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(BackendError::CommandFailed(format!("{}: {}", label, stderr)))
    }

    /// Discovers all images (one entry per image ID).
    pub fn discover_images(&self) -> Result<Vec<DockerImage>, BackendError> {
        let output = self.run_ok(&["images", "--no-trunc", "--format", "{{json .}}"])?;
        Ok(parse_images(&String::from_utf8_lossy(&output.stdout)))
    }

    /// Discovers all containers, including stopped ones.
    pub fn discover_containers(&self) -> Result<Vec<DockerContainer>, BackendError> {
        let output = self.run_ok(&["ps", "-a", "--no-trunc", "--format", "{{json .}}"])?;
        Ok(parse_containers(&String::from_utf8_lossy(&output.stdout)))
    }

    fn inspect(&self, object: &str, id: &str) -> Result<Value, BackendError> {
        assert!(!id.is_empty(), "id must not be empty");

        let output = self
            .run_ok(&[object, "inspect", id])
            .map_err(|e| not_found_for(e, id))?;

        match serde_json::from_slice::<Value>(&output.stdout)? {
            Value::Array(mut items) => {
                if items.is_empty() {
                    Err(BackendError::NotFound(id.to_string()))
                } else {
                    Ok(items.swap_remove(0))
                }
            }
            other => Ok(other),
        }
    }
}

impl DockerBackend for DockerCli {
    fn inventory(&self) -> Result<Vec<DomainObject>, BackendError> {
        let images = self.discover_images()?;
        let containers = self.discover_containers()?;
        tracing::info!(
            "Discovered {} images and {} containers",
            images.len(),
            containers.len()
        );

        Ok(images
            .into_iter()
            .map(DomainObject::from)
            .chain(containers.into_iter().map(DomainObject::from))
            .collect())
    }

    fn inspect_image(&self, id: &str) -> Result<Value, BackendError> {
        self.inspect("image", id)
    }

    fn inspect_container(&self, id: &str) -> Result<Value, BackendError> {
        self.inspect("container", id)
    }

    fn logs(&self, container_id: &str) -> Result<LogFeed, BackendError> {
        assert!(!container_id.is_empty(), "container_id must not be empty");

        // One cutoff splits the history between the two commands, so no line
        // falls between them and none is shown twice.
        let cutoff = Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true);
        let tail = self.tail_lines.to_string();
        let output = self
            .run_ok(&initial_log_args(container_id, &tail, &cutoff))
            .map_err(|e| not_found_for(e, container_id))?;

        // The container writes to both streams; the initial block keeps them
        // back to back.
        let mut initial = output.stdout;
        initial.extend_from_slice(&output.stderr);

        let lines = FollowLines::spawn(
            self.command(&follow_log_args(container_id, &cutoff)),
            &self.program,
        )?;
        let stop = lines.stop_handle();

        Ok(LogFeed::new(initial, Box::new(lines)).with_stop(stop))
    }
}

/// Arguments for the log history written before `cutoff`.
fn initial_log_args<'a>(id: &'a str, tail: &'a str, cutoff: &'a str) -> [&'a str; 6] {
    ["logs", "--tail", tail, "--until", cutoff, id]
}

/// Arguments for the live log lines written from `cutoff` on.
fn follow_log_args<'a>(id: &'a str, cutoff: &'a str) -> [&'a str; 5] {
    ["logs", "--follow", "--since", cutoff, id]
}

/// Converts a "No such ..." failure into `NotFound` for `id`.
fn not_found_for(err: BackendError, id: &str) -> BackendError {
    match err {
        BackendError::CommandFailed(msg) if msg.contains("No such") => {
            BackendError::NotFound(id.to_string())
        }
        other => other,
    }
}

/// Maps a spawn failure to a backend error.
fn spawn_error(err: io::Error, program: &str) -> BackendError {
    if err.kind() == io::ErrorKind::NotFound {
        BackendError::NotInstalled(program.to_string())
    } else {
        BackendError::Io(err)
    }
}

/// Runs a command with a timeout, killing it if the timeout expires.
///
/// Both pipes are drained on helper threads so a chatty command cannot
/// block on a full pipe while we wait for it.
fn run_with_timeout(
    cmd: &mut Command,
    timeout: Duration,
    label: &str,
) -> Result<Output, BackendError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let program = cmd.get_program().to_string_lossy().to_string();
    let mut child = cmd.spawn().map_err(|e| spawn_error(e, &program))?;

    let stdout = child.stdout.take().map(drain_pipe);
    let stderr = child.stderr.take().map(drain_pipe);

    let start = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if start.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait(); // Reap the zombie
            return Err(BackendError::Timeout(label.to_string()));
        }
        thread::sleep(Duration::from_millis(POLL_INTERVAL_MS));
    };

    Ok(Output {
        status,
        stdout: join_pipe(stdout),
        stderr: join_pipe(stderr),
    })
}

fn drain_pipe<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn join_pipe(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}

/// Line iterator over a running `docker logs --follow` process.
///
/// Stdout and stderr are forwarded by two reader threads. The process is
/// killed by the [`LogStop`] from `stop_handle` or when the iterator is
/// dropped, whichever comes first.
struct FollowLines {
    child: Arc<Mutex<Child>>,
    rx: mpsc::Receiver<io::Result<String>>,
}

impl FollowLines {
    fn spawn(mut cmd: Command, program: &str) -> Result<Self, BackendError> {
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| spawn_error(e, program))?;
        let (tx, rx) = mpsc::channel();

        if let Some(stdout) = child.stdout.take() {
            forward_lines(stdout, tx.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            forward_lines(stderr, tx);
        }

        Ok(Self {
            child: Arc::new(Mutex::new(child)),
            rx,
        })
    }

    /// Returns a hook that kills the process from another thread.
    ///
    /// Killing closes both pipes, so a reader parked in `next` wakes up
    /// with the end of the sequence.
    fn stop_handle(&self) -> LogStop {
        let child = Arc::clone(&self.child);
        LogStop::new(move || kill_child(&child))
    }

    #[cfg(test)]
    fn pid(&self) -> u32 {
        self.child
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .id()
    }
}

impl Iterator for FollowLines {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        // Both senders gone means both pipes hit EOF.
        self.rx.recv().ok()
    }
}

impl Drop for FollowLines {
    fn drop(&mut self) {
        kill_child(&self.child);
    }
}

/// Kills and reaps `child`. Safe to call more than once.
fn kill_child(child: &Mutex<Child>) {
    let mut child = child.lock().unwrap_or_else(PoisonError::into_inner);
    if matches!(child.try_wait(), Ok(Some(_))) {
        return;
    }
    if let Err(e) = child.kill() {
        tracing::debug!("Failed to kill log follower {}: {}", child.id(), e);
    }
    let _ = child.wait(); // Reap the zombie
}

/// Reads `pipe` line by line and forwards each line to `tx`.
fn forward_lines<R: Read + Send + 'static>(pipe: R, tx: mpsc::Sender<io::Result<String>>) {
    thread::spawn(move || {
        let mut reader = BufReader::new(pipe);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf)
                        .trim_end_matches(['\n', '\r'])
                        .to_string();
                    if tx.send(Ok(line)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.send(Err(e));
                    break;
                }
            }
        }
    });
}

/// Parses the output of `docker images --format {{json .}}`.
///
/// Docker prints one line per tag; lines with the same image ID are merged
/// so every image appears once.
#[must_use]
pub fn parse_images(output: &str) -> Vec<DockerImage> {
    let mut images: Vec<DockerImage> = Vec::new();

    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let parsed: ImageLine = match serde_json::from_str(line) {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!("Skipping unparsable image line: {}", e);
                continue;
            }
        };
        if parsed.id.is_empty() {
            continue;
        }

        let name = image_name(&parsed.repository, &parsed.tag);
        if let Some(existing) = images.iter_mut().find(|i| i.id == parsed.id) {
            if let Some(name) = name {
                if !existing.names.contains(&name) {
                    existing.names.push(name);
                }
            }
            continue;
        }

        if images.len() >= MAX_PARSE_ITEMS {
            break;
        }
        images.push(DockerImage::new(
            parsed.id,
            parse_created(&parsed.created_at),
            name.into_iter().collect(),
        ));
    }

    images
}

/// Parses the output of `docker ps --format {{json .}}`.
#[must_use]
pub fn parse_containers(output: &str) -> Vec<DockerContainer> {
    let mut containers: Vec<DockerContainer> = Vec::new();

    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if containers.len() >= MAX_PARSE_ITEMS {
            break;
        }

        let parsed: ContainerLine = match serde_json::from_str(line) {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!("Skipping unparsable container line: {}", e);
                continue;
            }
        };
        if parsed.id.is_empty() || containers.iter().any(|c| c.id == parsed.id) {
            continue;
        }

        containers.push(DockerContainer::new(
            parsed.id,
            parse_created(&parsed.created_at),
            parsed.names,
            parsed.command.trim_matches('"').to_string(),
            parsed.status,
        ));
    }

    containers
}

/// Builds `repository:tag`, or `None` for dangling images.
fn image_name(repository: &str, tag: &str) -> Option<String> {
    if repository.is_empty() || repository == "<none>" {
        return None;
    }
    if tag.is_empty() || tag == "<none>" {
        Some(repository.to_string())
    } else {
        Some(format!("{}:{}", repository, tag))
    }
}

/// Parses Docker's `CreatedAt` value.
///
/// Accepts `2024-01-02 03:04:05 +0000 UTC` (CLI format) and RFC 3339.
/// Unparsable values map to the Unix epoch.
#[must_use]
pub fn parse_created(value: &str) -> DateTime<Utc> {
    let value = value.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return t.with_timezone(&Utc);
    }

    let stamp: Vec<&str> = value.split_whitespace().take(3).collect();
    match DateTime::parse_from_str(&stamp.join(" "), "%Y-%m-%d %H:%M:%S %z") {
        Ok(t) => t.with_timezone(&Utc),
        Err(_) => {
            tracing::debug!("Unparsable creation time: {:?}", value);
            DateTime::<Utc>::default()
        }
    }
}
