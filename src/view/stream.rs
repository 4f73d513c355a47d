//! Live log view fed by a background worker.
//!
//! The worker pulls lines from the backend's lazy sequence and sends them to
//! the dashboard over an `mpsc` channel. The dashboard appends them on its
//! own turn, so the line buffer is only ever touched by the UI thread.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use super::ViewId;
use crate::app::input_traits::ListSelectable;
use crate::docker::{LogFeed, LogLines, LogStop};

/// Message from a log worker to the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A new line for `view`.
    Line {
        /// Target view.
        view: ViewId,
        /// Trimmed line text.
        line: String,
    },
    /// The sequence of `view` finished or failed.
    Ended {
        /// Target view.
        view: ViewId,
    },
}

impl StreamEvent {
    /// Returns the target view.
    #[must_use]
    pub fn view(&self) -> ViewId {
        match self {
            Self::Line { view, .. } | Self::Ended { view } => *view,
        }
    }
}

/// Splits the initial log block into trimmed, non-empty lines.
#[must_use]
pub fn split_initial(initial: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(initial)
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Append-only log view with a cancellable worker.
#[derive(Debug)]
pub struct StreamingView {
    id: ViewId,
    title: String,
    lines: Vec<String>,
    focus: usize,
    ended: bool,
    cancel: Arc<AtomicBool>,
    stop: Option<LogStop>,
    worker: Option<JoinHandle<()>>,
}

impl StreamingView {
    /// Seeds the buffer from `feed.initial` and starts the worker on
    /// `feed.lines`.
    ///
    /// # Errors
    /// Returns error if the worker thread cannot be spawned.
    pub fn start(
        title: impl Into<String>,
        feed: LogFeed,
        events: Sender<StreamEvent>,
    ) -> io::Result<Self> {
        let id = ViewId::next();
        let lines = split_initial(&feed.initial);
        let cancel = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&cancel);
        let stop = feed.stop;
        let source = feed.lines;
        let worker = thread::Builder::new()
            .name(format!("sen-logs-{}", id.raw()))
            .spawn(move || run_worker(id, source, &flag, &events))?;

        let title = title.into();
        tracing::debug!("Started log stream {:?} ({})", id, title);

        Ok(Self {
            id,
            title,
            focus: lines.len().saturating_sub(1),
            lines,
            ended: false,
            cancel,
            stop,
            worker: Some(worker),
        })
    }

    /// Returns the view identity.
    #[must_use]
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Returns the tab title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the buffered lines.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Returns the focused line index.
    #[must_use]
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Returns true once the worker reported the end of its sequence.
    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Returns true once `destroy` was called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Appends a line and focuses it. Refused after `destroy`.
    pub fn push_line(&mut self, line: String) -> bool {
        if self.is_cancelled() {
            return false;
        }
        self.lines.push(line);
        self.focus = self.lines.len() - 1;
        true
    }

    /// Records that the worker is gone.
    pub fn mark_ended(&mut self) {
        self.ended = true;
    }

    /// Signals the worker to stop and stops the feed's producer. Never joins
    /// the worker.
    ///
    /// Returns true on the call that actually cancelled the stream.
    pub fn destroy(&mut self) -> bool {
        if self.cancel.swap(true, Ordering::SeqCst) {
            return false;
        }
        tracing::debug!("Cancelled log stream {:?} ({})", self.id, self.title);
        if let Some(stop) = self.stop.take() {
            stop.stop();
        }
        // Detach: the worker may still be finishing its current line
        self.worker.take();
        true
    }

    /// Paints the lines ending at the focused one.
    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let (badge, badge_style) = if self.ended || self.is_cancelled() {
            (" ENDED ", Style::default().fg(Color::White).bg(Color::DarkGray))
        } else {
            (" LIVE ", Style::default().fg(Color::Black).bg(Color::Green))
        };

        let title = Line::from(vec![
            Span::raw(format!(" {} ", self.title)),
            Span::styled(badge, badge_style.add_modifier(Modifier::BOLD)),
            Span::raw(format!(" {} lines ", self.lines.len())),
        ]);

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 || self.lines.is_empty() {
            return;
        }

        let height = inner.height as usize;
        let start = (self.focus + 1).saturating_sub(height);

        for (row, line) in self.lines.iter().skip(start).take(height).enumerate() {
            let style = if start + row == self.focus {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            buf.set_stringn(
                inner.x,
                inner.y + row as u16,
                line,
                inner.width as usize,
                style,
            );
        }
    }
}

impl Drop for StreamingView {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl ListSelectable for StreamingView {
    fn select_prev(&mut self) {
        self.focus = self.focus.saturating_sub(1);
    }

    fn select_next(&mut self) {
        if self.focus + 1 < self.lines.len() {
            self.focus += 1;
        }
    }

    fn select_first(&mut self) {
        self.focus = 0;
    }

    fn select_last(&mut self) {
        self.focus = self.lines.len().saturating_sub(1);
    }
}

/// Worker loop: one line per iteration, checking the flag around every pull.
fn run_worker(
    view: ViewId,
    mut source: LogLines,
    cancel: &AtomicBool,
    events: &Sender<StreamEvent>,
) {
    loop {
        if cancel.load(Ordering::SeqCst) {
            break;
        }
        let Some(item) = source.next() else {
            break;
        };
        if cancel.load(Ordering::SeqCst) {
            break;
        }

        match item {
            Ok(line) => {
                let line = line.trim().to_string();
                if events.send(StreamEvent::Line { view, line }).is_err() {
                    // Dashboard gone
                    return;
                }
            }
            Err(e) => {
                tracing::warn!("Log stream {:?} failed: {}", view, e);
                break;
            }
        }
    }

    tracing::debug!("Log worker {:?} finished", view);
    let _ = events.send(StreamEvent::Ended { view });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    fn feed_from(initial: &str, lines: Vec<io::Result<String>>) -> LogFeed {
        LogFeed::new(initial.as_bytes().to_vec(), Box::new(lines.into_iter()))
    }

    #[test]
    fn test_split_initial_trims_and_drops_empty() {
        assert_eq!(split_initial(b"a\n  b \r\n\n\nc"), vec!["a", "b", "c"]);
        assert!(split_initial(b"").is_empty());
    }

    #[test]
    fn test_initial_lines_seed_buffer() {
        let (tx, _rx) = mpsc::channel();
        let view = StreamingView::start("logs", feed_from("a\nb\n", Vec::new()), tx)
            .expect("spawn worker");
        assert_eq!(view.lines(), ["a", "b"]);
        assert_eq!(view.focus(), 1);
    }

    #[test]
    fn test_worker_sends_lines_then_ended() {
        let (tx, rx) = mpsc::channel();
        let view = StreamingView::start(
            "logs",
            feed_from("", vec![Ok(" c ".to_string()), Ok("d".to_string())]),
            tx,
        )
        .expect("spawn worker");
        let id = view.id();

        let timeout = Duration::from_secs(5);
        let events: Vec<StreamEvent> = (0..3)
            .map(|_| rx.recv_timeout(timeout).expect("worker event"))
            .collect();

        assert_eq!(
            events,
            vec![
                StreamEvent::Line { view: id, line: "c".to_string() },
                StreamEvent::Line { view: id, line: "d".to_string() },
                StreamEvent::Ended { view: id },
            ]
        );
    }

    #[test]
    fn test_worker_stops_on_error() {
        let (tx, rx) = mpsc::channel();
        let lines = vec![
            Ok("a".to_string()),
            Err(io::Error::other("pipe closed")),
            Ok("never".to_string()),
        ];
        let view = StreamingView::start("logs", feed_from("", lines), tx).expect("spawn worker");
        let id = view.id();

        let timeout = Duration::from_secs(5);
        let first = rx.recv_timeout(timeout).expect("first event");
        let second = rx.recv_timeout(timeout).expect("second event");
        assert_eq!(first, StreamEvent::Line { view: id, line: "a".to_string() });
        assert_eq!(second, StreamEvent::Ended { view: id });
    }

    #[test]
    fn test_push_refused_after_destroy() {
        let (tx, _rx) = mpsc::channel();
        let mut view =
            StreamingView::start("logs", feed_from("a", Vec::new()), tx).expect("spawn worker");

        assert!(view.push_line("b".to_string()));
        assert!(view.destroy());
        assert!(!view.destroy());
        assert!(view.is_cancelled());
        assert!(!view.push_line("c".to_string()));
        assert_eq!(view.lines(), ["a", "b"]);
    }

    #[test]
    fn test_destroy_runs_stop_hook_once() {
        use std::sync::atomic::AtomicUsize;

        let stops = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&stops);
        let feed = feed_from("", Vec::new()).with_stop(LogStop::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        let (tx, _rx) = mpsc::channel();
        let mut view = StreamingView::start("logs", feed, tx).expect("spawn worker");

        view.destroy();
        view.destroy();
        drop(view);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_push_moves_focus_to_newest() {
        let (tx, _rx) = mpsc::channel();
        let mut view =
            StreamingView::start("logs", feed_from("a\nb", Vec::new()), tx).expect("spawn worker");
        view.select_first();
        view.push_line("c".to_string());
        assert_eq!(view.focus(), 2);
    }
}
