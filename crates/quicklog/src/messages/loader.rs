//! Loader - live status line for long-running operations
//!
//! A [`Loader`] tracks one operation through `Running → Success | Error` and
//! publishes a frame on every state change:
//! - text frames (spinner, label, elapsed time, nested child) via
//!   [`Loader::run_terminal`]
//! - structured frames via [`Loader::run_json`]
//!
//! In attended mode a refresh thread re-renders the text frame periodically
//! so the spinner and timer stay alive, and each frame starts with the
//! escape sequences that erase the previous one. In CI mode frames are only
//! emitted on explicit calls and never erase anything.
//!
//! Frames travel over rendezvous channels: explicit calls block until a
//! consumer takes the frame, background frames are abandoned once the loader
//! stops or every handle is dropped.

use crate::duration::{format_duration, round_elapsed};
use crate::frames::{self, Frames, offer};
use crate::message::{AnimatedMessage, Message, Record, render_with_child_json};
use crate::settings::term_width;
use crate::theme::{Ink, Spinner, Theme, rendered_rows, visible_width};
use crossterm::Command;
use crossterm::cursor::{MoveToColumn, MoveUp};
use crossterm::terminal::{Clear, ClearType};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, SyncSender};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use uuid::Uuid;

/// Period of the attended-mode refresh when none is configured.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(50);

/// Pause between two delivery attempts of a background frame.
const OFFER_POLL: Duration = Duration::from_millis(5);

/// Lifecycle of a loader. Only `Running` can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoaderStatus {
    /// The operation is in progress
    Running,
    /// The operation completed
    Success,
    /// The operation failed
    Error,
}

impl LoaderStatus {
    /// Name used in structured frames.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    /// Whether the status is final.
    pub fn is_terminal(self) -> bool {
        self != Self::Running
    }
}

impl fmt::Display for LoaderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional knobs for [`Loader::new`].
#[derive(Debug, Clone, Default)]
pub struct LoaderConfig {
    /// Identifier shared by every structured frame. Generated when unset.
    pub op_id: Option<Uuid>,
    /// Attended-mode refresh period. Defaults to [`DEFAULT_REFRESH_INTERVAL`].
    pub refresh_interval: Option<Duration>,
    /// Glyphs shown while running.
    pub spinner: Spinner,
}

impl LoaderConfig {
    /// Use a fixed operation id.
    pub fn with_op_id(mut self, op_id: Uuid) -> Self {
        self.op_id = Some(op_id);
        self
    }

    /// Override the refresh period.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = Some(interval);
        self
    }

    /// Replace the spinner.
    pub fn with_spinner(mut self, spinner: Spinner) -> Self {
        self.spinner = spinner;
        self
    }
}

/// What caused a frame to be rendered. Decides whether it may still be sent.
#[derive(Debug, Clone, Copy)]
enum Trigger {
    /// `update` or a refresh tick
    Step,
    /// `success` or `error`
    Final(LoaderStatus),
}

struct Outlet<T> {
    sender: SyncSender<T>,
    frames: Frames<T>,
    /// Frame rendered when the channel was requested, delivered before any
    /// other frame.
    pending: Option<T>,
}

impl<T> Outlet<T> {
    fn new() -> Self {
        let (sender, frames) = frames::channel();
        Self {
            sender,
            frames,
            pending: None,
        }
    }
}

struct Ticker {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

struct LoaderState {
    status: LoaderStatus,
    last_step: String,
    ci: bool,
    nested: Option<Arc<dyn Message>>,
    spinner: Spinner,
    spinner_index: usize,
    spinner_advanced_at: Option<Instant>,
    /// Last delivered text frame, without its erase prefix
    last_rendered: String,
    terminal: Option<Outlet<String>>,
    json: Option<Outlet<Record>>,
    closed: bool,
}

impl LoaderState {
    fn accepts(&self, trigger: Trigger) -> bool {
        if self.closed {
            return false;
        }
        match trigger {
            Trigger::Step => self.status == LoaderStatus::Running,
            Trigger::Final(status) => self.status == status,
        }
    }

    fn label(&self, step: &str) -> String {
        if step.is_empty() {
            self.last_step.clone()
        } else {
            step.to_string()
        }
    }

    fn remember(&mut self, step: &str) {
        if !step.is_empty() {
            self.last_step = step.to_string();
        }
    }

    /// `body` preceded by the sequences erasing the last delivered frame.
    fn framed(&self, body: &str) -> String {
        let rows = if self.ci {
            0
        } else {
            rendered_rows(&self.last_rendered, term_width())
        };
        if rows == 0 {
            body.to_string()
        } else {
            erase_prefix(rows) + body
        }
    }

    fn spinner_glyph(&mut self, now: Instant) -> String {
        // The first render only arms the clock.
        let advance = self
            .spinner_advanced_at
            .is_some_and(|last| now.saturating_duration_since(last) >= self.spinner.interval);
        if advance {
            self.spinner_index = self.spinner_index.wrapping_add(1);
        }
        if advance || self.spinner_advanced_at.is_none() {
            self.spinner_advanced_at = Some(now);
        }
        self.spinner.frame(self.spinner_index).to_string()
    }

    fn terminal_body(&mut self, step: &str, elapsed: Duration, now: Instant) -> String {
        let theme = Theme::default();
        let label = self.label(step);
        let (glyph, label) = match self.status {
            LoaderStatus::Running => {
                let glyph = self.spinner_glyph(now);
                (
                    Ink::new(theme.colors.spinner).paint(&glyph),
                    Ink::new(theme.colors.text).paint(&label),
                )
            }
            LoaderStatus::Success => {
                let ink = Ink::new(theme.colors.success);
                (ink.paint(theme.icons.success), ink.paint(&label))
            }
            LoaderStatus::Error => {
                let ink = Ink::new(theme.colors.error);
                (ink.paint(theme.icons.error), ink.paint(&label))
            }
        };

        let main = format!("{glyph} {label}");
        let elapsed = Ink::new(theme.colors.text)
            .dim()
            .paint(&format_duration(round_elapsed(elapsed)));

        // Push the timer to the right edge of the last row the line occupies.
        let width = term_width().max(1);
        let used = (visible_width(&main) + visible_width(&elapsed)) % width;
        let margin = width.saturating_sub(used).max(1);

        let mut body = format!("{main}{}{elapsed}\n", " ".repeat(margin));
        if let Some(nested) = &self.nested {
            body.push_str(&nested.render_terminal());
        }
        body
    }

    fn json_body(&self, step: &str, elapsed: Duration, op_id: Uuid) -> Record {
        let mut record = Record::new();
        record.insert("message".to_string(), Value::String(self.label(step)));
        record.insert("elapsed".to_string(), Value::String(format_duration(elapsed)));
        record.insert(
            "elapsed_nanos".to_string(),
            Value::from(u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX)),
        );
        record.insert("op_id".to_string(), Value::String(op_id.to_string()));
        record.insert("status".to_string(), Value::String(self.status.as_str().to_string()));

        render_with_child_json(Some(record), self.nested.as_deref()).unwrap_or_default()
    }
}

/// Escape sequences erasing the `rows` terminal rows above the cursor.
fn erase_prefix(rows: usize) -> String {
    let mut prefix = String::new();
    // Writing into a String cannot fail.
    for _ in 0..rows {
        let _ = MoveUp(1).write_ansi(&mut prefix);
        let _ = Clear(ClearType::CurrentLine).write_ansi(&mut prefix);
    }
    let _ = MoveToColumn(0).write_ansi(&mut prefix);
    prefix
}

struct LoaderShared {
    state: Mutex<LoaderState>,
    /// Serializes render-then-deliver on the text channel so its frames keep
    /// their order.
    terminal_emit: Mutex<()>,
    /// Same for the structured channel.
    json_emit: Mutex<()>,
    ticker: Mutex<Option<Ticker>>,
    started_at: Instant,
    op_id: Uuid,
    refresh_interval: Duration,
}

impl LoaderShared {
    /// Deliver the channel's pending frame, then render and deliver a new
    /// one for `next`. Stops at the first frame that is not taken.
    fn emit_terminal(
        &self,
        next: Option<(&str, Trigger)>,
        mut deliver: impl FnMut(&SyncSender<String>, String) -> bool,
    ) {
        let _emit = self.terminal_emit.lock();

        let pending = {
            let mut state = self.state.lock();
            if state.closed {
                return;
            }
            let Some(outlet) = state.terminal.as_mut() else {
                return;
            };
            let sender = outlet.sender.clone();
            let body = outlet.pending.take();
            body.map(|body| (sender, state.framed(&body), body))
        };
        if let Some((sender, frame, body)) = pending {
            if !deliver(&sender, frame) {
                return;
            }
            self.state.lock().last_rendered = body;
        }

        let Some((step, trigger)) = next else {
            return;
        };
        let (sender, frame, body) = {
            let mut state = self.state.lock();
            if !state.accepts(trigger) {
                return;
            }
            let Some(outlet) = &state.terminal else {
                return;
            };
            let sender = outlet.sender.clone();

            let now = Instant::now();
            let body = state.terminal_body(step, now.saturating_duration_since(self.started_at), now);
            (sender, state.framed(&body), body)
        };

        if deliver(&sender, frame) {
            self.state.lock().last_rendered = body;
        }
    }

    /// Structured counterpart of [`emit_terminal`](Self::emit_terminal).
    fn emit_json(
        &self,
        next: Option<(&str, Trigger)>,
        mut deliver: impl FnMut(&SyncSender<Record>, Record) -> bool,
    ) {
        let _emit = self.json_emit.lock();

        let pending = {
            let mut state = self.state.lock();
            if state.closed {
                return;
            }
            let Some(outlet) = state.json.as_mut() else {
                return;
            };
            outlet.pending.take().map(|record| (outlet.sender.clone(), record))
        };
        if let Some((sender, record)) = pending {
            if !deliver(&sender, record) {
                return;
            }
        }

        let Some((step, trigger)) = next else {
            return;
        };
        let (sender, record) = {
            let state = self.state.lock();
            if !state.accepts(trigger) {
                return;
            }
            let Some(outlet) = &state.json else {
                return;
            };
            let elapsed = self.started_at.elapsed();
            (outlet.sender.clone(), state.json_body(step, elapsed, self.op_id))
        };

        deliver(&sender, record);
    }

    /// Render and hand over a frame on every requested channel, blocking
    /// until each is taken.
    fn publish(&self, step: &str, trigger: Trigger) {
        let next = Some((step, trigger));
        self.emit_terminal(next, |sender, frame| sender.send(frame).is_ok());
        self.emit_json(next, |sender, record| sender.send(record).is_ok());
    }

    /// Whether a background producer should keep offering its frame.
    fn keep_offering(&self, alive: &Weak<()>) -> bool {
        thread::sleep(OFFER_POLL);
        alive.strong_count() > 0 && !self.state.lock().closed
    }

    fn start_ticker(self: &Arc<Self>, alive: Weak<()>) {
        let mut ticker = self.ticker.lock();
        if ticker.is_some() {
            return;
        }
        {
            let state = self.state.lock();
            if state.closed || state.status.is_terminal() {
                return;
            }
        }

        let (stop, stopped) = mpsc::channel();
        let shared = Arc::clone(self);
        let spawned = thread::Builder::new()
            .name("quicklog-refresh".to_string())
            .spawn(move || shared.refresh(&stopped, &alive));

        match spawned {
            Ok(handle) => {
                debug!(op_id = %self.op_id, interval = ?self.refresh_interval, "loader refresh started");
                *ticker = Some(Ticker { stop, handle });
            }
            Err(err) => warn!(op_id = %self.op_id, "failed to start loader refresh: {err}"),
        }
    }

    fn refresh(&self, stop: &Receiver<()>, alive: &Weak<()>) {
        loop {
            match stop.recv_timeout(self.refresh_interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
            }
            if alive.strong_count() == 0 {
                return;
            }

            let mut stopped = false;
            self.emit_terminal(Some(("", Trigger::Step)), |sender, frame| {
                offer(sender, frame, || match stop.recv_timeout(OFFER_POLL) {
                    Err(RecvTimeoutError::Timeout) if alive.strong_count() > 0 => true,
                    _ => {
                        stopped = true;
                        false
                    }
                })
            });
            if stopped {
                return;
            }
        }
    }

    /// Stop the refresh thread and wait for it, so no tick can follow.
    fn stop_ticker(&self) {
        let ticker = self.ticker.lock().take();
        if let Some(ticker) = ticker {
            // The thread may already be gone if every handle was dropped.
            let _ = ticker.stop.send(());
            if ticker.handle.join().is_err() {
                warn!(op_id = %self.op_id, "loader refresh thread panicked");
            }
            debug!(op_id = %self.op_id, "loader refresh stopped");
        }
    }
}

/// Tracks a long-running operation and renders its progress.
///
/// Cloning is cheap; clones drive the same operation. Hand a clone to a
/// [`Logger`](crate::Logger) through `log_animated` and keep one to report
/// progress:
///
/// ```no_run
/// use quicklog::{Loader, LoaderConfig, Logger, TerminalLogger};
/// use std::sync::Arc;
///
/// let loader = Loader::new("Compiling", LoaderConfig::default());
/// let mut session = TerminalLogger::new().log_animated(Arc::new(loader.clone()));
/// loader.update("Linking");
/// loader.success("Built");
/// session.close();
/// ```
#[derive(Clone)]
pub struct Loader {
    shared: Arc<LoaderShared>,
    /// Background threads stop once no handle holds this.
    alive: Arc<()>,
}

impl Loader {
    /// Create a running loader labelled `step`.
    pub fn new(step: impl Into<String>, config: LoaderConfig) -> Self {
        let state = LoaderState {
            status: LoaderStatus::Running,
            last_step: step.into(),
            ci: false,
            nested: None,
            spinner: config.spinner,
            spinner_index: 0,
            spinner_advanced_at: None,
            last_rendered: String::new(),
            terminal: None,
            json: None,
            closed: false,
        };

        Self {
            shared: Arc::new(LoaderShared {
                state: Mutex::new(state),
                terminal_emit: Mutex::new(()),
                json_emit: Mutex::new(()),
                ticker: Mutex::new(None),
                started_at: Instant::now(),
                op_id: config.op_id.unwrap_or_else(Uuid::new_v4),
                refresh_interval: config.refresh_interval.unwrap_or(DEFAULT_REFRESH_INTERVAL),
            }),
            alive: Arc::new(()),
        }
    }

    /// Identifier carried by every structured frame.
    pub fn op_id(&self) -> Uuid {
        self.shared.op_id
    }

    /// Current status.
    pub fn status(&self) -> LoaderStatus {
        self.shared.state.lock().status
    }

    /// Whether [`close`](Self::close) was called.
    pub fn is_closed(&self) -> bool {
        self.shared.state.lock().closed
    }

    /// Report progress. An empty `step` repeats the last label.
    ///
    /// Blocks until every requested channel took the frame. Does nothing
    /// once the loader succeeded, failed or was closed.
    pub fn update(&self, step: &str) {
        {
            let mut state = self.shared.state.lock();
            if !state.accepts(Trigger::Step) {
                return;
            }
            state.remember(step);
        }
        self.shared.publish(step, Trigger::Step);
    }

    /// Mark the operation as completed. An empty `step` keeps the last label.
    pub fn success(&self, step: &str) {
        self.finish(step, LoaderStatus::Success);
    }

    /// Mark the operation as failed; the error text becomes the label.
    pub fn error(&self, err: impl fmt::Display) {
        self.finish(&err.to_string(), LoaderStatus::Error);
    }

    fn finish(&self, step: &str, status: LoaderStatus) {
        self.shared.stop_ticker();
        {
            let mut state = self.shared.state.lock();
            if !state.accepts(Trigger::Step) {
                return;
            }
            state.status = status;
            state.remember(step);
        }
        debug!(op_id = %self.shared.op_id, %status, "loader finished");
        self.shared.publish(step, Trigger::Final(status));
    }

    /// Show `message` under the status line, replacing any previous one.
    pub fn nest(&self, message: impl Message + 'static) {
        self.shared.state.lock().nested = Some(Arc::new(message));
    }

    /// Remove the nested message.
    pub fn unnest(&self) {
        self.shared.state.lock().nested = None;
    }

    /// Stream text frames. `ci` disables the periodic refresh and erasing.
    ///
    /// The first call creates the channel; later calls share it. Returns a
    /// finished stream once the loader is closed.
    pub fn run_terminal(&self, ci: bool) -> Frames<String> {
        let frames = {
            let mut state = self.shared.state.lock();
            if state.closed {
                return frames::finished();
            }
            state.ci = ci;

            let now = Instant::now();
            let elapsed = now.saturating_duration_since(self.shared.started_at);
            let initial = state.terminal_body("", elapsed, now);
            let outlet = state.terminal.get_or_insert_with(Outlet::new);
            outlet.pending = Some(initial);
            outlet.frames.clone()
        };

        let shared = Arc::clone(&self.shared);
        let alive = Arc::downgrade(&self.alive);
        spawn_initial(move || {
            shared.emit_terminal(None, |sender, frame| {
                offer(sender, frame, || shared.keep_offering(&alive))
            });
        });

        if !ci {
            self.shared.start_ticker(Arc::downgrade(&self.alive));
        }

        frames
    }

    /// Stream structured frames. Never refreshes on its own.
    pub fn run_json(&self) -> Frames<Record> {
        let frames = {
            let mut state = self.shared.state.lock();
            if state.closed {
                return frames::finished();
            }

            let initial = state.json_body("", self.shared.started_at.elapsed(), self.shared.op_id);
            let outlet = state.json.get_or_insert_with(Outlet::new);
            outlet.pending = Some(initial);
            outlet.frames.clone()
        };

        let shared = Arc::clone(&self.shared);
        let alive = Arc::downgrade(&self.alive);
        spawn_initial(move || {
            shared.emit_json(None, |sender, record| {
                offer(sender, record, || shared.keep_offering(&alive))
            });
        });

        frames
    }

    /// Stop refreshing and end both streams. Safe to call more than once.
    pub fn close(&self) {
        let outlets = {
            let mut state = self.shared.state.lock();
            if state.closed {
                None
            } else {
                state.closed = true;
                Some((state.terminal.take(), state.json.take()))
            }
        };
        self.shared.stop_ticker();

        if outlets.is_some() {
            debug!(op_id = %self.shared.op_id, "loader closed");
        }
        drop(outlets);
    }
}

fn spawn_initial(render: impl FnOnce() + Send + 'static) {
    if let Err(err) = thread::Builder::new()
        .name("quicklog-initial-frame".to_string())
        .spawn(render)
    {
        warn!("failed to render initial loader frame: {err}");
    }
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("Loader")
            .field("op_id", &self.shared.op_id)
            .field("status", &state.status)
            .field("step", &state.last_step)
            .field("closed", &state.closed)
            .finish_non_exhaustive()
    }
}

impl AnimatedMessage for Loader {
    fn run_terminal(&self, ci: bool) -> Frames<String> {
        Loader::run_terminal(self, ci)
    }

    fn run_json(&self) -> Frames<Record> {
        Loader::run_json(self)
    }

    fn close(&self) {
        Loader::close(self);
    }
}
