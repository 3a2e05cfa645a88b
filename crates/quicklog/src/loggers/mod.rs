//! Loggers
//!
//! A [`Logger`] prints one-shot messages and drains animated ones:
//! - [`TerminalLogger`] - text frames for humans
//! - [`JsonLogger`] - one JSON object per line for log pipelines
//!
//! While an animated message runs, its logger refuses any other output: the
//! animation owns the terminal rows below the cursor, so interleaved logs
//! would be erased or garbled. Breaking that rule is a programming error and
//! terminates the process.

pub mod json;
pub mod terminal;

pub use json::JsonLogger;
pub use terminal::TerminalLogger;

use crate::frames::Frames;
use crate::level::Level;
use crate::message::{AnimatedMessage, Message};
use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Printed to stderr when a logger is used during an animation.
pub const ANIMATION_CONFLICT: &str = "cannot log while an animated message is running";

/// Destination-aware printer for messages.
pub trait Logger: Send + Sync {
    /// Render `message` once and print it. Empty renders are skipped.
    ///
    /// [`Level::Fatal`] exits the process after printing. Aborts the process
    /// if an animated message is running on this logger.
    fn log(&self, level: Level, message: &dyn Message);

    /// Print every frame of `message` until it is closed.
    ///
    /// The logger stays locked until the returned session is closed or
    /// dropped. Aborts the process if another animation is running.
    fn log_animated(&self, message: Arc<dyn AnimatedMessage>) -> AnimatedSession;
}

/// Write the conflict message to stderr and exit with status 1.
pub fn abort_animation_conflict() -> ! {
    let mut stderr = io::stderr().lock();
    // Exiting either way; nothing to do if stderr is gone.
    let _ = writeln!(stderr, "{ANIMATION_CONFLICT}");
    let _ = stderr.flush();
    std::process::exit(1)
}

/// Exit after a fatal message was printed.
pub(crate) fn exit_fatal() -> ! {
    debug!("fatal message logged, exiting");
    std::process::exit(1)
}

#[derive(Debug, Default)]
struct Claims {
    /// One-shot writes in progress
    logging: usize,
    animating: bool,
}

#[derive(Debug, Default)]
struct LockInner {
    claims: Mutex<Claims>,
    /// Signalled when the last one-shot write finishes.
    idle: Condvar,
}

/// Keeps one-shot output and animations apart on a logger.
///
/// A one-shot `log` holds an [`OutputClaim`] while it renders and writes; an
/// animation holds the [`AnimationGuard`]. Both are taken under one mutex, so
/// a write can never start after an animation did, nor finish inside one.
/// Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct AnimationLock {
    inner: Arc<LockInner>,
}

impl AnimationLock {
    /// Whether an animation currently holds the lock.
    pub fn is_active(&self) -> bool {
        self.inner.claims.lock().animating
    }

    /// Claim the logger for one write, or abort the process if an animation
    /// is running.
    pub fn claim_output(&self) -> OutputClaim {
        let mut claims = self.inner.claims.lock();
        if claims.animating {
            drop(claims);
            abort_animation_conflict();
        }
        claims.logging += 1;
        OutputClaim {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Take the lock once in-flight writes are done, or abort the process
    /// if another animation holds it.
    pub fn acquire(&self) -> AnimationGuard {
        let mut claims = self.inner.claims.lock();
        loop {
            if claims.animating {
                drop(claims);
                abort_animation_conflict();
            }
            if claims.logging == 0 {
                break;
            }
            self.inner.idle.wait(&mut claims);
        }
        claims.animating = true;
        self.guard()
    }

    /// Take the lock if nothing else is using the logger.
    pub fn try_acquire(&self) -> Option<AnimationGuard> {
        let mut claims = self.inner.claims.lock();
        if claims.animating || claims.logging > 0 {
            return None;
        }
        claims.animating = true;
        Some(self.guard())
    }

    fn guard(&self) -> AnimationGuard {
        AnimationGuard {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Holds an [`AnimationLock`] for one write until dropped.
#[derive(Debug)]
pub struct OutputClaim {
    inner: Arc<LockInner>,
}

impl Drop for OutputClaim {
    fn drop(&mut self) {
        let mut claims = self.inner.claims.lock();
        claims.logging = claims.logging.saturating_sub(1);
        if claims.logging == 0 {
            self.inner.idle.notify_all();
        }
    }
}

/// Holds an [`AnimationLock`] until dropped.
#[derive(Debug)]
pub struct AnimationGuard {
    inner: Arc<LockInner>,
}

impl Drop for AnimationGuard {
    fn drop(&mut self) {
        self.inner.claims.lock().animating = false;
    }
}

/// A running animation on a logger.
///
/// Closing it closes the message, waits until every remaining frame is
/// printed, then unlocks the logger. Dropping the session closes it.
pub struct AnimatedSession {
    message: Arc<dyn AnimatedMessage>,
    drain: Option<JoinHandle<()>>,
    guard: Option<AnimationGuard>,
}

impl AnimatedSession {
    /// Print every frame of `frames` on a dedicated thread.
    pub(crate) fn start<T: Send + 'static>(
        message: Arc<dyn AnimatedMessage>,
        guard: AnimationGuard,
        frames: Frames<T>,
        mut print: impl FnMut(T) + Send + 'static,
    ) -> Self {
        let spawned = thread::Builder::new()
            .name("quicklog-drain".to_string())
            .spawn(move || {
                for frame in frames {
                    print(frame);
                }
            });

        let drain = match spawned {
            Ok(handle) => Some(handle),
            Err(err) => {
                // Nobody would read the frames; stop the message right away.
                warn!("failed to start animation drain: {err}");
                message.close();
                None
            }
        };
        debug!("animated session opened");

        Self {
            message,
            drain,
            guard: Some(guard),
        }
    }

    /// Whether [`close`](Self::close) already ran.
    pub fn is_closed(&self) -> bool {
        self.guard.is_none()
    }

    /// Close the message, print its remaining frames and unlock the logger.
    ///
    /// Safe to call more than once.
    pub fn close(&mut self) {
        if self.guard.is_none() {
            return;
        }

        self.message.close();
        if self.drain.take().is_some_and(|drain| drain.join().is_err()) {
            warn!("animation drain thread panicked");
        }
        self.guard = None;
        debug!("animated session closed");
    }
}

impl fmt::Debug for AnimatedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimatedSession")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl Drop for AnimatedSession {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::frames::{self, Frames};
    use crate::message::{AnimatedMessage, Record};
    use parking_lot::Mutex;
    use std::sync::mpsc::SyncSender;

    /// An animated message driven by hand from tests.
    #[derive(Default)]
    pub(crate) struct Scripted {
        terminal: Mutex<Option<(SyncSender<String>, Frames<String>)>>,
        json: Mutex<Option<(SyncSender<Record>, Frames<Record>)>>,
        pub(crate) ci: Mutex<Option<bool>>,
        pub(crate) closes: Mutex<usize>,
    }

    impl Scripted {
        pub(crate) fn push_terminal(&self, frame: &str) {
            let sender = self.terminal.lock().as_ref().map(|(sender, _)| sender.clone());
            if let Some(sender) = sender {
                sender.send(frame.to_string()).unwrap();
            }
        }

        pub(crate) fn push_json(&self, record: Record) {
            let sender = self.json.lock().as_ref().map(|(sender, _)| sender.clone());
            if let Some(sender) = sender {
                sender.send(record).unwrap();
            }
        }
    }

    impl AnimatedMessage for Scripted {
        fn run_terminal(&self, ci: bool) -> Frames<String> {
            *self.ci.lock() = Some(ci);
            let mut terminal = self.terminal.lock();
            terminal.get_or_insert_with(frames::channel).1.clone()
        }

        fn run_json(&self) -> Frames<Record> {
            let mut json = self.json.lock();
            json.get_or_insert_with(frames::channel).1.clone()
        }

        fn close(&self) {
            *self.closes.lock() += 1;
            self.terminal.lock().take();
            self.json.lock().take();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::Scripted;
    use super::*;

    #[test]
    fn test_lock_is_exclusive() {
        let lock = AnimationLock::default();
        assert!(!lock.is_active());

        let guard = lock.try_acquire().unwrap();
        assert!(lock.is_active());
        assert!(lock.try_acquire().is_none());

        drop(guard);
        assert!(!lock.is_active());
        assert!(lock.try_acquire().is_some());
    }

    #[test]
    fn test_animation_refused_during_write() {
        let lock = AnimationLock::default();
        let claim = lock.claim_output();
        assert!(lock.try_acquire().is_none());
        assert!(!lock.is_active());

        drop(claim);
        assert!(lock.try_acquire().is_some());
    }

    #[test]
    fn test_concurrent_writes_share_the_logger() {
        let lock = AnimationLock::default();
        let first = lock.claim_output();
        let second = lock.claim_output();

        drop(first);
        assert!(lock.try_acquire().is_none());
        drop(second);
        assert!(lock.try_acquire().is_some());
    }

    #[test]
    fn test_acquire_waits_for_write() {
        let lock = AnimationLock::default();
        let claim = lock.claim_output();

        let waiting = {
            let lock = lock.clone();
            thread::spawn(move || {
                let _guard = lock.acquire();
            })
        };
        thread::sleep(std::time::Duration::from_millis(20));
        assert!(!lock.is_active());
        assert!(!waiting.is_finished());

        drop(claim);
        waiting.join().unwrap();
        assert!(!lock.is_active());
    }

    #[test]
    fn test_lock_shared_between_clones() {
        let lock = AnimationLock::default();
        let other = lock.clone();
        let _guard = lock.acquire();
        assert!(other.is_active());
    }

    #[test]
    fn test_session_close_releases_lock() {
        let lock = AnimationLock::default();
        let message = Arc::new(Scripted::default());
        let frames = message.run_json();

        let mut session = AnimatedSession::start(message.clone(), lock.acquire(), frames, |_| {});
        assert!(lock.is_active());

        session.close();
        assert!(!lock.is_active());
        assert!(session.is_closed());

        session.close();
        assert_eq!(*message.closes.lock(), 1);
    }

    #[test]
    fn test_session_drop_closes() {
        let lock = AnimationLock::default();
        let message = Arc::new(Scripted::default());
        let frames = message.run_json();

        drop(AnimatedSession::start(message.clone(), lock.acquire(), frames, |_| {}));
        assert!(!lock.is_active());
        assert_eq!(*message.closes.lock(), 1);
    }
}
