//! Human-readable terminal output

use super::{AnimatedSession, AnimationLock, Logger, exit_fatal};
use crate::destination::Destination;
use crate::level::Level;
use crate::message::{AnimatedMessage, Message};
use crate::settings::settings;
use std::sync::Arc;

/// Prints text renders. Failures go to stderr, everything else to stdout.
///
/// Animated messages run in CI mode when the `CI` environment variable is
/// `true`: frames are appended instead of redrawn in place.
#[derive(Debug, Clone)]
pub struct TerminalLogger {
    stdout: Destination,
    stderr: Destination,
    ci: bool,
    lock: AnimationLock,
}

impl TerminalLogger {
    /// Logger on the process standard streams.
    pub fn new() -> Self {
        Self::with_destinations(Destination::stdout(), Destination::stderr())
    }

    /// Logger on custom destinations.
    pub fn with_destinations(stdout: Destination, stderr: Destination) -> Self {
        Self {
            stdout,
            stderr,
            ci: settings().ci,
            lock: AnimationLock::default(),
        }
    }

    /// Force CI mode on or off.
    pub fn ci(mut self, ci: bool) -> Self {
        self.ci = ci;
        self
    }

    /// Whether animations run in CI mode.
    pub fn is_ci(&self) -> bool {
        self.ci
    }

    fn destination(&self, level: Level) -> &Destination {
        if level.is_failure() {
            &self.stderr
        } else {
            &self.stdout
        }
    }
}

impl Default for TerminalLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for TerminalLogger {
    fn log(&self, level: Level, message: &dyn Message) {
        let _claim = self.lock.claim_output();

        let rendered = message.render_terminal();
        if rendered.is_empty() {
            return;
        }

        self.destination(level).write_line(&rendered);
        if level == Level::Fatal {
            exit_fatal();
        }
    }

    fn log_animated(&self, message: Arc<dyn AnimatedMessage>) -> AnimatedSession {
        let guard = self.lock.acquire();
        let frames = message.run_terminal(self.ci);
        let stdout = self.stdout.clone();

        AnimatedSession::start(message, guard, frames, move |frame: String| {
            if !frame.is_empty() {
                stdout.write_line(&frame);
            }
        })
    }
}
