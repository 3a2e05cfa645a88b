//! Message contract and composition helpers
//!
//! A [`Message`] renders the same log event two ways: as terminal text and as
//! a structured [`Record`]. Messages can carry a child message; the helpers in
//! this module append the child's render to the parent's, and every built-in
//! message goes through them so the rules stay the same everywhere:
//!
//! - an empty parent renders nothing, whatever the child (a child is an
//!   addition, never a substitute);
//! - a child's record is stored under the reserved `data` key.

use crate::frames::Frames;
use serde_json::{Map, Value};

/// Structured form of a message: a flat mapping with string keys.
pub type Record = Map<String, Value>;

/// Key holding a child's record inside its parent's record.
pub const DATA_KEY: &str = "data";

/// A log event that can be rendered for terminals and for structured logs.
pub trait Message: Send + Sync {
    /// Render for terminal output. An empty string means "nothing to log".
    fn render_terminal(&self) -> String;

    /// Render for structured output. `None` means "nothing to log".
    fn render_json(&self) -> Option<Record>;
}

impl<M: Message + ?Sized> Message for Box<M> {
    fn render_terminal(&self) -> String {
        (**self).render_terminal()
    }

    fn render_json(&self) -> Option<Record> {
        (**self).render_json()
    }
}

impl<M: Message + ?Sized> Message for std::sync::Arc<M> {
    fn render_terminal(&self) -> String {
        (**self).render_terminal()
    }

    fn render_json(&self) -> Option<Record> {
        (**self).render_json()
    }
}

/// A message whose output changes over time.
///
/// Loggers subscribe to one of the frame streams and print every frame until
/// the stream ends, which happens when the message is closed.
pub trait AnimatedMessage: Send + Sync {
    /// Start producing terminal frames.
    ///
    /// With `ci` set, the message only emits frames on explicit state
    /// changes; otherwise it may refresh itself periodically.
    fn run_terminal(&self, ci: bool) -> Frames<String>;

    /// Start producing structured frames. Never refreshes on its own.
    fn run_json(&self) -> Frames<Record>;

    /// Stop producing frames and end both streams.
    fn close(&self);
}

/// Render a parent with its optional child, in terminal format.
pub fn render_with_child_terminal(parent: String, child: Option<&dyn Message>) -> String {
    if parent.is_empty() {
        return String::new();
    }

    match child {
        Some(child) => parent + &child.render_terminal(),
        None => parent,
    }
}

/// Render a parent with its optional child, in structured format.
pub fn render_with_child_json(parent: Option<Record>, child: Option<&dyn Message>) -> Option<Record> {
    let mut parent = parent?;

    if let Some(child) = child {
        let data = child.render_json().map_or(Value::Null, Value::Object);
        parent.insert(DATA_KEY.to_string(), data);
    }

    Some(parent)
}
