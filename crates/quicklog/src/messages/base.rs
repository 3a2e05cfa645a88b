//! Plain text sections

use crate::message::{Message, Record, render_with_child_json, render_with_child_terminal};
use crate::settings::term_width;
use crate::theme::{Ink, Theme, wrap_block};
use serde_json::Value;
use std::fmt;

/// A block of text, wrapped and padded to the terminal width.
///
/// Use it to group related logs under a section: the optional child is
/// rendered right after the text.
pub struct BaseMessage {
    message: String,
    child: Option<Box<dyn Message>>,
}

impl BaseMessage {
    /// Create a message. An empty text renders nothing.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            child: None,
        }
    }

    /// Attach a child rendered after this message.
    pub fn with_child(mut self, child: impl Message + 'static) -> Self {
        self.child = Some(Box::new(child));
        self
    }
}

impl fmt::Debug for BaseMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseMessage")
            .field("message", &self.message)
            .field("has_child", &self.child.is_some())
            .finish()
    }
}

impl Message for BaseMessage {
    fn render_terminal(&self) -> String {
        if self.message.is_empty() {
            return String::new();
        }

        let ink = Ink::new(Theme::default().colors.text);
        let mut content = String::new();
        for line in wrap_block(&self.message, term_width()) {
            content.push_str(&ink.paint(&line));
            content.push('\n');
        }

        render_with_child_terminal(content, self.child.as_deref())
    }

    fn render_json(&self) -> Option<Record> {
        if self.message.is_empty() {
            return None;
        }

        let mut content = Record::new();
        content.insert("message".to_string(), Value::String(self.message.clone()));

        render_with_child_json(Some(content), self.child.as_deref())
    }
}
