//! Error reports

use crate::message::{Message, Record, render_with_child_json, render_with_child_terminal};
use crate::settings::term_width;
use crate::theme::{Ink, Theme, wrap_block};
use serde_json::Value;
use std::fmt;

/// An error, optionally preceded by a human explanation.
///
/// Renders nothing when neither the error nor the message is set.
pub struct ErrorMessage {
    error: Option<String>,
    message: String,
    child: Option<Box<dyn Message>>,
}

impl ErrorMessage {
    /// An explanation with no underlying error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: None,
            message: message.into(),
            child: None,
        }
    }

    /// Report `error` on its own.
    pub fn from_error(error: impl fmt::Display) -> Self {
        Self::new("").with_error(error)
    }

    /// Set the underlying error.
    pub fn with_error(mut self, error: impl fmt::Display) -> Self {
        self.error = Some(error.to_string());
        self
    }

    /// Attach a child rendered after the error.
    pub fn with_child(mut self, child: impl Message + 'static) -> Self {
        self.child = Some(Box::new(child));
        self
    }

    fn is_empty(&self) -> bool {
        self.error.is_none() && self.message.is_empty()
    }
}

impl fmt::Debug for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorMessage")
            .field("error", &self.error)
            .field("message", &self.message)
            .field("has_child", &self.child.is_some())
            .finish()
    }
}

fn push_block(out: &mut String, text: &str, ink: Ink, width: usize) {
    for line in wrap_block(text, width) {
        out.push_str(&ink.paint(&line));
        out.push('\n');
    }
}

impl Message for ErrorMessage {
    fn render_terminal(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let colors = Theme::default().colors;
        let width = term_width();
        let mut content = String::new();
        if !self.message.is_empty() {
            let ink = Ink::new(colors.text).on(colors.error_background);
            push_block(&mut content, &self.message, ink, width);
        }
        if let Some(error) = &self.error {
            push_block(&mut content, error, Ink::new(colors.error), width);
        }

        render_with_child_terminal(content, self.child.as_deref())
    }

    fn render_json(&self) -> Option<Record> {
        if self.is_empty() {
            return None;
        }

        let mut content = Record::new();
        match (&self.error, self.message.is_empty()) {
            (Some(error), true) => {
                content.insert("message".to_string(), Value::String(error.clone()));
            }
            (error, _) => {
                content.insert("message".to_string(), Value::String(self.message.clone()));
                if let Some(error) = error {
                    content.insert("error".to_string(), Value::String(error.clone()));
                }
            }
        }

        render_with_child_json(Some(content), self.child.as_deref())
    }
}
