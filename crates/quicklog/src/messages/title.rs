//! Section headings

use crate::message::{Message, Record, render_with_child_json, render_with_child_terminal};
use crate::settings::term_width;
use crate::theme::{Ink, Theme, wrap_block};
use serde_json::Value;
use std::fmt;

/// A heading drawn inside a rounded box, with an optional description.
pub struct TitleMessage {
    title: String,
    description: String,
    child: Option<Box<dyn Message>>,
}

impl TitleMessage {
    /// Create a title. An empty title renders nothing.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            child: None,
        }
    }

    /// Add a dimmed line under the title.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach a child rendered below the box.
    pub fn with_child(mut self, child: impl Message + 'static) -> Self {
        self.child = Some(Box::new(child));
        self
    }
}

impl fmt::Debug for TitleMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TitleMessage")
            .field("title", &self.title)
            .field("description", &self.description)
            .field("has_child", &self.child.is_some())
            .finish()
    }
}

impl Message for TitleMessage {
    fn render_terminal(&self) -> String {
        if self.title.is_empty() {
            return String::new();
        }

        let theme = Theme::default();
        let border = Ink::new(theme.colors.accent);
        let width = term_width();
        // One column of padding on each side of the content.
        let inner = width.saturating_sub(2).max(1);

        let mut lines = wrap_block(&self.title, inner)
            .into_iter()
            .map(|line| Ink::new(theme.colors.accent).bold().paint(&line))
            .collect::<Vec<_>>();
        if !self.description.is_empty() {
            lines.extend(
                wrap_block(&self.description, inner)
                    .into_iter()
                    .map(|line| Ink::new(theme.colors.accent).dim().paint(&line)),
            );
        }

        let rule = "─".repeat(width);
        let mut content = border.paint(&format!("╭{rule}╮"));
        content.push('\n');
        for line in lines {
            content.push_str(&border.paint("│ "));
            content.push_str(&line);
            content.push_str(&border.paint(" │"));
            content.push('\n');
        }
        content.push_str(&border.paint(&format!("╰{rule}╯")));
        content.push('\n');

        render_with_child_terminal(content, self.child.as_deref())
    }

    fn render_json(&self) -> Option<Record> {
        if self.title.is_empty() {
            return None;
        }

        let mut content = Record::new();
        content.insert("message".to_string(), Value::String(self.title.clone()));
        if !self.description.is_empty() {
            content.insert("content".to_string(), Value::String(self.description.clone()));
        }

        render_with_child_json(Some(content), self.child.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::BaseMessage;
    use crate::theme::strip_styles;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn boxed(lines: &[&str]) -> String {
        let width = term_width();
        let rule = "─".repeat(width);
        let mut out = format!("╭{rule}╮\n");
        for line in lines {
            out.push_str(&format!("│ {line:<inner$} │\n", inner = width - 2));
        }
        out.push_str(&format!("╰{rule}╯\n"));
        out
    }

    #[test]
    fn test_empty_title_renders_nothing() {
        let message = TitleMessage::new("").with_description("ignored");
        assert_eq!(message.render_terminal(), "");
        assert_eq!(message.render_json(), None);
    }

    #[test]
    fn test_title_box() {
        let rendered = strip_styles(&TitleMessage::new("Hello, world!").render_terminal());
        assert_eq!(rendered, boxed(&["Hello, world!"]));
    }

    #[test]
    fn test_title_with_description() {
        let rendered = strip_styles(
            &TitleMessage::new("Hello, world!")
                .with_description("This is a description.")
                .render_terminal(),
        );
        assert_eq!(
            rendered,
            boxed(&["Hello, world!", "This is a description."])
        );
    }

    #[test]
    fn test_title_with_child() {
        let rendered = strip_styles(
            &TitleMessage::new("Hello, world!")
                .with_child(BaseMessage::new("Child message"))
                .render_terminal(),
        );
        let child = format!("{:<width$}\n", "Child message", width = term_width());
        assert_eq!(rendered, boxed(&["Hello, world!"]) + &child);
    }

    #[test]
    fn test_json() {
        let plain = TitleMessage::new("Hello").render_json().unwrap();
        assert_eq!(Value::Object(plain), json!({"message": "Hello"}));

        let described = TitleMessage::new("Hello")
            .with_description("world")
            .with_child(BaseMessage::new("child"))
            .render_json()
            .unwrap();
        assert_eq!(
            Value::Object(described),
            json!({"message": "Hello", "content": "world", "data": {"message": "child"}})
        );
    }
}
