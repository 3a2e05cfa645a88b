//! Structured output: one JSON object per line

use super::{AnimatedSession, AnimationLock, Logger, exit_fatal};
use crate::destination::Destination;
use crate::level::Level;
use crate::message::{AnimatedMessage, Message, Record};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Key holding the level name in every line.
pub const LEVEL_KEY: &str = "level";

/// Prints structured renders as JSON lines, tagged with their level.
///
/// Animated frames are logged at [`Level::Info`].
#[derive(Debug, Clone)]
pub struct JsonLogger {
    out: Destination,
    lock: AnimationLock,
}

impl JsonLogger {
    /// Logger writing to standard output.
    pub fn new() -> Self {
        Self::with_destination(Destination::stdout())
    }

    /// Logger writing to `out`.
    pub fn with_destination(out: Destination) -> Self {
        Self {
            out,
            lock: AnimationLock::default(),
        }
    }
}

impl Default for JsonLogger {
    fn default() -> Self {
        Self::new()
    }
}

fn write_record(out: &Destination, level: Level, mut record: Record) {
    record.insert(LEVEL_KEY.to_string(), Value::String(level.as_str().to_string()));
    match serde_json::to_string(&record) {
        Ok(line) => out.write_line(&line),
        Err(err) => warn!("failed to encode log record: {err}"),
    }
}

impl Logger for JsonLogger {
    fn log(&self, level: Level, message: &dyn Message) {
        let _claim = self.lock.claim_output();

        let Some(record) = message.render_json() else {
            return;
        };

        write_record(&self.out, level, record);
        if level == Level::Fatal {
            exit_fatal();
        }
    }

    fn log_animated(&self, message: Arc<dyn AnimatedMessage>) -> AnimatedSession {
        let guard = self.lock.acquire();
        let frames = message.run_json();
        let out = self.out.clone();

        AnimatedSession::start(message, guard, frames, move |record: Record| {
            write_record(&out, Level::Info, record);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loggers::testing::Scripted;
    use crate::messages::{BaseMessage, ErrorMessage, TitleMessage};
    use serde_json::json;

    fn lines(contents: &str) -> Vec<Value> {
        contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_line_format() {
        let (out, capture) = Destination::capture();
        let logger = JsonLogger::with_destination(out);

        logger.log(Level::Info, &BaseMessage::new("hello"));
        assert_eq!(capture.contents(), "{\"level\":\"info\",\"message\":\"hello\"}\n");
    }

    #[test]
    fn test_level_names() {
        let (out, capture) = Destination::capture();
        let logger = JsonLogger::with_destination(out);

        logger.log(Level::Warning, &TitleMessage::new("title").with_description("body"));
        logger.log(Level::Error, &ErrorMessage::new("failed").with_error("boom"));

        assert_eq!(
            lines(&capture.contents()),
            vec![
                json!({"level": "warn", "message": "title", "content": "body"}),
                json!({"level": "error", "message": "failed", "error": "boom"}),
            ]
        );
    }

    #[test]
    fn test_empty_render_is_skipped() {
        let (out, capture) = Destination::capture();
        JsonLogger::with_destination(out).log(Level::Info, &BaseMessage::new(""));
        assert!(capture.is_empty());
    }

    #[test]
    fn test_animation_frames_logged_at_info() {
        let (out, capture) = Destination::capture();
        let logger = JsonLogger::with_destination(out);
        let message = Arc::new(Scripted::default());

        let mut session = logger.log_animated(message.clone());
        let mut record = Record::new();
        record.insert("message".to_string(), json!("step"));
        message.push_json(record);
        session.close();

        assert_eq!(
            lines(&capture.contents()),
            vec![json!({"level": "info", "message": "step"})]
        );
    }
}
