//! One-shot messages through both loggers.

use pretty_assertions::assert_eq;
use quicklog::settings::term_width;
use quicklog::theme::strip_styles;
use quicklog::{
    BaseMessage, Destination, ErrorMessage, JsonLogger, Level, Logger, TerminalLogger,
    TitleMessage,
};
use serde_json::{Value, json};

fn section() -> TitleMessage {
    TitleMessage::new("Deploy")
        .with_description("staging")
        .with_child(BaseMessage::new("3 services").with_child(ErrorMessage::new("1 skipped")))
}

#[test]
fn test_terminal_renders_message_tree() {
    let (stdout, out) = Destination::capture();
    let (stderr, err) = Destination::capture();
    let logger = TerminalLogger::with_destinations(stdout, stderr);

    logger.log(Level::Info, &section());

    let width = term_width();
    let rule = "─".repeat(width);
    let expected = [
        format!("╭{rule}╮"),
        format!("│ {:<inner$} │", "Deploy", inner = width - 2),
        format!("│ {:<inner$} │", "staging", inner = width - 2),
        format!("╰{rule}╯"),
        format!("{:<width$}", "3 services"),
        format!("{:<width$}", "1 skipped"),
    ]
    .join("\n")
        + "\n";

    assert_eq!(strip_styles(&out.contents()), expected);
    assert!(err.is_empty());
}

#[test]
fn test_json_renders_message_tree() {
    let (out, capture) = Destination::capture();
    let logger = JsonLogger::with_destination(out);

    logger.log(Level::Info, &section());

    let record: Value = serde_json::from_str(capture.contents().trim_end()).unwrap();
    assert_eq!(
        record,
        json!({
            "level": "info",
            "message": "Deploy",
            "content": "staging",
            "data": {
                "message": "3 services",
                "data": {"message": "1 skipped"},
            },
        })
    );
}

#[test]
fn test_silent_messages_print_nothing() {
    let (stdout, out) = Destination::capture();
    let (stderr, err) = Destination::capture();
    let terminal = TerminalLogger::with_destinations(stdout, stderr);
    let (json_out, json_capture) = Destination::capture();
    let json = JsonLogger::with_destination(json_out);

    let silent = TitleMessage::new("").with_child(BaseMessage::new("orphan"));
    for level in [Level::Info, Level::Warning, Level::Error] {
        terminal.log(level, &silent);
        json.log(level, &silent);
    }

    assert!(out.is_empty());
    assert!(err.is_empty());
    assert!(json_capture.is_empty());
}
