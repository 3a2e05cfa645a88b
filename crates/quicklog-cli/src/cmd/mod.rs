//! Command modules - one file per CLI command

pub mod conflict;
pub mod demo;
pub mod log;
pub mod watch;

use quicklog::{JsonLogger, Logger, TerminalLogger};

/// The logger matching the requested output format.
pub fn logger(json: bool) -> Box<dyn Logger> {
    if json {
        Box::new(JsonLogger::new())
    } else {
        Box::new(TerminalLogger::new())
    }
}
