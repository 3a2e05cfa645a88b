//! Conflict command
//!
//! Breaks the animation rule on purpose. The logger aborts the process, so
//! this never returns normally.

use anyhow::Result;
use quicklog::{BaseMessage, Level, Loader, LoaderConfig, Logger, TerminalLogger};
use std::sync::Arc;

/// Start an animation, then log again on the same logger.
pub fn conflict(animated: bool) -> Result<()> {
    let logger = TerminalLogger::new().ci(true);
    let loader = Loader::new("Holding the terminal", LoaderConfig::default());
    let mut session = logger.log_animated(Arc::new(loader.clone()));

    if animated {
        let second = Loader::new("Second animation", LoaderConfig::default());
        let _second = logger.log_animated(Arc::new(second));
    } else {
        logger.log(Level::Info, &BaseMessage::new("This should not be printed"));
    }

    session.close();
    Ok(())
}
