//! Watch command

use anyhow::{Result, bail};
use quicklog::{Loader, LoaderConfig};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Options of an animated run.
#[derive(Debug)]
pub struct WatchArgs {
    pub label: String,
    pub steps: Vec<String>,
    pub interval: Duration,
    pub fail: Option<String>,
    pub done: String,
    pub json: bool,
}

/// Drive a loader through `args.steps`, then succeed or fail.
pub fn watch(args: &WatchArgs) -> Result<()> {
    let loader = Loader::new(args.label.as_str(), LoaderConfig::default());
    tracing::debug!(op_id = %loader.op_id(), steps = args.steps.len(), "watch started");

    let logger = super::logger(args.json);
    let mut session = logger.log_animated(Arc::new(loader.clone()));

    for step in &args.steps {
        thread::sleep(args.interval);
        loader.update(step);
    }
    thread::sleep(args.interval);

    match &args.fail {
        Some(reason) => loader.error(reason),
        None => loader.success(&args.done),
    }
    session.close();

    if let Some(reason) = &args.fail {
        bail!("operation failed: {reason}");
    }
    Ok(())
}
