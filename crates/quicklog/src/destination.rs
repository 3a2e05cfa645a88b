//! Output destinations
//!
//! A [`Destination`] is a shareable, locked writer. Loggers hold one per
//! stream and write whole renders through it, so frames printed from a drain
//! thread never interleave with each other mid-line.

use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

/// A cloneable handle to a locked byte writer.
#[derive(Clone)]
pub struct Destination {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Destination").finish_non_exhaustive()
    }
}

impl Destination {
    /// Wrap any writer.
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Process standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Process standard error.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// An in-memory destination, with a handle to read back what was written.
    pub fn capture() -> (Self, Capture) {
        let capture = Capture::default();
        (Self::new(capture.clone()), capture)
    }

    /// Write `text`, appending a newline if it lacks one, then flush.
    ///
    /// Write failures are reported through `tracing` and otherwise ignored:
    /// there is nowhere else to send them.
    pub fn write_line(&self, text: &str) {
        let mut writer = self.writer.lock();
        let result = write_text(&mut **writer, text);

        if let Err(err) = result {
            tracing::warn!("failed to write log output: {err}");
        }
    }
}

fn write_text(writer: &mut dyn Write, text: &str) -> io::Result<()> {
    writer.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Bytes collected by a [`Destination::capture`] destination.
#[derive(Clone, Default)]
pub struct Capture {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl fmt::Debug for Capture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capture")
            .field("len", &self.bytes.lock().len())
            .finish()
    }
}

impl Capture {
    /// Everything written so far, decoded as UTF-8 (lossily).
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.bytes.lock().is_empty()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_line_appends_newline() {
        let (dest, capture) = Destination::capture();
        dest.write_line("first");
        dest.write_line("second\n");
        assert_eq!(capture.contents(), "first\nsecond\n");
    }

    #[test]
    fn test_capture_shared_between_clones() {
        let (dest, capture) = Destination::capture();
        let other = dest.clone();
        assert!(capture.is_empty());
        other.write_line("from clone");
        assert_eq!(capture.contents(), "from clone\n");
    }
}
