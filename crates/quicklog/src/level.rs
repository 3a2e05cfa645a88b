//! Log levels

use serde::{Deserialize, Serialize};
use std::fmt;

/// Importance of a log message.
///
/// Loggers may route levels to different destinations. [`Level::Fatal`]
/// terminates the process once the message is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// General information.
    Info,
    /// Not an error, but may require attention.
    #[serde(rename = "warn")]
    Warning,
    /// An error occurred.
    Error,
    /// An unrecoverable error occurred; the process exits after logging.
    Fatal,
}

impl Level {
    /// Name used in structured records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }

    /// Whether the level reports a failure.
    pub fn is_failure(self) -> bool {
        matches!(self, Self::Error | Self::Fatal)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_names() {
        assert_eq!(Level::Info.as_str(), "info");
        assert_eq!(Level::Warning.to_string(), "warn");
        assert_eq!(
            serde_json::to_string(&Level::Warning).unwrap(),
            "\"warn\""
        );
        assert_eq!(serde_json::to_string(&Level::Fatal).unwrap(), "\"fatal\"");
    }

    #[test]
    fn test_failure_levels() {
        assert!(Level::Error.is_failure());
        assert!(Level::Fatal.is_failure());
        assert!(!Level::Warning.is_failure());
        assert!(!Level::Info.is_failure());
    }
}
