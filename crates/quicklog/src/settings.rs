//! Environment-driven rendering settings
//!
//! Settings are read once per process and shared by every renderer:
//! - `TERM_WIDTH` overrides the fixed rendering width (default 80 columns)
//! - `CI=true` selects append-only output for animated messages
//! - `NO_COLOR` (or a non-terminal stdout) disables styling

use std::io::IsTerminal;
use std::num::ParseIntError;
use std::sync::OnceLock;
use thiserror::Error;

/// Environment variable overriding the rendering width.
pub const TERM_WIDTH_ENV: &str = "TERM_WIDTH";

/// Environment variable selecting CI (non-interactive) rendering when set to `true`.
pub const CI_ENV: &str = "CI";

/// Environment variable disabling colors when present.
pub const NO_COLOR_ENV: &str = "NO_COLOR";

/// Width used when `TERM_WIDTH` is absent, empty, zero or invalid.
pub const DEFAULT_TERM_WIDTH: usize = 80;

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Errors raised while reading settings from the environment.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// `TERM_WIDTH` is not a non-negative integer.
    #[error("invalid TERM_WIDTH value {value:?}: {source}")]
    InvalidTermWidth {
        /// The raw environment value.
        value: String,
        /// The underlying parse failure.
        #[source]
        source: ParseIntError,
    },
}

/// Rendering settings shared by all messages and loggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Fixed width, in columns, used to pad and align terminal output.
    pub term_width: usize,
    /// Whether the process runs in a CI environment.
    pub ci: bool,
    /// Whether ANSI styling is emitted.
    pub color: bool,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        let color = std::io::stdout().is_terminal();
        Self::from_lookup(|key| std::env::var(key).ok(), color)
    }

    /// Build settings from an arbitrary variable lookup.
    ///
    /// `terminal` tells whether the output is attached to a terminal; colors
    /// are only enabled for terminals without `NO_COLOR`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>, terminal: bool) -> Self {
        let term_width = match lookup(TERM_WIDTH_ENV).as_deref().map(parse_term_width) {
            Some(Ok(Some(width))) => width,
            Some(Ok(None)) | None => DEFAULT_TERM_WIDTH,
            Some(Err(err)) => {
                tracing::warn!(
                    "failed to parse {TERM_WIDTH_ENV}, using default width {DEFAULT_TERM_WIDTH}: {err}"
                );
                DEFAULT_TERM_WIDTH
            }
        };

        Self {
            term_width,
            ci: lookup(CI_ENV).as_deref() == Some("true"),
            color: terminal && lookup(NO_COLOR_ENV).is_none(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            term_width: DEFAULT_TERM_WIDTH,
            ci: false,
            color: false,
        }
    }
}

/// Parse a `TERM_WIDTH` value.
///
/// Returns `Ok(None)` when the value asks for the default (empty or zero).
///
/// # Errors
///
/// Returns [`SettingsError::InvalidTermWidth`] when the value is not a
/// non-negative integer.
pub fn parse_term_width(raw: &str) -> Result<Option<usize>, SettingsError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let width: usize = trimmed
        .parse()
        .map_err(|source| SettingsError::InvalidTermWidth {
            value: raw.to_string(),
            source,
        })?;

    Ok((width > 0).then_some(width))
}

/// Process-wide settings, read from the environment on first access.
pub fn settings() -> &'static Settings {
    SETTINGS.get_or_init(Settings::from_env)
}

/// Current rendering width.
pub fn term_width() -> usize {
    settings().term_width
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_term_width_default() {
        let settings = Settings::from_lookup(lookup(&[]), false);
        assert_eq!(settings.term_width, 80);

        let settings = Settings::from_lookup(lookup(&[("TERM_WIDTH", "")]), false);
        assert_eq!(settings.term_width, 80);
    }

    #[test]
    fn test_term_width_override() {
        let settings = Settings::from_lookup(lookup(&[("TERM_WIDTH", "120")]), false);
        assert_eq!(settings.term_width, 120);
    }

    #[test]
    fn test_term_width_invalid_falls_back() {
        let settings = Settings::from_lookup(lookup(&[("TERM_WIDTH", "foobar")]), false);
        assert_eq!(settings.term_width, 80);

        let settings = Settings::from_lookup(lookup(&[("TERM_WIDTH", "-12")]), false);
        assert_eq!(settings.term_width, 80);
    }

    #[test]
    fn test_parse_term_width() {
        assert_eq!(parse_term_width("100").unwrap(), Some(100));
        assert_eq!(parse_term_width(" 42 ").unwrap(), Some(42));
        assert_eq!(parse_term_width("0").unwrap(), None);
        assert_eq!(parse_term_width("").unwrap(), None);

        let err = parse_term_width("wide").unwrap_err();
        assert!(err.to_string().contains("TERM_WIDTH"));
        assert!(err.to_string().contains("\"wide\""));
    }

    #[test]
    fn test_ci_flag() {
        assert!(Settings::from_lookup(lookup(&[("CI", "true")]), false).ci);
        assert!(!Settings::from_lookup(lookup(&[("CI", "1")]), false).ci);
        assert!(!Settings::from_lookup(lookup(&[]), false).ci);
    }

    #[test]
    fn test_color_requires_terminal() {
        assert!(Settings::from_lookup(lookup(&[]), true).color);
        assert!(!Settings::from_lookup(lookup(&[]), false).color);
        assert!(!Settings::from_lookup(lookup(&[("NO_COLOR", "1")]), true).color);
    }
}
