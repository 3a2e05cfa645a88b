//! Theme - Design system constants
//!
//! This module defines the visual elements used by the built-in messages:
//! - Colors
//! - Icons
//! - Spinner glyph sets
//!
//! It also owns the painting and layout helpers, so styling is skipped in
//! one place when colors are disabled.

use crate::settings::settings;
use crossterm::style::{Attribute, Color, ContentStyle};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

/// Default theme for quicklog output
#[derive(Debug, Clone, Default)]
pub struct Theme {
    /// Colors for different UI elements
    pub colors: ColorScheme,
    /// Status icons
    pub icons: Icons,
}

/// Color scheme for UI elements
#[derive(Debug, Clone)]
pub struct ColorScheme {
    /// Primary text
    pub text: Color,
    /// Titles and borders
    pub accent: Color,
    /// Spinner glyphs
    pub spinner: Color,
    /// Success states
    pub success: Color,
    /// Error states
    pub error: Color,
    /// Background behind error descriptions
    pub error_background: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            text: Color::AnsiValue(15),
            accent: Color::AnsiValue(33),
            spinner: Color::AnsiValue(13),
            success: Color::AnsiValue(46),
            error: Color::AnsiValue(9),
            error_background: Color::AnsiValue(52),
        }
    }
}

/// Status icons for different states
#[derive(Debug, Clone)]
pub struct Icons {
    /// Success/completed state (✓)
    pub success: &'static str,
    /// Error/failed state (✗)
    pub error: &'static str,
}

impl Default for Icons {
    fn default() -> Self {
        Self {
            success: "✓",
            error: "✗",
        }
    }
}

/// A looping set of glyphs shown while an operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spinner {
    /// Glyphs, displayed in order
    pub frames: Vec<String>,
    /// Minimum time a glyph stays on screen
    pub interval: Duration,
}

impl Spinner {
    /// Create a spinner from glyphs and a per-glyph duration.
    pub fn new<I, S>(frames: I, interval: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            frames: frames.into_iter().map(Into::into).collect(),
            interval,
        }
    }

    /// A filling bar, 7 frames per second.
    pub fn meter() -> Self {
        Self::new(
            ["▱▱▱", "▰▱▱", "▰▰▱", "▰▰▰", "▰▰▱", "▰▱▱", "▱▱▱"],
            Duration::from_secs(1) / 7,
        )
    }

    /// Classic braille dots, 10 frames per second.
    pub fn dots() -> Self {
        Self::new(
            ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"],
            Duration::from_millis(100),
        )
    }

    /// A single line rotating, 10 frames per second.
    pub fn line() -> Self {
        Self::new(["|", "/", "-", "\\"], Duration::from_millis(100))
    }

    /// Glyph at position `index`, wrapping around.
    pub fn frame(&self, index: usize) -> &str {
        if self.frames.is_empty() {
            return "";
        }
        &self.frames[index % self.frames.len()]
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::meter()
    }
}

/// Builder for a text style. Renders plain text when colors are disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ink {
    style: ContentStyle,
}

impl Ink {
    /// A style with the given foreground color.
    pub fn new(color: Color) -> Self {
        let mut style = ContentStyle::new();
        style.foreground_color = Some(color);
        Self { style }
    }

    /// Set the background color.
    pub fn on(mut self, color: Color) -> Self {
        self.style.background_color = Some(color);
        self
    }

    /// Render in bold.
    pub fn bold(mut self) -> Self {
        self.style.attributes.set(Attribute::Bold);
        self
    }

    /// Render dimmed.
    pub fn dim(mut self) -> Self {
        self.style.attributes.set(Attribute::Dim);
        self
    }

    /// Apply the style to `text`, honoring the color setting.
    pub fn paint(&self, text: &str) -> String {
        if !settings().color || text.is_empty() {
            return text.to_string();
        }
        self.style.apply(text).to_string()
    }
}

/// Remove ANSI escape sequences (styles, cursor moves) from `text`.
pub fn strip_styles(text: &str) -> String {
    if text.contains('\x1b') {
        strip_ansi_escapes::strip_str(text)
    } else {
        text.to_string()
    }
}

/// Display width of `text`, ignoring ANSI escape sequences.
pub fn visible_width(text: &str) -> usize {
    if text.contains('\x1b') {
        strip_ansi_escapes::strip_str(text).width()
    } else {
        text.width()
    }
}

/// Pad `text` with spaces up to `width` display columns.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let current = visible_width(text);
    if current >= width {
        return text.to_string();
    }
    format!("{text}{}", " ".repeat(width - current))
}

/// Number of terminal rows `text` occupies at the given width.
///
/// Each newline-terminated line takes at least one row; lines wider than
/// `width` wrap onto extra rows.
pub fn rendered_rows(text: &str, width: usize) -> usize {
    let width = width.max(1);
    text.split_terminator('\n')
        .map(|line| visible_width(line).div_ceil(width).max(1))
        .sum()
}

/// Word-wrap `text` to `width` columns, padding every line to full width.
pub fn wrap_block(text: &str, width: usize) -> Vec<String> {
    textwrap::wrap(text, width.max(1))
        .into_iter()
        .map(|line| pad_to_width(&line, width))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_defaults() {
        let theme = Theme::default();
        assert_eq!(theme.icons.success, "✓");
        assert_eq!(theme.icons.error, "✗");
        assert_eq!(theme.colors.success, Color::AnsiValue(46));
    }

    #[test]
    fn test_spinner_frames_wrap() {
        let spinner = Spinner::new(["u", "w", "o"], Duration::from_secs(1));
        assert_eq!(spinner.frame(0), "u");
        assert_eq!(spinner.frame(2), "o");
        assert_eq!(spinner.frame(3), "u");

        let empty = Spinner::new(Vec::<String>::new(), Duration::from_secs(1));
        assert_eq!(empty.frame(4), "");
    }

    #[test]
    fn test_meter_spinner() {
        let meter = Spinner::meter();
        assert_eq!(meter.frames.len(), 7);
        assert_eq!(meter.interval, Duration::from_secs(1) / 7);
    }

    #[test]
    fn test_visible_width_ignores_escapes() {
        assert_eq!(visible_width("hello"), 5);
        assert_eq!(visible_width("\x1b[38;5;46mhello\x1b[39m"), 5);
        assert_eq!(visible_width("✓ done"), 6);
    }

    #[test]
    fn test_strip_styles() {
        assert_eq!(strip_styles("\x1b[1mbold\x1b[22m plain"), "bold plain");
        assert_eq!(strip_styles("plain"), "plain");
    }

    #[test]
    fn test_pad_to_width() {
        assert_eq!(pad_to_width("abc", 6), "abc   ");
        assert_eq!(pad_to_width("abcdef", 3), "abcdef");
    }

    #[test]
    fn test_rendered_rows() {
        assert_eq!(rendered_rows("", 80), 0);
        assert_eq!(rendered_rows("one\n", 80), 1);
        assert_eq!(rendered_rows("one\ntwo\n", 80), 2);
        assert_eq!(rendered_rows(&format!("{}\n", "x".repeat(100)), 80), 2);
        assert_eq!(rendered_rows("\n", 80), 1);
    }

    #[test]
    fn test_wrap_block_pads_lines() {
        let lines = wrap_block("alpha beta gamma", 11);
        assert_eq!(lines, vec!["alpha beta ", "gamma      "]);
    }
}
