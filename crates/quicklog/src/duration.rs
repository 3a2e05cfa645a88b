//! Human-readable elapsed times
//!
//! Durations are printed with the shortest unit that keeps the integer part
//! non-zero (`ns`, `µs`, `ms`, then `h`/`m`/`s`), with trailing zeros trimmed
//! from the fraction: `850ns`, `12.5µs`, `5.123456ms`, `3.25s`, `1m5s`.

use std::fmt::Write;
use std::time::Duration;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Format a duration for display.
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();

    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < NANOS_PER_MICRO {
        return format!("{nanos}ns");
    }
    if nanos < NANOS_PER_MILLI {
        return format!("{}µs", fixed_point(nanos, 3));
    }
    if nanos < NANOS_PER_SEC {
        return format!("{}ms", fixed_point(nanos, 6));
    }

    let total_secs = nanos / NANOS_PER_SEC;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds_nanos = nanos % (60 * NANOS_PER_SEC);

    let mut out = String::new();
    if hours > 0 {
        let _ = write!(out, "{hours}h");
    }
    if hours > 0 || minutes > 0 {
        let _ = write!(out, "{minutes}m");
    }
    let _ = write!(out, "{}s", fixed_point(seconds_nanos, 9));
    out
}

/// Round an elapsed time so the display does not carry long fractions.
///
/// From 10s on, rounds to whole seconds; from 10ms on, to whole
/// milliseconds; shorter durations are kept as is.
pub fn round_elapsed(elapsed: Duration) -> Duration {
    if elapsed >= Duration::from_secs(10) {
        round_to(elapsed, NANOS_PER_SEC)
    } else if elapsed >= Duration::from_millis(10) {
        round_to(elapsed, NANOS_PER_MILLI)
    } else {
        elapsed
    }
}

/// Round half away from zero to a multiple of `unit` nanoseconds.
fn round_to(duration: Duration, unit: u128) -> Duration {
    let rounded = (duration.as_nanos() + unit / 2) / unit * unit;
    Duration::from_nanos(u64::try_from(rounded).unwrap_or(u64::MAX))
}

/// Render `value / 10^digits` with the fraction's trailing zeros removed.
fn fixed_point(value: u128, digits: u32) -> String {
    let scale = 10u128.pow(digits);
    let integer = value / scale;
    let fraction = value % scale;

    if fraction == 0 {
        return integer.to_string();
    }

    let padded = format!("{fraction:0width$}", width = digits as usize);
    format!("{integer}.{}", padded.trim_end_matches('0'))
}
