//! Time utilities

use std::fmt::Write;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Local};

use crate::constants::{TIME_FORMAT, TIME_TERMINAL_FORMAT};

/// Current wall-clock time in the local timezone
pub fn now_local() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

/// Format a timestamp as `YYYY-MM-DDThh:mm:ss±hhmm`
pub fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.format(TIME_FORMAT).to_string()
}

/// Format a timestamp as `YYYY-MM-DD hh:mm` for terminal output
pub fn format_terminal_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.format(TIME_TERMINAL_FORMAT).to_string()
}

/// Format an elapsed duration the way Go prints `time.Duration`
///
/// Sub-second values use the largest fitting unit (`ns`, `µs`, `ms`) with
/// trailing fractional zeros trimmed; longer values are split into
/// hours, minutes and seconds (`1h0m5s`, `1m30s`, `1.5s`).
pub fn format_elapsed(duration: Duration) -> String {
    let nanos = duration.as_nanos();

    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{}ns", nanos);
    }
    if nanos < 1_000_000 {
        return with_fraction(nanos, 1_000, "µs");
    }
    if nanos < 1_000_000_000 {
        return with_fraction(nanos, 1_000_000, "ms");
    }

    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = u128::from(total_seconds % 60) * 1_000_000_000
        + u128::from(duration.subsec_nanos());

    let mut out = String::new();
    if hours > 0 {
        let _ = write!(out, "{}h{}m", hours, minutes);
    } else if minutes > 0 {
        let _ = write!(out, "{}m", minutes);
    }
    out.push_str(&with_fraction(seconds, 1_000_000_000, "s"));
    out
}

fn with_fraction(value: u128, unit: u128, suffix: &str) -> String {
    let whole = value / unit;
    let fraction = value % unit;
    if fraction == 0 {
        return format!("{}{}", whole, suffix);
    }

    let width = unit.ilog10() as usize;
    let digits = format!("{:0width$}", fraction, width = width);
    format!("{}.{}{}", whole, digits.trim_end_matches('0'), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::ZERO), "0s");
        assert_eq!(format_elapsed(Duration::from_nanos(850)), "850ns");
        assert_eq!(format_elapsed(Duration::from_nanos(1_500)), "1.5µs");
        assert_eq!(format_elapsed(Duration::from_millis(12)), "12ms");
        assert_eq!(format_elapsed(Duration::from_micros(12_345)), "12.345ms");
        assert_eq!(format_elapsed(Duration::from_millis(1_500)), "1.5s");
        assert_eq!(format_elapsed(Duration::from_secs(90)), "1m30s");
        assert_eq!(format_elapsed(Duration::from_secs(3605)), "1h0m5s");
        assert_eq!(format_elapsed(Duration::from_secs(3661)), "1h1m1s");
    }

    #[test]
    fn test_format_timestamp() {
        let offset = FixedOffset::east_opt(3600).unwrap();
        let ts = offset.with_ymd_and_hms(2024, 1, 15, 12, 5, 9).unwrap();
        assert_eq!(format_timestamp(&ts), "2024-01-15T12:05:09+0100");
        assert_eq!(format_terminal_timestamp(&ts), "2024-01-15 12:05");

        let west = FixedOffset::west_opt(5 * 3600 + 1800).unwrap();
        let ts = west.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(format_timestamp(&ts), "2023-12-31T23:59:59-0530");
    }
}
