//! Annotation values and their single-line text form
//!
//! Values attached to a request are a closed set of variants. Each variant has
//! one canonical rendering, and every free-form text passes through [`escape`]
//! so that a rendered value never breaks the line it is placed in.

use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, TimeZone};

use crate::constants::FLOAT_PRECISION;
use crate::utils::time::{format_elapsed, format_timestamp};

/// A value attached to a request annotation
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value, including `None` of any optional type
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
    /// Message of an error value
    Error(String),
    Time(DateTime<FixedOffset>),
    /// Default string conversion of any other type
    Other(String),
}

impl Value {
    /// Capture an error by its message
    pub fn error(err: &(dyn std::error::Error + '_)) -> Self {
        Value::Error(err.to_string())
    }

    /// Capture any displayable value
    pub fn display(value: impl fmt::Display) -> Self {
        Value::Other(value.to_string())
    }

    /// Capture any value by its debug representation
    pub fn debug(value: impl fmt::Debug) -> Self {
        Value::Other(format!("{:?}", value))
    }

    /// Key text, if this value can be used as an annotation key
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_value(self))
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(v as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Uint(v as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Str(v.clone())
    }
}

impl From<Cow<'_, str>> for Value {
    fn from(v: Cow<'_, str>) -> Self {
        Value::Str(v.into_owned())
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Nil
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(v: DateTime<Tz>) -> Self {
        Value::Time(v.fixed_offset())
    }
}

impl From<Duration> for Value {
    fn from(v: Duration) -> Self {
        Value::Other(format_elapsed(v))
    }
}

impl From<anyhow::Error> for Value {
    fn from(v: anyhow::Error) -> Self {
        Value::Error(v.to_string())
    }
}

impl From<&anyhow::Error> for Value {
    fn from(v: &anyhow::Error) -> Self {
        Value::Error(v.to_string())
    }
}

impl From<std::io::Error> for Value {
    fn from(v: std::io::Error) -> Self {
        Value::error(&v)
    }
}

/// Render a value as single-line text
pub fn format_value(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Nil => Cow::Borrowed("nil"),
        Value::Bool(true) => Cow::Borrowed("true"),
        Value::Bool(false) => Cow::Borrowed("false"),
        Value::Int(v) => Cow::Owned(v.to_string()),
        Value::Uint(v) => Cow::Owned(v.to_string()),
        Value::Float(v) if v.is_nan() => Cow::Borrowed("NaN"),
        Value::Float(v) if v.is_infinite() => {
            Cow::Borrowed(if v.is_sign_positive() { "+Inf" } else { "-Inf" })
        }
        Value::Float(v) => Cow::Owned(format!("{:.*}", FLOAT_PRECISION, v)),
        // The timestamp pattern never produces escapable characters.
        Value::Time(v) => Cow::Owned(format_timestamp(v)),
        Value::Str(s) | Value::Error(s) | Value::Other(s) => escape(s),
    }
}

/// Escape text for a `key:value` token
///
/// Text containing a space, a control character other than tab, `=`, `"` or
/// `:` is wrapped in double quotes. Backslash and double quote are
/// backslash-escaped and newline, carriage return and tab become `\n`, `\r`
/// and `\t`. Text needing neither treatment is returned as-is without
/// allocating.
pub fn escape(s: &str) -> Cow<'_, str> {
    let mut needs_quotes = false;
    let mut needs_escape = false;
    for c in s.chars() {
        if (c <= ' ' && c != '\t') || c == '=' || c == '"' || c == ':' {
            needs_quotes = true;
        }
        if matches!(c, '\\' | '"' | '\n' | '\r' | '\t') {
            needs_escape = true;
        }
    }
    if !needs_quotes && !needs_escape {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 8);
    if needs_quotes {
        out.push('"');
    }
    for c in s.chars() {
        match c {
            '\\' | '"' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    if needs_quotes {
        out.push('"');
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_escape_plain_text_is_borrowed() {
        for s in ["", "hello", "/api/v1/items", "ünïcødé-ok", "a,b;c"] {
            assert!(matches!(escape(s), Cow::Borrowed(b) if b == s));
        }
    }

    #[test]
    fn test_escape_tab_only_is_not_quoted() {
        assert_eq!(escape("\t"), "\\t");
        assert_eq!(escape("a\tb"), "a\\tb");
        assert_eq!(escape("\\"), "\\\\");
        assert_eq!(escape("path\\to"), "path\\\\to");
    }

    #[test]
    fn test_escape_space_is_quoted() {
        assert_eq!(escape("hello world"), "\"hello world\"");
        assert_eq!(escape("k=v"), "\"k=v\"");
        assert_eq!(escape("a:b"), "\"a:b\"");
    }

    #[test]
    fn test_escape_quotes_and_newlines() {
        assert_eq!(escape("say \"hi\""), r#""say \"hi\"""#);
        assert_eq!(escape("line1\nline2\r"), r#""line1\nline2\r""#);
        assert_eq!(escape("a\nb"), r#""a\nb""#);
        assert_eq!(escape("\r"), r#""\r""#);
        assert_eq!(escape("two\nlines here"), r#""two\nlines here""#);
        assert_eq!(escape("bell\u{7}"), "\"bell\u{7}\"");
        assert_eq!(escape("héllo wörld"), "\"héllo wörld\"");
    }

    #[test]
    fn test_escape_output_is_single_line() {
        let escaped = escape("a\nb\rc\td");
        assert!(!escaped.contains('\n'));
        assert!(!escaped.contains('\r'));
        assert!(!escaped.contains('\t'));
    }

    #[test]
    fn test_format_nil() {
        assert_eq!(format_value(&Value::Nil), "nil");
        assert_eq!(format_value(&Value::from(None::<String>)), "nil");
        assert_eq!(format_value(&Value::from(None::<i32>)), "nil");
        assert_eq!(format_value(&Value::from(())), "nil");
        // A typed zero value is not nil.
        assert_eq!(format_value(&Value::from(Some(0))), "0");
    }

    #[test]
    fn test_format_scalars() {
        assert_eq!(format_value(&Value::from(true)), "true");
        assert_eq!(format_value(&Value::from(false)), "false");
        assert_eq!(format_value(&Value::from(-42i8)), "-42");
        assert_eq!(format_value(&Value::from(u64::MAX)), "18446744073709551615");
        assert_eq!(format_value(&Value::from(1_000_000usize)), "1000000");
    }

    #[test]
    fn test_format_float_three_decimals() {
        assert_eq!(format_value(&Value::from(3.14159f64)), "3.142");
        assert_eq!(format_value(&Value::from(2.0f64)), "2.000");
        assert_eq!(format_value(&Value::from(0.5f32)), "0.500");
        assert_eq!(format_value(&Value::from(-1.23456f64)), "-1.235");
    }

    #[test]
    fn test_format_float_non_finite() {
        assert_eq!(format_value(&Value::from(f64::INFINITY)), "+Inf");
        assert_eq!(format_value(&Value::from(f64::NEG_INFINITY)), "-Inf");
        assert_eq!(format_value(&Value::from(f64::NAN)), "NaN");
        assert_eq!(format_value(&Value::from(f32::INFINITY)), "+Inf");
    }

    #[test]
    fn test_format_text_and_errors() {
        assert_eq!(format_value(&Value::from("plain")), "plain");
        assert_eq!(format_value(&Value::from("two words")), "\"two words\"");

        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        assert_eq!(format_value(&Value::from(err)), "\"file missing\"");

        let err = anyhow::anyhow!("boom");
        assert_eq!(format_value(&Value::from(&err)), "boom");

        assert_eq!(format_value(&Value::display(std::net::Ipv4Addr::LOCALHOST)), "127.0.0.1");
        assert_eq!(format_value(&Value::debug(vec![1, 2])), "\"[1, 2]\"");
    }

    #[test]
    fn test_format_time() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let ts = offset.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        assert_eq!(format_value(&Value::from(ts)), "2024-03-01T08:30:00+0200");

        let utc = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        assert_eq!(format_value(&Value::from(utc)), "2024-03-01T08:30:00+0000");
    }

    #[test]
    fn test_format_duration_value() {
        assert_eq!(format_value(&Value::from(Duration::from_millis(250))), "250ms");
    }

    #[test]
    fn test_only_text_is_a_key() {
        assert_eq!(Value::from("k").as_key(), Some("k"));
        assert_eq!(Value::from(1).as_key(), None);
        assert_eq!(Value::Other("k".to_string()).as_key(), None);
    }
}
