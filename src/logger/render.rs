//! Request line rendering
//!
//! A finished request is rendered as its fixed fields followed by the
//! annotation tokens, either colorized for a terminal or plain for syslog.

use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use colored::{Color, Colorize};

use super::format::{escape, format_value};
use super::store::Annotations;
use crate::utils::time::{format_elapsed, format_terminal_timestamp, format_timestamp};

/// Fixed fields of a finished request
#[derive(Debug, Clone)]
pub struct RequestRecord {
    pub method: String,
    pub url: String,
    pub status: u16,
    /// Response body bytes written, summed across all writes
    pub size: u64,
    pub elapsed: Duration,
    /// Moment the line is rendered
    pub timestamp: DateTime<FixedOffset>,
}

/// Display class of a response status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Informational,
    Success,
    Redirection,
    ClientError,
    ServerError,
}

impl StatusClass {
    pub fn from_status(status: u16) -> Self {
        match status {
            s if s < 200 => Self::Informational,
            s if s < 300 => Self::Success,
            s if s < 400 => Self::Redirection,
            s if s < 500 => Self::ClientError,
            _ => Self::ServerError,
        }
    }

    /// Terminal color for the status code
    pub fn color(self) -> Color {
        match self {
            Self::Informational => Color::Blue,
            Self::Success => Color::Green,
            Self::Redirection => Color::Cyan,
            Self::ClientError => Color::Yellow,
            Self::ServerError => Color::Red,
        }
    }
}

/// Sink-level priority of a request line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn from_status(status: u16) -> Self {
        match status {
            s if s < 400 => Self::Info,
            s if s < 500 => Self::Warning,
            _ => Self::Error,
        }
    }
}

/// Color of annotation keys on terminal lines
const KEY_COLOR: Color = Color::Magenta;

/// Render a colorized two-line entry for terminal output
///
/// The first line holds the fixed fields, the second the annotation tokens.
/// The entry always ends with a newline.
pub fn render_terminal(record: &RequestRecord, annotations: &Annotations) -> String {
    let status = record
        .status
        .to_string()
        .color(StatusClass::from_status(record.status).color())
        .bold();

    let mut line = format!(
        "{} {} {} {} - {}B | {}\n",
        record.method,
        record.url,
        status,
        format_elapsed(record.elapsed),
        record.size,
        format_terminal_timestamp(&record.timestamp),
    );

    let tokens: Vec<String> = annotations
        .iter()
        .map(|(key, value)| {
            format!(
                "{}:{}",
                escape(key).color(KEY_COLOR).bold(),
                format_value(value)
            )
        })
        .collect();
    if !tokens.is_empty() {
        line.push_str(&tokens.join(" "));
        line.push('\n');
    }
    line
}

/// Render a plain single-line entry for syslog
pub fn render_syslog(record: &RequestRecord, annotations: &Annotations) -> Vec<u8> {
    let mut line = format!(
        "{} {} {} {} - {}B | {}",
        record.method,
        record.url,
        record.status,
        format_elapsed(record.elapsed),
        record.size,
        format_timestamp(&record.timestamp),
    );

    for (key, value) in annotations {
        line.push(' ');
        line.push_str(&escape(key));
        line.push(':');
        line.push_str(&format_value(value));
    }
    line.into_bytes()
}
