//! Destinations for rendered request lines

use std::io::Write;

use syslog::{Facility, Formatter3164, Severity as SyslogSeverity};

use super::render::Severity;
use crate::error::SinkError;

/// Destination for rendered request lines
///
/// Each call carries one complete line and must be written as a single
/// unit so that lines from concurrent requests never interleave.
pub trait LogSink: Send + Sync {
    fn write_line(&self, severity: Severity, line: &[u8]) -> Result<(), SinkError>;
}

/// Writes lines to standard output as-is
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalSink;

impl LogSink for TerminalSink {
    fn write_line(&self, _severity: Severity, line: &[u8]) -> Result<(), SinkError> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(line)?;
        stdout.flush()?;
        Ok(())
    }
}

/// Sends lines to the local syslog daemon
///
/// A connection is opened for every line and closed right after it.
#[derive(Debug, Clone)]
pub struct SyslogSink {
    process: String,
}

impl SyslogSink {
    pub fn new(process: impl Into<String>) -> Self {
        Self {
            process: process.into(),
        }
    }
}

/// Syslog level a line of the given severity is sent with
fn syslog_severity(severity: Severity) -> SyslogSeverity {
    match severity {
        Severity::Info => SyslogSeverity::LOG_INFO,
        Severity::Warning => SyslogSeverity::LOG_WARNING,
        Severity::Error => SyslogSeverity::LOG_ERR,
    }
}

impl LogSink for SyslogSink {
    fn write_line(&self, severity: Severity, line: &[u8]) -> Result<(), SinkError> {
        let formatter = Formatter3164 {
            facility: Facility::LOG_USER,
            hostname: None,
            process: self.process.clone(),
            pid: std::process::id(),
        };
        let mut writer =
            syslog::unix(formatter).map_err(|e| SinkError::Connect(e.to_string()))?;

        let message = String::from_utf8_lossy(line);
        let sent = match syslog_severity(severity) {
            SyslogSeverity::LOG_INFO => writer.info(message),
            SyslogSeverity::LOG_WARNING => writer.warning(message),
            _ => writer.err(message),
        };
        sent.map_err(|e| SinkError::Write(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syslog_level_follows_severity() {
        assert!(matches!(syslog_severity(Severity::Info), SyslogSeverity::LOG_INFO));
        assert!(matches!(syslog_severity(Severity::Warning), SyslogSeverity::LOG_WARNING));
        assert!(matches!(syslog_severity(Severity::Error), SyslogSeverity::LOG_ERR));
    }

    #[test]
    fn test_status_to_syslog_level() {
        assert!(matches!(
            syslog_severity(Severity::from_status(404)),
            SyslogSeverity::LOG_WARNING
        ));
        assert!(matches!(
            syslog_severity(Severity::from_status(503)),
            SyslogSeverity::LOG_ERR
        ));
        assert!(matches!(
            syslog_severity(Severity::from_status(302)),
            SyslogSeverity::LOG_INFO
        ));
    }
}
