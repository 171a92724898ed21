//! Test utilities: in-memory sinks

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::SinkError;
use crate::logger::{LogSink, Severity};

/// Sink that keeps every line in memory
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    lines: Arc<Mutex<Vec<(Severity, Vec<u8>)>>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured lines, decoded as UTF-8
    pub fn lines(&self) -> Vec<(Severity, String)> {
        self.lines
            .lock()
            .iter()
            .map(|(severity, line)| (*severity, String::from_utf8_lossy(line).into_owned()))
            .collect()
    }

    /// The only captured line; panics unless exactly one was written
    pub fn single(&self) -> (Severity, String) {
        let lines = self.lines();
        assert_eq!(lines.len(), 1, "expected exactly one line, got {:?}", lines);
        lines.into_iter().next().unwrap()
    }
}

impl LogSink for CaptureSink {
    fn write_line(&self, severity: Severity, line: &[u8]) -> Result<(), SinkError> {
        self.lines.lock().push((severity, line.to_vec()));
        Ok(())
    }
}

/// Sink that rejects every line
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingSink;

impl LogSink for FailingSink {
    fn write_line(&self, _severity: Severity, _line: &[u8]) -> Result<(), SinkError> {
        Err(SinkError::Connect("no syslog daemon".to_string()))
    }
}
