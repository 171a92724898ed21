//! Request logging middleware
//!
//! Every request gets its own annotation store. The store's handle is put in
//! the request extensions and in a task-local scope, the response status is
//! observed and the body bytes are counted as they are sent. Once the body is
//! finished (or dropped) exactly one line is rendered and written to the sink.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{OriginalUri, Request, State},
    middleware::Next,
    response::Response,
};
use futures::FutureExt;
use http_body_util::BodyExt;
use tracing::warn;

use crate::config::LoggerConfig;
use crate::constants::{STATUS_CLIENT_CLOSED, STATUS_PANICKED};
use crate::logger::{
    render_syslog, render_terminal, Annotations, LogSink, RequestLog, RequestRecord, Severity,
    SyslogSink, TerminalSink,
};
use crate::utils::time::now_local;

/// Line format and destination of the request logger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Colorized two-line entries
    Terminal,
    /// Plain single-line entries with a severity
    Syslog,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Terminal => "terminal",
            OutputMode::Syslog => "syslog",
        }
    }
}

/// Middleware state: output mode and sink, fixed at construction
#[derive(Clone)]
pub struct RequestLogger {
    mode: OutputMode,
    sink: Arc<dyn LogSink>,
}

impl RequestLogger {
    /// Build the logger selected by the configuration
    pub fn new(config: &LoggerConfig) -> Self {
        if config.sys_write {
            Self::with_sink(
                OutputMode::Syslog,
                Arc::new(SyslogSink::new(config.syslog_process.clone())),
            )
        } else {
            Self::with_sink(OutputMode::Terminal, Arc::new(TerminalSink))
        }
    }

    /// Build a logger writing to a custom sink
    pub fn with_sink(mode: OutputMode, sink: Arc<dyn LogSink>) -> Self {
        Self { mode, sink }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Render a finished request and hand it to the sink
    ///
    /// Sink failures are reported through tracing and otherwise ignored.
    pub fn emit(&self, record: &RequestRecord, annotations: &Annotations) {
        let severity = Severity::from_status(record.status);
        let line = match self.mode {
            OutputMode::Terminal => render_terminal(record, annotations).into_bytes(),
            OutputMode::Syslog => render_syslog(record, annotations),
        };

        if let Err(e) = self.sink.write_line(severity, &line) {
            warn!(
                error = %e,
                mode = ?self.mode,
                method = %record.method,
                url = %record.url,
                "Failed to emit request log line"
            );
        }
    }
}

/// A request between entry and its log line
///
/// Dropping it finalizes the annotation store and emits the line, so every
/// exit path (normal completion, panic, cancellation) logs exactly once.
struct InFlight {
    logger: RequestLogger,
    log: RequestLog,
    method: String,
    url: String,
    start: Instant,
    status: Option<u16>,
    size: u64,
}

impl InFlight {
    fn record_bytes(&mut self, len: usize) {
        self.size += len as u64;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        let record = RequestRecord {
            method: std::mem::take(&mut self.method),
            url: std::mem::take(&mut self.url),
            // No response means the request future was dropped early.
            status: self.status.unwrap_or(STATUS_CLIENT_CLOSED),
            size: self.size,
            elapsed: self.start.elapsed(),
            timestamp: now_local(),
        };
        let annotations = self.log.finalize();
        self.logger.emit(&record, &annotations);
    }
}

/// Request logging middleware
///
/// Install with `axum::middleware::from_fn_with_state(logger, request_logger)`.
pub async fn request_logger(
    State(logger): State<RequestLogger>,
    mut request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let log = RequestLog::new();

    let url = match request.extensions().get::<OriginalUri>() {
        Some(OriginalUri(uri)) => uri.to_string(),
        None => request.uri().to_string(),
    };
    let mut in_flight = InFlight {
        logger,
        log: log.clone(),
        method: request.method().to_string(),
        url,
        start,
        status: None,
        size: 0,
    };

    request.extensions_mut().insert(log.clone());
    let outcome = AssertUnwindSafe(log.scope(next.run(request)))
        .catch_unwind()
        .await;

    let response = match outcome {
        Ok(response) => response,
        Err(panic) => {
            in_flight.status = Some(STATUS_PANICKED);
            drop(in_flight);
            std::panic::resume_unwind(panic);
        }
    };

    // Axum responses carry 200 OK unless the handler chose another status.
    in_flight.status = Some(response.status().as_u16());

    let (parts, body) = response.into_parts();
    let body = body.map_frame(move |frame| {
        if let Some(data) = frame.data_ref() {
            in_flight.record_bytes(data.len());
        }
        frame
    });

    Response::from_parts(parts, Body::new(body))
}
