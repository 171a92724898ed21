//! reqlog - Request-Scoped Structured Logging for Axum
//!
//! This library wraps HTTP handlers so that every request produces exactly
//! one log line: method, URL, status, response size and duration, followed by
//! any key/value annotations handler code attached while serving it.
//!
//! # Features
//!
//! - Per-request annotation store, safe to write from concurrent tasks
//! - Deterministic single-line value formatting with escaping
//! - Colorized terminal output or syslog output with status-based severity
//! - One line per request on every exit path, including panics and
//!   cancelled requests
//!
//! # Architecture
//!
//! - **Logger**: value formatting, annotation store, rendering, sinks
//! - **Middleware**: the request lifecycle around a handler
//! - **Handlers**: demo routes used by the `reqlog` binary

pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod logger;
pub mod middleware;
pub mod state;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use config::{Config, LoggerConfig};
pub use error::{AppError, AppResult, SinkError};
pub use logger::{annotate_current, RequestLog, Value};
pub use middleware::{request_logger, OutputMode, RequestLogger};
pub use state::AppState;
