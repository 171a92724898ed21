//! Request-scoped structured logging
//!
//! - [`format`]: annotation values and escaping
//! - [`store`]: per-request annotation store and its handle
//! - [`render`]: terminal and syslog line rendering
//! - [`sink`]: where rendered lines go

pub mod format;
pub mod render;
pub mod sink;
pub mod store;

pub use format::{escape, format_value, Value};
pub use render::{render_syslog, render_terminal, RequestRecord, Severity, StatusClass};
pub use sink::{LogSink, SyslogSink, TerminalSink};
pub use store::{annotate, annotate_current, AnnotationStore, Annotations, RequestLog};
