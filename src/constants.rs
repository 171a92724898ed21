//! Application-wide constants
//!
//! This module contains all constant values used throughout the crate.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default tracing filter for the crate's own diagnostics
pub const DEFAULT_RUST_LOG: &str = "info";

// =============================================================================
// LOGGER DEFAULTS
// =============================================================================

/// Syslog process name used when none is configured
pub const DEFAULT_SYSLOG_PROCESS: &str = "reqlog";

// =============================================================================
// TIMESTAMP FORMATS
// =============================================================================

/// Fine-grained timestamp used for annotation values and syslog lines
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Coarse timestamp shown on terminal lines
pub const TIME_TERMINAL_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Digits after the decimal point for floating point annotation values
pub const FLOAT_PRECISION: usize = 3;

// =============================================================================
// RESERVED ANNOTATION KEYS
// =============================================================================

/// Reserved annotation keys stamped by the logger itself
pub mod keys {
    /// Source location of the most recent annotate call
    pub const CALLER: &str = "file";
    /// Message attached through `RequestLog::message`
    pub const MESSAGE: &str = "msg";
}

// =============================================================================
// FALLBACK STATUSES
// =============================================================================

/// Status logged when the handler panicked before producing a response
pub const STATUS_PANICKED: u16 = 500;

/// Status logged when the request future was dropped before a response
/// existed (client went away or an outer timeout fired)
pub const STATUS_CLIENT_CLOSED: u16 = 499;
