//! Utility functions

pub mod time;

pub use time::{format_elapsed, format_terminal_timestamp, format_timestamp, now_local};
