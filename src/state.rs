//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::Config;
use crate::middleware::RequestLogger;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Request logger, fixed for the lifetime of the server
    pub logger: RequestLogger,

    /// Application configuration
    pub config: Config,
}

impl AppState {
    /// Create a new application state
    pub fn new(logger: RequestLogger, config: Config) -> Self {
        Self {
            inner: Arc::new(AppStateInner { logger, config }),
        }
    }

    /// Get a clone of the request logger
    pub fn logger(&self) -> RequestLogger {
        self.inner.logger.clone()
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}

impl FromRef<AppState> for RequestLogger {
    fn from_ref(state: &AppState) -> Self {
        state.logger()
    }
}
