//! HTTP Request Handlers
//!
//! Demo routes showing how handler code annotates its request's log line.

pub mod health;
pub mod items;

use axum::{middleware, Router};
use tower_http::catch_panic::CatchPanicLayer;

use crate::{middleware::request_logger, state::AppState};

/// Create all routes, wrapped in the request logger
///
/// Panics are turned into 500 responses inside the logger so that they are
/// logged like any other failed request.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .nest("/items", items::routes())
        .layer(CatchPanicLayer::new())
        .layer(middleware::from_fn_with_state(state.clone(), request_logger))
        .with_state(state)
}
